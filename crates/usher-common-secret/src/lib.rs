// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper type for configuration values that must never leak.
//!
//! [`Secret<T>`] guarantees:
//!
//! - `Debug` and `Display` print `[REDACTED]` instead of the value
//! - the inner value is zeroized from memory on drop
//! - serialization always emits `[REDACTED]`, never the value
//! - deserialization reads the plain value (config files hold real secrets)
//!
//! [`load_secret_env`] loads a secret from an environment variable with
//! `*_FILE` indirection for file-mounted secrets.

pub mod env;

use zeroize::Zeroize;

pub use env::{load_secret_env, SecretEnvError};

/// Placeholder emitted anywhere a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must not be logged, printed, or serialized.
///
/// Access the inner value explicitly via [`Secret::expose`] or consume it via
/// [`Secret::into_inner`]; both make the read visible at the call site.
#[derive(Clone)]
pub struct Secret<T: Zeroize>(T);

/// Convenience alias for the overwhelmingly common case.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	/// Wrap a sensitive value.
	pub fn new(value: T) -> Self {
		Self(value)
	}

	/// Borrow the inner value.
	pub fn expose(&self) -> &T {
		&self.0
	}

	/// Consume the wrapper and return the inner value.
	///
	/// The caller takes over responsibility for the value's lifetime; the
	/// leftover default inside the wrapper is still zeroized on drop.
	pub fn into_inner(mut self) -> T
	where
		T: Default,
	{
		std::mem::take(&mut self.0)
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl<T: Zeroize> std::fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> std::fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(feature = "serde")]
impl<T: Zeroize> serde::Serialize for Secret<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

#[cfg(feature = "serde")]
impl<'de, T: Zeroize + serde::Deserialize<'de>> serde::Deserialize<'de> for Secret<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}
