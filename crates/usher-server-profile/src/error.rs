// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Profile Store client.

use thiserror::Error;

/// Errors that can occur when talking to the Profile Store.
///
/// Absent keys are not errors; reads return `Ok(None)` and
/// `delete_invite` reports whether the record existed.
#[derive(Debug, Error)]
pub enum ProfileError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The store rejected our credentials.
	#[error("Invalid store credentials")]
	Unauthorized,

	/// Invalid or unparseable response from the store.
	#[error("Invalid response from profile store: {0}")]
	InvalidResponse(String),

	/// The store returned an error status.
	#[error("Profile store error: {status} - {message}")]
	Api { status: u16, message: String },
}
