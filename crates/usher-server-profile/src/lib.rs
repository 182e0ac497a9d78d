// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile Store client for the Usher onboarding server.
//!
//! The store is an opaque key-value tree holding two record families:
//! Profile Records keyed by account id, and Invite Records keyed by a
//! store-generated push key. This crate exposes the [`ProfileStore`] trait
//! consumed by handlers, a REST implementation, and an in-memory double for
//! tests.

pub mod client;
pub mod error;
pub mod testing;
pub mod types;

pub use client::RestProfileStore;
pub use error::ProfileError;
pub use types::{display_name, now_millis, InviteRecord, ProfileChanges, UserProfile};

use async_trait::async_trait;

/// Capability surface of the hosted Profile Store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
	/// Read a Profile Record; `Ok(None)` when absent.
	async fn get_profile(&self, account_id: &str) -> Result<Option<UserProfile>, ProfileError>;

	/// Write a Profile Record wholesale.
	async fn put_profile(&self, account_id: &str, profile: &UserProfile)
		-> Result<(), ProfileError>;

	/// Apply a partial update to a Profile Record.
	async fn update_profile(
		&self,
		account_id: &str,
		changes: &ProfileChanges,
	) -> Result<(), ProfileError>;

	/// Remove a Profile Record. Removing an absent record is a no-op.
	async fn remove_profile(&self, account_id: &str) -> Result<(), ProfileError>;

	/// Append an Invite Record under a store-generated key; returns the key.
	async fn create_invite(&self, record: &InviteRecord) -> Result<String, ProfileError>;

	/// Read an Invite Record; `Ok(None)` when absent.
	async fn get_invite(&self, key: &str) -> Result<Option<InviteRecord>, ProfileError>;

	/// Delete an Invite Record. Returns whether it still existed; a `false`
	/// means a concurrent consume already removed it.
	async fn delete_invite(&self, key: &str) -> Result<bool, ProfileError>;
}
