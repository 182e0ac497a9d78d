// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity Gateway client for the Usher onboarding server.
//!
//! The gateway owns accounts: credentials, the mutable unique email, and the
//! custom-claims flag store. This crate exposes the [`IdentityGateway`] trait
//! consumed by handlers, a REST implementation, and an in-memory double for
//! tests.
//!
//! Expected absence is a value, not an error: lookups return `Ok(None)` for
//! unknown ids and emails, and `delete_account` reports whether the account
//! existed.

pub mod client;
pub mod error;
pub mod testing;
pub mod types;

pub use client::RestIdentityGateway;
pub use error::IdentityError;
pub use types::{
	Account, AccountClaims, AccountId, AccountPage, AccountUpdate, NewAccount, VerifiedToken,
};

use async_trait::async_trait;

/// Capability surface of the hosted Identity Gateway.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
	/// Create an account. The gateway enforces email uniqueness.
	async fn create_account(&self, new_account: NewAccount) -> Result<Account, IdentityError>;

	/// Look up an account by id; `Ok(None)` when unknown.
	async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, IdentityError>;

	/// Look up an account by email; `Ok(None)` when unknown.
	async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError>;

	/// Apply a partial update (email, password, display name) atomically.
	async fn update_account(
		&self,
		id: &AccountId,
		update: AccountUpdate,
	) -> Result<Account, IdentityError>;

	/// Replace the account's custom claims wholesale.
	async fn set_claims(&self, id: &AccountId, claims: AccountClaims) -> Result<(), IdentityError>;

	/// Delete an account. Returns whether it existed; deleting an absent id
	/// is a no-op, not an error.
	async fn delete_account(&self, id: &AccountId) -> Result<bool, IdentityError>;

	/// Enumerate accounts one page at a time.
	async fn list_accounts(
		&self,
		page_size: u32,
		page_token: Option<&str>,
	) -> Result<AccountPage, IdentityError>;

	/// Verify a bearer token and report its subject, if any.
	async fn verify_token(&self, token: &str) -> Result<VerifiedToken, IdentityError>;
}
