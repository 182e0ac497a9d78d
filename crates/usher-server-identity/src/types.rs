// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account types shared between the gateway client and its callers.

use serde::{Deserialize, Serialize};

/// Opaque account identifier assigned by the Identity Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for AccountId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for AccountId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<&str> for AccountId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

/// Custom claims attached to an account.
///
/// Claim names on the wire are the camelCase flags the client applications
/// read from their session tokens. `invite_token` is transient: present only
/// between invitation issue and acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountClaims {
	pub is_admin: bool,
	pub is_manager: bool,
	pub is_client: bool,
	pub is_member: bool,
	pub is_anonymous: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invite_token: Option<String>,
}

impl AccountClaims {
	/// True while the account has a pending, unaccepted invitation.
	pub fn has_pending_invite(&self) -> bool {
		self.invite_token.is_some()
	}
}

/// An account as reported by the Identity Gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub id: AccountId,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(default, rename = "customClaims")]
	pub claims: AccountClaims,
}

/// Fields for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
	pub email: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

/// Partial account update. Unset fields are left unchanged by the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

/// One page of an account enumeration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPage {
	pub accounts: Vec<Account>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_page_token: Option<String>,
}

/// Result of verifying a bearer token.
///
/// A token that verifies but names no subject is treated as invalid by
/// callers; the distinction belongs to the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedToken {
	#[serde(default)]
	pub subject: Option<AccountId>,
}
