// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invite workflow configuration section.

use serde::Deserialize;

/// Which accounts count as a collision when an invitee accepts with a new
/// email address that already resolves to an existing account.
///
/// The two policies are not equivalent:
/// - `PendingClaim` collides only when the found account still carries a
///   pending invite claim (another invitee holds the address).
/// - `DistinctAccount` collides whenever the found account is not the
///   invitee's own, pending or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailCollisionPolicy {
	PendingClaim,
	DistinctAccount,
}

impl Default for EmailCollisionPolicy {
	fn default() -> Self {
		Self::DistinctAccount
	}
}

/// Invite workflow configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct InvitesConfig {
	/// When true, issuing an invite also emails the acceptance link.
	pub send_email: bool,
	/// Base URL of the client application the acceptance link points at.
	pub client_url: String,
	/// Path segment under `client_url` for the acceptance page.
	pub accept_path: String,
	pub collision_policy: EmailCollisionPolicy,
}

impl Default for InvitesConfig {
	fn default() -> Self {
		Self {
			send_email: false,
			client_url: "http://localhost:3000".to_string(),
			accept_path: "accept-invite".to_string(),
			collision_policy: EmailCollisionPolicy::default(),
		}
	}
}

impl InvitesConfig {
	/// Compose the acceptance link for a stored invite.
	pub fn accept_link(&self, invite_key: &str, token: &str) -> String {
		format!(
			"{}/{}/{invite_key}/{token}",
			self.client_url.trim_end_matches('/'),
			self.accept_path.trim_matches('/'),
		)
	}
}

/// Invite workflow configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvitesConfigLayer {
	#[serde(default)]
	pub send_email: Option<bool>,
	#[serde(default)]
	pub client_url: Option<String>,
	#[serde(default)]
	pub accept_path: Option<String>,
	#[serde(default)]
	pub collision_policy: Option<EmailCollisionPolicy>,
}

impl InvitesConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.send_email.is_some() {
			self.send_email = other.send_email;
		}
		if other.client_url.is_some() {
			self.client_url = other.client_url;
		}
		if other.accept_path.is_some() {
			self.accept_path = other.accept_path;
		}
		if other.collision_policy.is_some() {
			self.collision_policy = other.collision_policy;
		}
	}

	pub fn finalize(self) -> InvitesConfig {
		let defaults = InvitesConfig::default();
		InvitesConfig {
			send_email: self.send_email.unwrap_or(defaults.send_email),
			client_url: self.client_url.unwrap_or(defaults.client_url),
			accept_path: self.accept_path.unwrap_or(defaults.accept_path),
			collision_policy: self.collision_policy.unwrap_or_default(),
		}
	}
}
