// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP (outbound email) configuration section.
//!
//! The section is optional: with no host and from address configured the
//! server runs without a mailer and the invite-email feature must stay off.

use serde::Deserialize;
use usher_common_secret::SecretString;

/// SMTP configuration (runtime, fully resolved). Present only when the
/// required fields (host, from address) are set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub use_tls: bool,
}

/// SMTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub from_address: Option<String>,
	#[serde(default)]
	pub from_name: Option<String>,
	#[serde(default)]
	pub use_tls: Option<bool>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
		if other.use_tls.is_some() {
			self.use_tls = other.use_tls;
		}
	}

	/// Resolve to a config if the required fields are present.
	pub fn finalize(self) -> Option<SmtpConfig> {
		let host = self.host?;
		let from_address = self.from_address?;
		Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(587),
			username: self.username,
			password: self.password,
			from_address,
			from_name: self.from_name.unwrap_or_else(|| "Usher".to_string()),
			use_tls: self.use_tls.unwrap_or(true),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_finalize_requires_host_and_from() {
		assert!(SmtpConfigLayer::default().finalize().is_none());

		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			..Default::default()
		};
		assert!(layer.finalize().is_none());

		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			from_address: Some("noreply@example.com".to_string()),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.port, 587);
		assert_eq!(config.from_name, "Usher");
		assert!(config.use_tls);
	}

	#[test]
	fn test_merge_overrides_fields() {
		let mut base = SmtpConfigLayer {
			host: Some("old.example.com".to_string()),
			port: Some(25),
			..Default::default()
		};
		base.merge(SmtpConfigLayer {
			host: Some("new.example.com".to_string()),
			from_address: Some("noreply@example.com".to_string()),
			use_tls: Some(false),
			..Default::default()
		});
		let config = base.finalize().unwrap();
		assert_eq!(config.host, "new.example.com");
		assert_eq!(config.port, 25);
		assert!(!config.use_tls);
	}
}
