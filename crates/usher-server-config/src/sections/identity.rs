// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity Gateway configuration section.

use serde::Deserialize;
use usher_common_secret::SecretString;

/// Identity Gateway configuration (runtime, fully resolved).
///
/// The service key authenticates this server to the gateway; without it the
/// gateway rejects privileged operations (account creation, claim updates).
#[derive(Debug, Clone)]
pub struct IdentityConfig {
	pub base_url: String,
	pub service_key: Option<SecretString>,
	pub request_timeout_secs: u64,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:9099".to_string(),
			service_key: None,
			request_timeout_secs: 30,
		}
	}
}

/// Identity Gateway configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub service_key: Option<SecretString>,
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.service_key.is_some() {
			self.service_key = other.service_key;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		let defaults = IdentityConfig::default();
		IdentityConfig {
			base_url: self.base_url.unwrap_or(defaults.base_url),
			service_key: self.service_key,
			request_timeout_secs: self
				.request_timeout_secs
				.unwrap_or(defaults.request_timeout_secs),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use usher_common_secret::Secret;

	#[test]
	fn test_defaults() {
		let config = IdentityConfigLayer::default().finalize();
		assert_eq!(config.base_url, "http://localhost:9099");
		assert!(config.service_key.is_none());
		assert_eq!(config.request_timeout_secs, 30);
	}

	#[test]
	fn test_merge_keeps_existing_when_other_is_empty() {
		let mut base = IdentityConfigLayer {
			base_url: Some("https://identity.internal".to_string()),
			service_key: Some(Secret::new("key".to_string())),
			request_timeout_secs: None,
		};
		base.merge(IdentityConfigLayer::default());
		let config = base.finalize();
		assert_eq!(config.base_url, "https://identity.internal");
		assert!(config.service_key.is_some());
	}

	#[test]
	fn test_debug_does_not_leak_service_key() {
		let config = IdentityConfig {
			service_key: Some(Secret::new("very-secret-key".to_string())),
			..Default::default()
		};
		let debug = format!("{config:?}");
		assert!(!debug.contains("very-secret-key"));
	}
}
