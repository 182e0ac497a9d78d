// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event webhook configuration section.

use serde::Deserialize;
use usher_common_secret::SecretString;

/// Event webhook configuration (runtime, fully resolved).
///
/// `webhook_token` is a shared bearer token the Identity Gateway presents
/// when delivering account events. Unset means events are accepted without
/// authentication (development parity with a trusted in-platform trigger).
#[derive(Debug, Clone, Default)]
pub struct EventsConfig {
	pub webhook_token: Option<SecretString>,
}

/// Event webhook configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfigLayer {
	#[serde(default)]
	pub webhook_token: Option<SecretString>,
}

impl EventsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.webhook_token.is_some() {
			self.webhook_token = other.webhook_token;
		}
	}

	pub fn finalize(self) -> EventsConfig {
		EventsConfig {
			webhook_token: self.webhook_token,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use usher_common_secret::Secret;

	#[test]
	fn test_default_has_no_token() {
		let config = EventsConfigLayer::default().finalize();
		assert!(config.webhook_token.is_none());
	}

	#[test]
	fn test_merge_takes_other_token() {
		let mut base = EventsConfigLayer::default();
		base.merge(EventsConfigLayer {
			webhook_token: Some(Secret::new("shared".to_string())),
		});
		assert!(base.finalize().webhook_token.is_some());
	}
}
