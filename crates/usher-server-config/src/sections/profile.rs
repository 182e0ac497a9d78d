// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile Store configuration section.

use serde::Deserialize;
use usher_common_secret::SecretString;

/// Profile Store configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct ProfileConfig {
	pub base_url: String,
	pub service_key: Option<SecretString>,
	pub request_timeout_secs: u64,
}

impl Default for ProfileConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:9000".to_string(),
			service_key: None,
			request_timeout_secs: 30,
		}
	}
}

/// Profile Store configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfigLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub service_key: Option<SecretString>,
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
}

impl ProfileConfigLayer {
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

	pub fn finalize(self) -> ProfileConfig {
		let defaults = ProfileConfig::default();
		ProfileConfig {
			base_url: self.base_url.unwrap_or(defaults.base_url),
			service_key: self.service_key,
			request_timeout_secs: self
				.request_timeout_secs
				.unwrap_or(defaults.request_timeout_secs),
		}
	}
}
