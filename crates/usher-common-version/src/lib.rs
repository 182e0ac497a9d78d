// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared build and version information for Usher.
//!
//! Single source of truth for version, git SHA, build timestamp, and
//! platform information across the usher binaries.

shadow_rs::shadow!(build);

#[cfg(feature = "serde")]
use serde::Serialize;
#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Platform string in `{os}-{arch}` format, e.g. "linux-x86_64".
///
/// Derived at compile time from target configuration.
pub const PLATFORM: &str = env!("USHER_PLATFORM");

/// Core build information used across binaries and headers.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
	pub version: &'static str,
	pub git_sha: &'static str,
	pub build_timestamp: &'static str,
	pub platform: &'static str,
}

impl BuildInfo {
	/// Get the current build information (compile-time constants).
	#[allow(clippy::const_is_empty)]
	pub const fn current() -> Self {
		Self {
			version: build::PKG_VERSION,
			git_sha: if build::SHORT_COMMIT.is_empty() {
				"unknown"
			} else {
				build::SHORT_COMMIT
			},
			build_timestamp: build::BUILD_TIME,
			platform: PLATFORM,
		}
	}
}

/// Version info shape used for health check responses.
///
/// Contains only the git SHA for build identification.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy)]
pub struct HealthVersionInfo {
	pub git_sha: &'static str,
}

impl HealthVersionInfo {
	/// Get version info for health check responses.
	pub const fn current() -> Self {
		Self {
			git_sha: BuildInfo::current().git_sha,
		}
	}
}

/// HTTP header names for version information.
pub mod headers {
	pub const VERSION: &str = "X-Usher-Version";
	pub const GIT_SHA: &str = "X-Usher-Git-Sha";
	pub const BUILD_TIMESTAMP: &str = "X-Usher-Build-Timestamp";
	pub const PLATFORM: &str = "X-Usher-Platform";
}

/// Get the Usher version string.
pub const fn usher_version() -> &'static str {
	build::PKG_VERSION
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_info_has_version() {
		let info = BuildInfo::current();
		assert!(!info.version.is_empty());
	}

	#[test]
	fn platform_format_is_valid() {
		assert!(PLATFORM.contains('-'));
		let parts: Vec<&str> = PLATFORM.split('-').collect();
		assert_eq!(parts.len(), 2);
	}

	#[test]
	fn health_version_info_has_git_sha() {
		let info = HealthVersionInfo::current();
		assert!(!info.git_sha.is_empty());
	}

	#[test]
	fn usher_version_matches_build_info() {
		assert_eq!(usher_version(), BuildInfo::current().version);
	}
}
