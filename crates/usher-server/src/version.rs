// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information and version utilities for usher-server.

pub use usher_common_version::BuildInfo;

/// Format version info for display.
pub fn format_version_info() -> String {
	use chrono::{DateTime, Utc};

	let info = BuildInfo::current();

	let mut output = format!(
		"usher-server version: {}\n\
         Git SHA:              {}\n\
         Built at:             {}\n\
         Platform:             {}",
		info.version, info.git_sha, info.build_timestamp, info.platform,
	);

	if let Ok(built_at) = DateTime::parse_from_rfc3339(info.build_timestamp)
		.or_else(|_| DateTime::parse_from_str(info.build_timestamp, "%Y-%m-%d %H:%M:%S"))
	{
		let built_at_utc: DateTime<Utc> = built_at.into();
		let age = Utc::now().signed_duration_since(built_at_utc);

		if let Ok(std_duration) = age.to_std() {
			output.push_str(&format!(
				"\nBuild age:          {} ({} seconds)",
				humantime::format_duration(std_duration),
				std_duration.as_secs()
			));
		}
	}

	output
}
