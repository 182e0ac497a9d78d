// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stored record shapes. Field names on the wire are the camelCase names
//! the client applications read directly from the store.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current wall-clock time as epoch milliseconds, the store's timestamp
/// convention.
pub fn now_millis() -> i64 {
	Utc::now().timestamp_millis()
}

/// Compose the denormalized display name from its parts.
pub fn display_name(first_name: &str, last_name: &str) -> String {
	format!("{first_name} {last_name}")
}

/// Denormalized profile data, keyed by account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	pub first_name: String,
	pub last_name: String,
	pub display_name: String,
	pub refresh_time: i64,
}

impl UserProfile {
	/// Build a full profile record with a derived display name and a fresh
	/// timestamp.
	pub fn new(email: Option<String>, first_name: &str, last_name: &str) -> Self {
		Self {
			email,
			first_name: first_name.to_string(),
			last_name: last_name.to_string(),
			display_name: display_name(first_name, last_name),
			refresh_time: now_millis(),
		}
	}
}

/// Partial profile update; unset fields are left unchanged by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_time: Option<i64>,
}

/// A pending invitation, keyed by a store-generated id.
///
/// The token is stored raw; acceptance compares the submitted token against
/// this field and against the copy carried in the invitee's account claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRecord {
	pub token: String,
	/// Account id of the admin who issued the invite.
	pub inviter: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_name_joins_with_single_space() {
		assert_eq!(display_name("Papa", "Roach"), "Papa Roach");
	}

	#[test]
	fn new_profile_derives_display_name() {
		let profile = UserProfile::new(Some("papa@example.com".to_string()), "Papa", "Roach");
		assert_eq!(profile.display_name, "Papa Roach");
		assert!(profile.refresh_time > 0);
	}

	#[test]
	fn profile_serializes_camel_case() {
		let profile = UserProfile::new(None, "Papa", "Roach");
		let json = serde_json::to_value(&profile).unwrap();
		assert_eq!(json["firstName"], "Papa");
		assert_eq!(json["displayName"], "Papa Roach");
		assert!(json.get("email").is_none());
		assert!(json.get("refreshTime").is_some());
	}

	#[test]
	fn changes_skip_unset_fields() {
		let changes = ProfileChanges {
			refresh_time: Some(1),
			..Default::default()
		};
		let json = serde_json::to_value(&changes).unwrap();
		assert!(json.get("displayName").is_none());
		assert_eq!(json["refreshTime"], 1);
	}

	#[test]
	fn invite_record_round_trips() {
		let record = InviteRecord {
			token: "t".repeat(128),
			inviter: "admin1".to_string(),
			email: "papa@example.com".to_string(),
			first_name: "Papa".to_string(),
			last_name: "Roach".to_string(),
		};
		let json = serde_json::to_string(&record).unwrap();
		assert!(json.contains("\"inviter\":\"admin1\""));
		let back: InviteRecord = serde_json::from_str(&json).unwrap();
		assert_eq!(back, record);
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn display_name_preserves_both_parts(
				first in "[A-Za-z]{1,20}",
				last in "[A-Za-z]{1,20}"
			) {
				let name = display_name(&first, &last);
				prop_assert_eq!(name, format!("{} {}", first, last));
			}
		}
	}
}
