// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Public onboarding endpoint types. Wire fields are camelCase: this is the
//! contract the existing client applications already speak.

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidateEmailRequest {
	pub email: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
	/// Store-generated key of the Invite Record, as embedded in the link.
	pub invite_id: String,
	pub token: String,
	/// The email the acceptor wants on their account (may differ from the
	/// invited address).
	pub email: String,
	pub password: String,
	pub first_name: String,
	pub last_name: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OnboardingErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accept_invite_request_reads_camel_case() {
		let request: AcceptInviteRequest = serde_json::from_str(
			r#"{
				"inviteId": "-Kxyz",
				"token": "tok",
				"email": "new@example.com",
				"password": "hunter2",
				"firstName": "Papa",
				"lastName": "Roach"
			}"#,
		)
		.unwrap();
		assert_eq!(request.invite_id, "-Kxyz");
		assert_eq!(request.first_name, "Papa");
	}
}
