// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin endpoint types. Every admin request may carry the caller's ID token
//! in the body as a fallback for clients that cannot set an Authorization
//! header.

use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct InviteUserRequest {
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	/// Role the invited user will receive on acceptance. Unknown or absent
	/// roles fall back to anonymous.
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	pub email: String,
	/// Initial password. When absent the account is created without
	/// credentials and the user must go through a password reset.
	#[serde(default)]
	pub password: Option<String>,
	pub first_name: String,
	pub last_name: String,
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AddAdminRoleRequest {
	pub email: String,
	#[serde(default)]
	pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClearUsersRequest {
	#[serde(default)]
	pub token: Option<String>,
}

/// The created account, echoed back to the admin client.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
	pub id: String,
	pub email: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invite_request_token_and_role_are_optional() {
		let request: InviteUserRequest = serde_json::from_str(
			r#"{"email": "a@example.com", "firstName": "Ada", "lastName": "Lovelace"}"#,
		)
		.unwrap();
		assert!(request.role.is_none());
		assert!(request.token.is_none());
	}

	#[test]
	fn create_request_password_is_optional() {
		let request: CreateUserRequest = serde_json::from_str(
			r#"{"email": "a@example.com", "firstName": "Ada", "lastName": "Lovelace"}"#,
		)
		.unwrap();
		assert!(request.password.is_none());
	}

	#[test]
	fn account_response_omits_absent_display_name() {
		let response = AccountResponse {
			id: "uid-1".into(),
			email: "a@example.com".into(),
			display_name: None,
		};
		let json = serde_json::to_value(&response).unwrap();
		assert!(json.get("displayName").is_none());
	}
}
