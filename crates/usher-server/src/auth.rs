// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Admin guard.
//!
//! Admin endpoints authenticate with a bearer token issued by the Identity
//! Gateway. The guard verifies the token, resolves its subject to an account
//! and requires the `isAdmin` claim. It fails closed: every denial and every
//! upstream failure maps to a response, never to a dropped request.
//!
//! Denial statuses follow the documented client contract: authentication
//! failures (bad token, unknown subject) are 400, an authenticated non-admin
//! is 403.

use axum::{
	http::{header, HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use usher_server_api::AdminErrorResponse;
use usher_server_identity::{Account, IdentityError};

use crate::api_response::ApiErrorResponse;
use crate::AppState;

/// Extract the caller's token: `Authorization: Bearer <token>` header first,
/// then the legacy body `token` field.
pub fn bearer_token(headers: &HeaderMap, body_token: Option<&str>) -> Option<String> {
	headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "))
		.map(str::to_string)
		.or_else(|| body_token.map(str::to_string))
}

/// Why an admin-guarded request was refused.
#[derive(Debug)]
pub enum AdminGuardError {
	/// Missing token, or the gateway reports no subject for it.
	InvalidToken,
	/// The token's subject does not resolve to an account.
	AccessDenied,
	/// The account exists but lacks the admin claim.
	Forbidden,
	/// The gateway could not be consulted.
	Upstream(IdentityError),
}

impl IntoResponse for AdminGuardError {
	fn into_response(self) -> Response {
		let (status, body) = match self {
			Self::InvalidToken => (
				StatusCode::BAD_REQUEST,
				AdminErrorResponse::new("invalid_token", "Invalid token"),
			),
			Self::AccessDenied => (
				StatusCode::BAD_REQUEST,
				AdminErrorResponse::new("access_denied", "Access denied"),
			),
			Self::Forbidden => (
				StatusCode::FORBIDDEN,
				AdminErrorResponse::new("access_denied", "Access denied"),
			),
			Self::Upstream(e) => {
				tracing::error!(error = %e, "Admin guard failed to consult identity gateway");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					AdminErrorResponse::new("internal_error", "Authorization check failed"),
				)
			}
		};
		(status, Json(body)).into_response()
	}
}

/// Verify that `token` names an existing account flagged `isAdmin` and return
/// that account. Callers read its id as the acting admin ("inviter").
pub async fn require_admin(
	state: &AppState,
	token: Option<&str>,
) -> Result<Account, AdminGuardError> {
	let token = token.ok_or(AdminGuardError::InvalidToken)?;

	let verified = state
		.identity
		.verify_token(token)
		.await
		.map_err(AdminGuardError::Upstream)?;

	let subject = match verified.subject {
		Some(subject) => subject,
		None => {
			tracing::warn!("Admin request with unverifiable token");
			return Err(AdminGuardError::InvalidToken);
		}
	};

	let account = state
		.identity
		.get_account(&subject)
		.await
		.map_err(AdminGuardError::Upstream)?;

	let account = match account {
		Some(account) => account,
		None => {
			tracing::warn!(account_id = %subject, "Admin token subject has no account");
			return Err(AdminGuardError::AccessDenied);
		}
	};

	if !account.claims.is_admin {
		tracing::warn!(account_id = %account.id, "Non-admin caller on admin endpoint");
		return Err(AdminGuardError::Forbidden);
	}

	Ok(account)
}
