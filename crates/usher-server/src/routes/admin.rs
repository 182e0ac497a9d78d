// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Admin HTTP handlers: invite issuance, direct user creation, role grants
//! and bulk removal.
//!
//! Every handler here runs the admin guard before touching any other input,
//! including inputs that turn out not to exist. The caller's token comes from
//! the `Authorization` header or, for legacy clients, a `token` field in the
//! request body.

use axum::{
	extract::State,
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};

use usher_server_api::{
	AccountResponse, AddAdminRoleRequest, AdminErrorResponse, ClearUsersRequest, CreateUserRequest,
	EmptyResponse, InviteUserRequest,
};
use usher_server_profile::{now_millis, InviteRecord, ProfileChanges};

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error},
	auth::{bearer_token, require_admin},
	email::{render_invite_email, INVITE_SUBJECT},
	impl_api_error_response,
	provisioning::{
		deprovision_all, email_available, generate_invite_token, provision_user, role_claims,
		NewUser,
	},
};

impl_api_error_response!(AdminErrorResponse);

/// Invite a user by email.
///
/// Provisions a placeholder account carrying the invite token in its claims,
/// stores the matching Invite Record, and (when configured) emails the
/// acceptance link.
///
/// # Authorization
///
/// Requires an admin bearer token.
///
/// # Errors
///
/// - `400 Bad Request`: bad token, or the email already has an account or a
///   pending invitation
/// - `403 Forbidden`: caller is not an admin
/// - `500 Internal Server Error`: provisioning, record storage, or email
///   delivery failed
#[utoipa::path(
    post,
    path = "/api/admin/invites",
    request_body = InviteUserRequest,
    responses(
        (status = 200, description = "Invitation issued", body = EmptyResponse),
        (status = 400, description = "Bad token or email taken", body = AdminErrorResponse),
        (status = 403, description = "Caller is not an admin", body = AdminErrorResponse),
        (status = 500, description = "Upstream failure", body = AdminErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[tracing::instrument(skip(state, headers, payload))]
pub async fn invite_user(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<InviteUserRequest>,
) -> impl IntoResponse {
	let token = bearer_token(&headers, payload.token.as_deref());
	let admin = match require_admin(&state, token.as_deref()).await {
		Ok(admin) => admin,
		Err(e) => return e.into_response(),
	};

	if !email_available(state.identity.as_ref(), &payload.email).await {
		return bad_request::<AdminErrorResponse>(
			"invitation_already_sent",
			"Invitation already sent",
		)
		.into_response();
	}

	let invite_token = generate_invite_token();
	let mut claims = role_claims(payload.role.as_deref());
	claims.invite_token = Some(invite_token.clone());

	let account = match provision_user(
		&state.identity,
		&state.profile,
		NewUser {
			email: payload.email.clone(),
			password: None,
			first_name: payload.first_name.clone(),
			last_name: payload.last_name.clone(),
			claims: Some(claims),
		},
	)
	.await
	{
		Ok(account) => account,
		Err(e) => {
			tracing::error!(error = %e, "Failed to provision invited account");
			return internal_error::<AdminErrorResponse>("Could not create invitation")
				.into_response();
		}
	};

	let record = InviteRecord {
		token: invite_token.clone(),
		inviter: admin.id.to_string(),
		email: payload.email.clone(),
		first_name: payload.first_name.clone(),
		last_name: payload.last_name.clone(),
	};
	let invite_key = match state.profile.create_invite(&record).await {
		Ok(key) => key,
		Err(e) => {
			tracing::error!(error = %e, "Failed to store invite record");
			return internal_error::<AdminErrorResponse>("Could not create invitation")
				.into_response();
		}
	};

	tracing::info!(
		account_id = %account.id,
		inviter = %admin.id,
		"Invitation issued"
	);

	if !state.invites.send_email {
		return (StatusCode::OK, Json(EmptyResponse::default())).into_response();
	}

	let mailer = match &state.mailer {
		Some(mailer) => mailer,
		None => {
			tracing::error!("Invite email requested but no SMTP client is configured");
			return internal_error::<AdminErrorResponse>("Could not send invitation email")
				.into_response();
		}
	};

	let link = state.invites.accept_link(&invite_key, &invite_token);
	let email = render_invite_email(&link);
	if let Err(e) = mailer
		.send_email(&payload.email, INVITE_SUBJECT, &email.body_html, &email.body_text)
		.await
	{
		tracing::error!(error = %e, "Failed to send invitation email");
		return internal_error::<AdminErrorResponse>("Could not send invitation email")
			.into_response();
	}

	(StatusCode::OK, Json(EmptyResponse::default())).into_response()
}

/// Create a user directly, without the invitation flow.
///
/// # Authorization
///
/// Requires an admin bearer token.
///
/// # Errors
///
/// - `400 Bad Request`: bad token, or the email is taken
/// - `403 Forbidden`: caller is not an admin
/// - `500 Internal Server Error`: provisioning failed
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = AccountResponse),
        (status = 400, description = "Bad token or email taken", body = AdminErrorResponse),
        (status = 403, description = "Caller is not an admin", body = AdminErrorResponse),
        (status = 500, description = "Upstream failure", body = AdminErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[tracing::instrument(skip(state, headers, payload))]
pub async fn create_user(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
	let token = bearer_token(&headers, payload.token.as_deref());
	if let Err(e) = require_admin(&state, token.as_deref()).await {
		return e.into_response();
	}

	if !email_available(state.identity.as_ref(), &payload.email).await {
		return bad_request::<AdminErrorResponse>(
			"email_in_use",
			"Email is already in use or has been invited",
		)
		.into_response();
	}

	let claims = payload.role.as_deref().map(|role| role_claims(Some(role)));
	let account = match provision_user(
		&state.identity,
		&state.profile,
		NewUser {
			email: payload.email.clone(),
			password: payload.password.clone(),
			first_name: payload.first_name.clone(),
			last_name: payload.last_name.clone(),
			claims,
		},
	)
	.await
	{
		Ok(account) => account,
		Err(e) => {
			tracing::error!(error = %e, "Failed to create user");
			return internal_error::<AdminErrorResponse>("Could not create user").into_response();
		}
	};

	tracing::info!(account_id = %account.id, "User created");

	let response = AccountResponse {
		id: account.id.to_string(),
		email: account.email,
		display_name: account.display_name,
	};
	(StatusCode::OK, Json(response)).into_response()
}

/// Grant the admin claim to an existing user.
///
/// The target's other claims are preserved; its Profile Record gets a fresh
/// refresh timestamp so clients re-read the account.
///
/// # Authorization
///
/// Requires an admin bearer token. The guard runs before the target lookup,
/// so a non-admin caller is refused even when the target does not exist.
///
/// # Errors
///
/// - `400 Bad Request`: bad token, or no user with that email
/// - `403 Forbidden`: caller is not an admin
/// - `500 Internal Server Error`: the claim update failed
#[utoipa::path(
    post,
    path = "/api/admin/users/admin-role",
    request_body = AddAdminRoleRequest,
    responses(
        (status = 200, description = "Admin role granted", body = EmptyResponse),
        (status = 400, description = "Bad token or unknown user", body = AdminErrorResponse),
        (status = 403, description = "Caller is not an admin", body = AdminErrorResponse),
        (status = 500, description = "Upstream failure", body = AdminErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[tracing::instrument(skip(state, headers, payload))]
pub async fn add_admin_role(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<AddAdminRoleRequest>,
) -> impl IntoResponse {
	let token = bearer_token(&headers, payload.token.as_deref());
	if let Err(e) = require_admin(&state, token.as_deref()).await {
		return e.into_response();
	}

	let target = match state.identity.get_account_by_email(&payload.email).await {
		Ok(Some(account)) => account,
		Ok(None) => {
			return bad_request::<AdminErrorResponse>(
				"not_found",
				"No user found with that email",
			)
			.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up admin-role target");
			return internal_error::<AdminErrorResponse>("Could not grant admin role")
				.into_response();
		}
	};

	let mut claims = target.claims.clone();
	claims.is_admin = true;
	if let Err(e) = state.identity.set_claims(&target.id, claims).await {
		tracing::error!(error = %e, account_id = %target.id, "Failed to set admin claim");
		return internal_error::<AdminErrorResponse>("Could not grant admin role").into_response();
	}

	// Touch only the refresh timestamp; a failure here does not undo the
	// grant.
	let changes = ProfileChanges {
		display_name: None,
		refresh_time: Some(now_millis()),
	};
	if let Err(e) = state.profile.update_profile(target.id.as_str(), &changes).await {
		tracing::warn!(error = %e, account_id = %target.id, "Failed to touch profile refresh time");
	}

	tracing::info!(account_id = %target.id, "Admin role granted");

	(StatusCode::OK, Json(EmptyResponse::default())).into_response()
}

/// Remove every user except the caller.
///
/// Pages through the account directory and deletes each account and its
/// Profile Record. The acting admin is always skipped, so the system is never
/// left without an administrator.
///
/// # Authorization
///
/// Requires an admin bearer token. `DELETE` requests may omit the body
/// entirely and rely on the `Authorization` header.
///
/// # Errors
///
/// - `400 Bad Request`: bad token
/// - `403 Forbidden`: caller is not an admin
/// - `500 Internal Server Error`: one or more deletions failed
#[utoipa::path(
    delete,
    path = "/api/admin/users",
    request_body = ClearUsersRequest,
    responses(
        (status = 200, description = "Users removed", body = EmptyResponse),
        (status = 400, description = "Bad token", body = AdminErrorResponse),
        (status = 403, description = "Caller is not an admin", body = AdminErrorResponse),
        (status = 500, description = "One or more deletions failed", body = AdminErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[tracing::instrument(skip(state, headers, payload))]
pub async fn clear_users(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Option<Json<ClearUsersRequest>>,
) -> impl IntoResponse {
	let body_token = payload.as_ref().and_then(|Json(body)| body.token.clone());
	let token = bearer_token(&headers, body_token.as_deref());
	let admin = match require_admin(&state, token.as_deref()).await {
		Ok(admin) => admin,
		Err(e) => return e.into_response(),
	};

	let outcome = deprovision_all(&state.identity, &state.profile, &admin.id).await;
	tracing::info!(
		deleted = outcome.deleted,
		errors = outcome.errors,
		admin = %admin.id,
		"Deprovisioning sweep finished"
	);

	if outcome.errors > 0 {
		return internal_error::<AdminErrorResponse>("Failed to remove all users").into_response();
	}

	(StatusCode::OK, Json(EmptyResponse::default())).into_response()
}
