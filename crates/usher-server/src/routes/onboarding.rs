// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Public onboarding HTTP handlers.
//!
//! Implements the two endpoints the client application calls before a user
//! has a session: email availability validation and invite acceptance.
//!
//! # Security
//!
//! - `accept_invite` is authenticated by the invite token alone; the token
//!   is compared against the stored Invite Record and against the copy in
//!   the invitee's account claims.
//! - An Invite Record is consumed at most once; consumption deletes it.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use usher_server_api::{
	AcceptInviteRequest, EmptyResponse, OnboardingErrorResponse, ValidateEmailRequest,
};
use usher_server_config::EmailCollisionPolicy;
use usher_server_identity::AccountUpdate;
use usher_server_profile::{display_name, UserProfile};

use crate::{
	api::AppState,
	api_response::{bad_request, conflict, internal_error},
	impl_api_error_response,
	provisioning::email_available,
};

impl_api_error_response!(OnboardingErrorResponse);

/// Check whether an email address is free to sign up with.
///
/// # Response
///
/// `200 {}` when the address is available. The check is fail-open: a gateway
/// lookup failure counts as available.
///
/// # Errors
///
/// - `400 Bad Request`: the address already has an account or a pending
///   invitation
#[utoipa::path(
    post,
    path = "/api/onboarding/validate-email",
    request_body = ValidateEmailRequest,
    responses(
        (status = 200, description = "Email is available", body = EmptyResponse),
        (status = 400, description = "Email is taken", body = OnboardingErrorResponse)
    ),
    tag = "onboarding"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn validate_email(
	State(state): State<AppState>,
	Json(payload): Json<ValidateEmailRequest>,
) -> impl IntoResponse {
	if email_available(state.identity.as_ref(), &payload.email).await {
		(StatusCode::OK, Json(EmptyResponse::default())).into_response()
	} else {
		bad_request::<OnboardingErrorResponse>(
			"email_in_use",
			"Email is already in use or has been invited",
		)
		.into_response()
	}
}

/// Accept an invitation and finish onboarding.
///
/// # Request
///
/// Body ([`AcceptInviteRequest`]): the invite key and token from the emailed
/// link, plus the credentials and names the acceptor chose. The submitted
/// email may differ from the invited address.
///
/// # Errors
///
/// - `400 Bad Request`: unknown invite key, or token mismatch
/// - `409 Conflict`: invitation already accepted, or the chosen email
///   collides with another account
/// - `500 Internal Server Error`: the invited account cannot be resolved, or
///   an upstream write failed
#[utoipa::path(
    post,
    path = "/api/onboarding/accept-invite",
    request_body = AcceptInviteRequest,
    responses(
        (status = 200, description = "Invitation accepted", body = EmptyResponse),
        (status = 400, description = "Invalid invitation or token", body = OnboardingErrorResponse),
        (status = 409, description = "Already accepted or email in use", body = OnboardingErrorResponse),
        (status = 500, description = "Upstream failure", body = OnboardingErrorResponse)
    ),
    tag = "onboarding"
)]
#[tracing::instrument(skip(state, payload), fields(invite_id = %payload.invite_id))]
pub async fn accept_invite(
	State(state): State<AppState>,
	Json(payload): Json<AcceptInviteRequest>,
) -> impl IntoResponse {
	// 1. The Invite Record must still exist; a consumed invite is gone.
	let record = match state.profile.get_invite(&payload.invite_id).await {
		Ok(Some(record)) => record,
		Ok(None) => {
			return bad_request::<OnboardingErrorResponse>(
				"invitation_not_found",
				"Could not find invitation",
			)
			.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to read invite record");
			return internal_error::<OnboardingErrorResponse>("Could not read invitation")
				.into_response();
		}
	};

	// 2. Token comparison comes before everything else about the acceptor.
	if payload.token != record.token {
		tracing::warn!(invite_id = %payload.invite_id, "Invite token mismatch");
		return bad_request::<OnboardingErrorResponse>("token_mismatch", "Tokens do not match")
			.into_response();
	}

	// 3. Resolve the provisioned account via the invited (not submitted)
	// email.
	let invited = match state.identity.get_account_by_email(&record.email).await {
		Ok(Some(account)) => account,
		Ok(None) => {
			tracing::error!(invite_id = %payload.invite_id, "Invited account is missing");
			return internal_error::<OnboardingErrorResponse>("No invited user found")
				.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up invited account");
			return internal_error::<OnboardingErrorResponse>("No invited user found")
				.into_response();
		}
	};

	// 4. Single-use guard: the claim copy of the token is cleared exactly
	// once, at the first successful acceptance.
	if !invited.claims.has_pending_invite() {
		return conflict::<OnboardingErrorResponse>(
			"already_accepted",
			"User has already accepted invitation",
		)
		.into_response();
	}

	// 5. Collision check on the submitted email, per the configured policy.
	// The lookup is fail-open like the availability check.
	match state.identity.get_account_by_email(&payload.email).await {
		Ok(Some(found)) => {
			let collision = match state.invites.collision_policy {
				EmailCollisionPolicy::PendingClaim => {
					found.id != invited.id && found.claims.has_pending_invite()
				}
				EmailCollisionPolicy::DistinctAccount => found.id != invited.id,
			};
			if collision {
				return conflict::<OnboardingErrorResponse>(
					"email_in_use",
					"Email already in use",
				)
				.into_response();
			}
		}
		Ok(None) => {}
		Err(e) => {
			tracing::warn!(error = %e, "Email collision lookup failed, continuing");
		}
	}

	// 6. Consume: update credentials, clear the claim, overwrite the profile,
	// delete the record. The display name is recomputed from the submitted
	// names so the gateway and the Profile Record stay in step.
	if let Err(e) = state
		.identity
		.update_account(
			&invited.id,
			AccountUpdate {
				email: Some(payload.email.clone()),
				password: Some(payload.password.clone()),
				display_name: Some(display_name(&payload.first_name, &payload.last_name)),
			},
		)
		.await
	{
		tracing::error!(error = %e, account_id = %invited.id, "Failed to update invited account");
		return internal_error::<OnboardingErrorResponse>("Could not accept invitation")
			.into_response();
	}

	let mut claims = invited.claims.clone();
	claims.invite_token = None;
	if let Err(e) = state.identity.set_claims(&invited.id, claims).await {
		tracing::error!(error = %e, account_id = %invited.id, "Failed to clear invite claim");
		return internal_error::<OnboardingErrorResponse>("Could not accept invitation")
			.into_response();
	}

	let profile = UserProfile::new(None, &payload.first_name, &payload.last_name);
	if let Err(e) = state
		.profile
		.put_profile(invited.id.as_str(), &profile)
		.await
	{
		tracing::error!(error = %e, account_id = %invited.id, "Failed to write profile record");
		return internal_error::<OnboardingErrorResponse>("Could not accept invitation")
			.into_response();
	}

	match state.profile.delete_invite(&payload.invite_id).await {
		Ok(true) => {}
		Ok(false) => {
			// A concurrent accept got to the record first; the mutations above
			// already happened, so report success.
			tracing::warn!(invite_id = %payload.invite_id, "Invite record already consumed");
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to delete invite record");
			return internal_error::<OnboardingErrorResponse>("Could not accept invitation")
				.into_response();
		}
	}

	tracing::info!(account_id = %invited.id, invite_id = %payload.invite_id, "Invitation accepted");

	(StatusCode::OK, Json(EmptyResponse::default())).into_response()
}
