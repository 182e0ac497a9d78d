// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Inbound event webhook handlers.

use axum::{extract::State, http::{HeaderMap, StatusCode}, response::IntoResponse, Json};

use usher_server_api::{AccountCreatedEvent, EmptyResponse, EventsErrorResponse};
use usher_server_profile::{display_name, now_millis, ProfileChanges};

use crate::{
	api::AppState,
	api_response::unauthorized,
	auth::bearer_token,
	impl_api_error_response,
};

impl_api_error_response!(EventsErrorResponse);

/// Webhook for account-created notifications from the Identity Gateway.
///
/// Recomputes the account's display name from its Profile Record and stamps a
/// fresh refresh time. The handler is best-effort past authentication: a
/// missing profile or a failed update is logged and still answered `200 {}`,
/// because the sender retries on failure and the sync is advisory.
///
/// # Authorization
///
/// When a webhook token is configured, the request must carry it as a bearer
/// token; otherwise the endpoint is open.
#[utoipa::path(
    post,
    path = "/api/events/account-created",
    request_body = AccountCreatedEvent,
    responses(
        (status = 200, description = "Event accepted", body = EmptyResponse),
        (status = 401, description = "Bad webhook token", body = EventsErrorResponse)
    ),
    tag = "events"
)]
#[tracing::instrument(skip(state, headers, payload), fields(account_id = %payload.account_id))]
pub async fn account_created(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<AccountCreatedEvent>,
) -> impl IntoResponse {
	if let Some(expected) = &state.events.webhook_token {
		let presented = bearer_token(&headers, None);
		if presented.as_deref() != Some(expected.expose().as_str()) {
			tracing::warn!("Account-created event with bad webhook token");
			return unauthorized::<EventsErrorResponse>("unauthorized", "Invalid event token")
				.into_response();
		}
	}

	let profile = match state.profile.get_profile(&payload.account_id).await {
		Ok(Some(profile)) => profile,
		Ok(None) => {
			tracing::info!("Account-created event for account without a profile record");
			return (StatusCode::OK, Json(EmptyResponse::default())).into_response();
		}
		Err(e) => {
			tracing::warn!(error = %e, "Failed to read profile record for event");
			return (StatusCode::OK, Json(EmptyResponse::default())).into_response();
		}
	};

	let changes = ProfileChanges {
		display_name: Some(display_name(&profile.first_name, &profile.last_name)),
		refresh_time: Some(now_millis()),
	};
	if let Err(e) = state.profile.update_profile(&payload.account_id, &changes).await {
		tracing::warn!(error = %e, "Failed to sync profile record for event");
	}

	(StatusCode::OK, Json(EmptyResponse::default())).into_response()
}
