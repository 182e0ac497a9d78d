// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use usher_common_version::HealthVersionInfo;
use usher_server_api::{ComponentStatus, HealthComponents, HealthResponse, HealthStatus};
use usher_server_profile::now_millis;

use crate::api::AppState;

/// Report process liveness and which components are configured.
///
/// Configuration status only; no live probes against the upstreams.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let response = HealthResponse {
		status: HealthStatus::Healthy,
		timestamp: now_millis(),
		components: HealthComponents {
			identity_gateway: ComponentStatus { configured: true },
			profile_store: ComponentStatus { configured: true },
			smtp: ComponentStatus {
				configured: state.mailer.is_some(),
			},
		},
		version: HealthVersionInfo::current(),
	};

	(StatusCode::OK, Json(response))
}
