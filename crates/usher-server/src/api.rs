// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use usher_server_config::{EventsConfig, InvitesConfig, ServerConfig};
use usher_server_identity::{IdentityGateway, RestIdentityGateway};
use usher_server_profile::{ProfileStore, RestProfileStore};
use usher_server_smtp::{Mailer, SmtpClient};

use crate::routes;

/// Application state shared across handlers.
///
/// The upstream clients are trait objects so tests can swap in the in-memory
/// doubles; there is no other cross-request shared mutable state.
#[derive(Clone)]
pub struct AppState {
	pub identity: Arc<dyn IdentityGateway>,
	pub profile: Arc<dyn ProfileStore>,
	pub mailer: Option<Arc<dyn Mailer>>,
	pub invites: InvitesConfig,
	pub events: EventsConfig,
}

/// Creates the application state, initializing optional components.
pub fn create_app_state(config: &ServerConfig) -> AppState {
	let identity: Arc<dyn IdentityGateway> = Arc::new(
		RestIdentityGateway::with_timeout(
			config.identity.service_key.clone(),
			Duration::from_secs(config.identity.request_timeout_secs),
		)
		.with_base_url(config.identity.base_url.clone()),
	);

	let profile: Arc<dyn ProfileStore> = Arc::new(
		RestProfileStore::with_timeout(
			config.profile.service_key.clone(),
			Duration::from_secs(config.profile.request_timeout_secs),
		)
		.with_base_url(config.profile.base_url.clone()),
	);

	let mailer = initialize_smtp_client(config);

	AppState {
		identity,
		profile,
		mailer,
		invites: config.invites.clone(),
		events: config.events.clone(),
	}
}

/// Initialize the SMTP client if configured.
fn initialize_smtp_client(config: &ServerConfig) -> Option<Arc<dyn Mailer>> {
	let smtp = config.smtp.as_ref()?;

	let smtp_config = usher_server_smtp::SmtpConfig {
		host: smtp.host.clone(),
		port: smtp.port,
		username: smtp.username.clone(),
		password: smtp.password.clone(),
		from_address: smtp.from_address.clone(),
		from_name: smtp.from_name.clone(),
		use_tls: smtp.use_tls,
	};

	match SmtpClient::new(smtp_config) {
		Ok(client) => {
			tracing::info!("SMTP client configured");
			Some(Arc::new(client))
		}
		Err(e) => {
			tracing::warn!(error = %e, "Failed to create SMTP client");
			None
		}
	}
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	let router = Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/onboarding/validate-email",
			post(routes::onboarding::validate_email),
		)
		.route(
			"/api/onboarding/accept-invite",
			post(routes::onboarding::accept_invite),
		)
		.route("/api/admin/invites", post(routes::admin::invite_user))
		.route(
			"/api/admin/users",
			post(routes::admin::create_user).delete(routes::admin::clear_users),
		)
		.route(
			"/api/admin/users/admin-role",
			post(routes::admin::add_admin_role),
		)
		.route(
			"/api/events/account-created",
			post(routes::events::account_created),
		)
		.with_state(state);

	router.merge(
		SwaggerUi::new("/api/docs").url("/api/openapi.json", crate::api_docs::ApiDoc::openapi()),
	)
}
