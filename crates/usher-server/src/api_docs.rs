// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for the Usher HTTP API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
	paths(
		crate::routes::health::health_check,
		crate::routes::onboarding::validate_email,
		crate::routes::onboarding::accept_invite,
		crate::routes::admin::invite_user,
		crate::routes::admin::create_user,
		crate::routes::admin::add_admin_role,
		crate::routes::admin::clear_users,
		crate::routes::events::account_created,
	),
	components(schemas(
		usher_server_api::EmptyResponse,
		usher_server_api::ValidateEmailRequest,
		usher_server_api::AcceptInviteRequest,
		usher_server_api::OnboardingErrorResponse,
		usher_server_api::InviteUserRequest,
		usher_server_api::CreateUserRequest,
		usher_server_api::AddAdminRoleRequest,
		usher_server_api::ClearUsersRequest,
		usher_server_api::AccountResponse,
		usher_server_api::AdminErrorResponse,
		usher_server_api::AccountCreatedEvent,
		usher_server_api::EventsErrorResponse,
		usher_server_api::HealthStatus,
		usher_server_api::ComponentStatus,
		usher_server_api::HealthComponents,
		usher_server_api::HealthResponse,
		usher_common_version::HealthVersionInfo,
	)),
	modifiers(&SecurityAddon),
	tags(
		(name = "onboarding", description = "Public invite acceptance and email validation"),
		(name = "admin", description = "Admin-guarded user management"),
		(name = "events", description = "Inbound webhooks from the identity gateway"),
		(name = "health", description = "Service health"),
	),
	info(
		title = "Usher API",
		description = "Invite-based user onboarding service",
	)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		if let Some(components) = openapi.components.as_mut() {
			components.add_security_scheme(
				"bearer_auth",
				SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn openapi_document_includes_every_route() {
		let doc = ApiDoc::openapi();
		let paths = &doc.paths.paths;
		for path in [
			"/health",
			"/api/onboarding/validate-email",
			"/api/onboarding/accept-invite",
			"/api/admin/invites",
			"/api/admin/users",
			"/api/admin/users/admin-role",
			"/api/events/account-created",
		] {
			assert!(paths.contains_key(path), "missing path: {path}");
		}
	}
}
