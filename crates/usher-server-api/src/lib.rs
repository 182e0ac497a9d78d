// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for the Usher onboarding HTTP API.
//!
//! Everything here is pure data: the server crate owns the handlers, clients
//! may depend on this crate alone. Wire casing is camelCase throughout.

pub mod admin;
pub mod events;
pub mod health;
pub mod onboarding;

pub use admin::{
	AccountResponse, AddAdminRoleRequest, AdminErrorResponse, ClearUsersRequest,
	CreateUserRequest, InviteUserRequest,
};
pub use events::{AccountCreatedEvent, EventsErrorResponse};
pub use health::{ComponentStatus, HealthComponents, HealthResponse, HealthStatus};
pub use onboarding::{AcceptInviteRequest, OnboardingErrorResponse, ValidateEmailRequest};

use serde::Serialize;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Success body for operations with nothing to report. Serializes to `{}`.
#[derive(Debug, Default, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EmptyResponse {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_response_is_empty_object() {
		assert_eq!(serde_json::to_string(&EmptyResponse::default()).unwrap(), "{}");
	}
}
