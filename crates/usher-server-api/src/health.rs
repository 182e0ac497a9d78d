// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check response types.

use serde::Serialize;
use usher_common_version::HealthVersionInfo;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Degraded,
}

/// Configuration state of one upstream dependency.
#[derive(Debug, Clone, Copy, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ComponentStatus {
	pub configured: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthComponents {
	pub identity_gateway: ComponentStatus,
	pub profile_store: ComponentStatus,
	pub smtp: ComponentStatus,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	pub status: HealthStatus,
	/// Unix timestamp in milliseconds.
	pub timestamp: i64,
	pub components: HealthComponents,
	pub version: HealthVersionInfo,
}
