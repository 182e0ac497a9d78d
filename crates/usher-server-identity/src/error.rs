// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Identity Gateway client.

use thiserror::Error;

/// Errors that can occur when talking to the Identity Gateway.
///
/// Expected absence (unknown account id or email) is not an error; lookups
/// return `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum IdentityError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The gateway rejected our service credentials.
	#[error("Invalid service key")]
	Unauthorized,

	/// Invalid or unparseable response from the gateway.
	#[error("Invalid response from identity gateway: {0}")]
	InvalidResponse(String),

	/// The gateway returned an error status.
	#[error("Identity gateway error: {status} - {message}")]
	Api { status: u16, message: String },
}
