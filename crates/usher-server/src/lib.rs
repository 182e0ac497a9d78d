// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Usher invitation and onboarding server.
//!
//! This crate provides the HTTP server that brokers user onboarding between
//! the Identity Gateway, the Profile Store, and the SMTP notifier.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth;
pub mod email;
pub mod provisioning;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use usher_server_config::ServerConfig;
