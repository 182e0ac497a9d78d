// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Usher onboarding server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`USHER_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use usher_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub identity: IdentityConfig,
	pub profile: ProfileConfig,
	pub smtp: Option<SmtpConfig>,
	pub invites: InvitesConfig,
	pub events: EventsConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`USHER_SERVER_*`)
/// 2. Config file (`/etc/usher/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layers into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let identity = layer.identity.unwrap_or_default().finalize();
	let profile = layer.profile.unwrap_or_default().finalize();
	let invites = layer.invites.unwrap_or_default().finalize();
	let events = layer.events.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	let smtp = layer.smtp.and_then(|l| l.finalize());

	validate_config(&invites, smtp.as_ref())?;

	info!(
		host = %http.host,
		port = http.port,
		identity_url = %identity.base_url,
		profile_url = %profile.base_url,
		smtp_configured = smtp.is_some(),
		invite_email_enabled = invites.send_email,
		events_token_configured = events.webhook_token.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		identity,
		profile,
		smtp,
		invites,
		events,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(invites: &InvitesConfig, smtp: Option<&SmtpConfig>) -> Result<(), ConfigError> {
	if invites.send_email && smtp.is_none() {
		return Err(ConfigError::Validation(
			"USHER_SERVER_INVITES_SEND_EMAIL=1 is set but no SMTP host/from address is \
			 configured. Configure USHER_SERVER_SMTP_HOST and USHER_SERVER_SMTP_FROM_ADDRESS, \
			 or disable invite emails."
				.to_string(),
		));
	}

	Ok(())
}
