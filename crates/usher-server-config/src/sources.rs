// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML file, and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};
use usher_common_secret::load_secret_env;

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	EmailCollisionPolicy, EventsConfigLayer, HttpConfigLayer, IdentityConfigLayer,
	InvitesConfigLayer, LoggingConfigLayer, ProfileConfigLayer, SmtpConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/usher/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: USHER_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			identity: Some(load_identity_from_env()?),
			profile: Some(load_profile_from_env()?),
			smtp: Some(load_smtp_from_env()?),
			invites: Some(load_invites_from_env()?),
			events: Some(load_events_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("USHER_SERVER_HOST"),
		port: env_u16("USHER_SERVER_PORT")?,
		base_url: env_var("USHER_SERVER_BASE_URL"),
	})
}

fn load_identity_from_env() -> Result<IdentityConfigLayer, ConfigError> {
	Ok(IdentityConfigLayer {
		base_url: env_var("USHER_SERVER_IDENTITY_BASE_URL"),
		service_key: load_secret_env("USHER_SERVER_IDENTITY_SERVICE_KEY")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		request_timeout_secs: env_u64("USHER_SERVER_IDENTITY_REQUEST_TIMEOUT_SECS")?,
	})
}

fn load_profile_from_env() -> Result<ProfileConfigLayer, ConfigError> {
	Ok(ProfileConfigLayer {
		base_url: env_var("USHER_SERVER_PROFILE_BASE_URL"),
		service_key: load_secret_env("USHER_SERVER_PROFILE_SERVICE_KEY")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		request_timeout_secs: env_u64("USHER_SERVER_PROFILE_REQUEST_TIMEOUT_SECS")?,
	})
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	Ok(SmtpConfigLayer {
		host: env_var("USHER_SERVER_SMTP_HOST"),
		port: env_u16("USHER_SERVER_SMTP_PORT")?,
		username: env_var("USHER_SERVER_SMTP_USERNAME"),
		password: load_secret_env("USHER_SERVER_SMTP_PASSWORD")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		from_address: env_var("USHER_SERVER_SMTP_FROM_ADDRESS"),
		from_name: env_var("USHER_SERVER_SMTP_FROM_NAME"),
		use_tls: env_bool("USHER_SERVER_SMTP_USE_TLS"),
	})
}

fn load_invites_from_env() -> Result<InvitesConfigLayer, ConfigError> {
	let collision_policy = match env_var("USHER_SERVER_INVITES_COLLISION_POLICY") {
		Some(v) => match v.to_lowercase().as_str() {
			"pending-claim" => Some(EmailCollisionPolicy::PendingClaim),
			"distinct-account" => Some(EmailCollisionPolicy::DistinctAccount),
			_ => {
				return Err(ConfigError::InvalidValue {
					key: "USHER_SERVER_INVITES_COLLISION_POLICY".to_string(),
					message: format!(
						"unknown policy '{v}' (expected 'pending-claim' or 'distinct-account')"
					),
				})
			}
		},
		None => None,
	};

	Ok(InvitesConfigLayer {
		send_email: env_bool("USHER_SERVER_INVITES_SEND_EMAIL"),
		client_url: env_var("USHER_SERVER_INVITES_CLIENT_URL"),
		accept_path: env_var("USHER_SERVER_INVITES_ACCEPT_PATH"),
		collision_policy,
	})
}

fn load_events_from_env() -> Result<EventsConfigLayer, ConfigError> {
	Ok(EventsConfigLayer {
		webhook_token: load_secret_env("USHER_SERVER_EVENTS_WEBHOOK_TOKEN")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("USHER_SERVER_LOG_LEVEL"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let source = DefaultsSource;
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.identity.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_parses_sections() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			r#"
[http]
port = 9090

[invites]
send_email = true
collision_policy = "pending-claim"
"#,
		)
		.unwrap();

		let layer = TomlSource::new(&path).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9090));
		let invites = layer.invites.unwrap();
		assert_eq!(invites.send_email, Some(true));
		assert_eq!(
			invites.collision_policy,
			Some(EmailCollisionPolicy::PendingClaim)
		);
	}
}
