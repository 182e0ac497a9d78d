// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The top-level partial configuration layer, one field per section.

use serde::Deserialize;

use crate::sections::{
	EventsConfigLayer, HttpConfigLayer, IdentityConfigLayer, InvitesConfigLayer, LoggingConfigLayer,
	ProfileConfigLayer, SmtpConfigLayer,
};

/// Partial server configuration as parsed from one source. Sources are
/// merged in precedence order before finalizing into `ServerConfig`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub identity: Option<IdentityConfigLayer>,
	#[serde(default)]
	pub profile: Option<ProfileConfigLayer>,
	#[serde(default)]
	pub smtp: Option<SmtpConfigLayer>,
	#[serde(default)]
	pub invites: Option<InvitesConfigLayer>,
	#[serde(default)]
	pub events: Option<EventsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if let Some(other_http) = other.http {
			self.http.get_or_insert_with(Default::default).merge(other_http);
		}
		if let Some(other_identity) = other.identity {
			self
				.identity
				.get_or_insert_with(Default::default)
				.merge(other_identity);
		}
		if let Some(other_profile) = other.profile {
			self
				.profile
				.get_or_insert_with(Default::default)
				.merge(other_profile);
		}
		if let Some(other_smtp) = other.smtp {
			self.smtp.get_or_insert_with(Default::default).merge(other_smtp);
		}
		if let Some(other_invites) = other.invites {
			self
				.invites
				.get_or_insert_with(Default::default)
				.merge(other_invites);
		}
		if let Some(other_events) = other.events {
			self
				.events
				.get_or_insert_with(Default::default)
				.merge(other_events);
		}
		if let Some(other_logging) = other.logging {
			self
				.logging
				.get_or_insert_with(Default::default)
				.merge(other_logging);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_into_empty_layer() {
		let mut base = ServerConfigLayer::default();
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9090),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(base.http.unwrap().port, Some(9090));
	}

	#[test]
	fn test_merge_overlays_per_field() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: Some("0.0.0.0".to_string()),
				port: Some(80),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(8443),
				..Default::default()
			}),
			..Default::default()
		});
		let http = base.http.unwrap();
		assert_eq!(http.host, Some("0.0.0.0".to_string()));
		assert_eq!(http.port, Some(8443));
	}
}
