// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! REST client for the hosted Profile Store.
//!
//! The store is a JSON tree: `GET/PUT/PATCH/DELETE {base}/{path}.json`
//! operate on a node, `POST {base}/{path}.json` appends a child under a
//! store-generated key and answers `{"name": "<key>"}`. A read of an absent
//! node answers `null` rather than 404.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument};
use usher_common_secret::SecretString;

use crate::error::ProfileError;
use crate::types::{InviteRecord, ProfileChanges, UserProfile};
use crate::ProfileStore;

const DEFAULT_BASE_URL: &str = "http://localhost:9000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROFILE_TREE: &str = "users";
const INVITE_TREE: &str = "invites";

#[derive(Debug, Deserialize)]
struct PushResponse {
	name: String,
}

/// Client for the Profile Store JSON-tree API.
///
/// One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct RestProfileStore {
	http_client: Client,
	base_url: String,
	service_key: Option<SecretString>,
}

impl RestProfileStore {
	/// Creates a new store client with the default request timeout.
	pub fn new(service_key: Option<SecretString>) -> Self {
		Self::with_timeout(service_key, DEFAULT_TIMEOUT)
	}

	/// Creates a new store client with a custom request timeout.
	pub fn with_timeout(service_key: Option<SecretString>, timeout: Duration) -> Self {
		let http_client = Client::builder()
			.timeout(timeout)
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			base_url: DEFAULT_BASE_URL.to_string(),
			service_key,
		}
	}

	/// Sets a custom base URL for the store (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{path}.json", self.base_url.trim_end_matches('/'))
	}

	fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
		match &self.service_key {
			Some(key) => builder.query(&[("auth", key.expose())]),
			None => builder,
		}
	}

	async fn send(&self, builder: RequestBuilder) -> Result<Response, ProfileError> {
		let response = self.authorize(builder).send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Profile store request timed out");
				return ProfileError::Timeout;
			}
			error!(error = %e, "Network error during profile store request");
			ProfileError::Network(e)
		})?;

		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let status_code = status.as_u16();
		let body = response.text().await.unwrap_or_default();

		if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
			error!(status = status_code, "Profile store rejected credentials");
			return Err(ProfileError::Unauthorized);
		}

		error!(status = status_code, body = %body, "Profile store error");
		Err(ProfileError::Api {
			status: status_code,
			message: body,
		})
	}

	/// Read a node; the store answers `null` for absent keys.
	async fn read_node<T: serde::de::DeserializeOwned>(
		&self,
		path: &str,
	) -> Result<Option<T>, ProfileError> {
		let response = self.send(self.http_client.get(self.url(path))).await?;
		let body = response.text().await.map_err(ProfileError::Network)?;
		serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, path = %path, "Failed to parse profile store node");
			ProfileError::InvalidResponse(format!("JSON parse error: {e}"))
		})
	}
}

#[async_trait]
impl ProfileStore for RestProfileStore {
	#[instrument(skip(self), fields(account_id = %account_id))]
	async fn get_profile(&self, account_id: &str) -> Result<Option<UserProfile>, ProfileError> {
		self.read_node(&format!("{PROFILE_TREE}/{account_id}")).await
	}

	#[instrument(skip(self, profile), fields(account_id = %account_id))]
	async fn put_profile(
		&self,
		account_id: &str,
		profile: &UserProfile,
	) -> Result<(), ProfileError> {
		debug!("writing profile record");
		self
			.send(
				self
					.http_client
					.put(self.url(&format!("{PROFILE_TREE}/{account_id}")))
					.json(profile),
			)
			.await?;
		Ok(())
	}

	#[instrument(skip(self, changes), fields(account_id = %account_id))]
	async fn update_profile(
		&self,
		account_id: &str,
		changes: &ProfileChanges,
	) -> Result<(), ProfileError> {
		debug!("patching profile record");
		self
			.send(
				self
					.http_client
					.patch(self.url(&format!("{PROFILE_TREE}/{account_id}")))
					.json(changes),
			)
			.await?;
		Ok(())
	}

	#[instrument(skip(self), fields(account_id = %account_id))]
	async fn remove_profile(&self, account_id: &str) -> Result<(), ProfileError> {
		debug!("removing profile record");
		self
			.send(
				self
					.http_client
					.delete(self.url(&format!("{PROFILE_TREE}/{account_id}"))),
			)
			.await?;
		Ok(())
	}

	#[instrument(skip(self, record), fields(email = %record.email))]
	async fn create_invite(&self, record: &InviteRecord) -> Result<String, ProfileError> {
		debug!("pushing invite record");
		let response = self
			.send(self.http_client.post(self.url(INVITE_TREE)).json(record))
			.await?;
		let body = response.text().await.map_err(ProfileError::Network)?;
		let push: PushResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse push key response");
			ProfileError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;
		Ok(push.name)
	}

	#[instrument(skip(self), fields(invite_key = %key))]
	async fn get_invite(&self, key: &str) -> Result<Option<InviteRecord>, ProfileError> {
		self.read_node(&format!("{INVITE_TREE}/{key}")).await
	}

	#[instrument(skip(self), fields(invite_key = %key))]
	async fn delete_invite(&self, key: &str) -> Result<bool, ProfileError> {
		// The tree answers the deleted node's prior value; null means the
		// record was already gone.
		let existing: Option<InviteRecord> = self.read_node(&format!("{INVITE_TREE}/{key}")).await?;
		self
			.send(
				self
					.http_client
					.delete(self.url(&format!("{INVITE_TREE}/{key}"))),
			)
			.await?;
		Ok(existing.is_some())
	}
}
