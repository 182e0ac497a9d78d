// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! REST client for the hosted Identity Gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, instrument};
use usher_common_secret::SecretString;

use crate::error::IdentityError;
use crate::types::{
	Account, AccountId, AccountPage, AccountUpdate, AccountClaims, NewAccount, VerifiedToken,
};
use crate::IdentityGateway;

const DEFAULT_BASE_URL: &str = "http://localhost:9099";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct VerifyTokenRequest<'a> {
	token: &'a str,
}

/// Client for the Identity Gateway REST API.
///
/// One attempt per call, no retries: upstream failures surface to the
/// handler that made the call.
#[derive(Debug, Clone)]
pub struct RestIdentityGateway {
	http_client: Client,
	base_url: String,
	service_key: Option<SecretString>,
}

impl RestIdentityGateway {
	/// Creates a new gateway client with the default request timeout.
	pub fn new(service_key: Option<SecretString>) -> Self {
		Self::with_timeout(service_key, DEFAULT_TIMEOUT)
	}

	/// Creates a new gateway client with a custom request timeout.
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

	/// Sets a custom base URL for the gateway (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn url(&self, path: &str) -> String {
		format!("{}{path}", self.base_url.trim_end_matches('/'))
	}

	fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
		match &self.service_key {
			Some(key) => builder.bearer_auth(key.expose()),
			None => builder,
		}
	}

	async fn send(&self, builder: RequestBuilder) -> Result<Response, IdentityError> {
		let response = self.authorize(builder).send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Identity gateway request timed out");
				return IdentityError::Timeout;
			}
			error!(error = %e, "Network error during identity gateway request");
			IdentityError::Network(e)
		})?;
		Ok(response)
	}

	/// Map a non-success status to an error. 404 is handled by callers that
	/// treat it as expected absence.
	async fn error_for_status(&self, response: Response) -> Result<Response, IdentityError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let status_code = status.as_u16();
		let body = response.text().await.unwrap_or_default();

		if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
			error!(status = status_code, "Identity gateway rejected service key");
			return Err(IdentityError::Unauthorized);
		}

		error!(status = status_code, body = %body, "Identity gateway error");
		Err(IdentityError::Api {
			status: status_code,
			message: body,
		})
	}

	async fn parse<T: serde::de::DeserializeOwned>(
		&self,
		response: Response,
	) -> Result<T, IdentityError> {
		let body = response.text().await.map_err(IdentityError::Network)?;
		serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse identity gateway response");
			IdentityError::InvalidResponse(format!("JSON parse error: {e}"))
		})
	}

	/// Fetch a single account, translating 404 into `None`.
	async fn fetch_optional_account(
		&self,
		builder: RequestBuilder,
	) -> Result<Option<Account>, IdentityError> {
		let response = self.send(builder).await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		let response = self.error_for_status(response).await?;
		Ok(Some(self.parse(response).await?))
	}
}

#[async_trait]
impl IdentityGateway for RestIdentityGateway {
	#[instrument(skip(self, new_account), fields(email = %new_account.email))]
	async fn create_account(&self, new_account: NewAccount) -> Result<Account, IdentityError> {
		debug!("creating account");
		let response = self
			.send(self.http_client.post(self.url("/v1/accounts")).json(&new_account))
			.await?;
		let response = self.error_for_status(response).await?;
		self.parse(response).await
	}

	#[instrument(skip(self), fields(account_id = %id))]
	async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, IdentityError> {
		self
			.fetch_optional_account(self.http_client.get(self.url(&format!("/v1/accounts/{id}"))))
			.await
	}

	#[instrument(skip(self, email))]
	async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
		self
			.fetch_optional_account(
				self
					.http_client
					.get(self.url("/v1/accounts/lookup"))
					.query(&[("email", email)]),
			)
			.await
	}

	#[instrument(skip(self, update), fields(account_id = %id))]
	async fn update_account(
		&self,
		id: &AccountId,
		update: AccountUpdate,
	) -> Result<Account, IdentityError> {
		debug!("updating account");
		let response = self
			.send(
				self
					.http_client
					.patch(self.url(&format!("/v1/accounts/{id}")))
					.json(&update),
			)
			.await?;
		let response = self.error_for_status(response).await?;
		self.parse(response).await
	}

	#[instrument(skip(self, claims), fields(account_id = %id))]
	async fn set_claims(&self, id: &AccountId, claims: AccountClaims) -> Result<(), IdentityError> {
		debug!("setting account claims");
		let response = self
			.send(
				self
					.http_client
					.put(self.url(&format!("/v1/accounts/{id}/claims")))
					.json(&claims),
			)
			.await?;
		self.error_for_status(response).await?;
		Ok(())
	}

	#[instrument(skip(self), fields(account_id = %id))]
	async fn delete_account(&self, id: &AccountId) -> Result<bool, IdentityError> {
		debug!("deleting account");
		let response = self
			.send(self.http_client.delete(self.url(&format!("/v1/accounts/{id}"))))
			.await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Ok(false);
		}
		self.error_for_status(response).await?;
		Ok(true)
	}

	#[instrument(skip(self, page_token))]
	async fn list_accounts(
		&self,
		page_size: u32,
		page_token: Option<&str>,
	) -> Result<AccountPage, IdentityError> {
		let mut builder = self
			.http_client
			.get(self.url("/v1/accounts"))
			.query(&[("page_size", page_size.to_string())]);
		if let Some(token) = page_token {
			builder = builder.query(&[("page_token", token)]);
		}

		let response = self.send(builder).await?;
		let response = self.error_for_status(response).await?;
		self.parse(response).await
	}

	#[instrument(skip(self, token))]
	async fn verify_token(&self, token: &str) -> Result<VerifiedToken, IdentityError> {
		let response = self
			.send(
				self
					.http_client
					.post(self.url("/v1/tokens/verify"))
					.json(&VerifyTokenRequest { token }),
			)
			.await?;

		// The gateway answers 200 with an empty subject for tokens it cannot
		// verify; some deployments answer 400/401 instead.
		let status = response.status();
		if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
			return Ok(VerifiedToken::default());
		}
		let response = self.error_for_status(response).await?;
		self.parse(response).await
	}
}
