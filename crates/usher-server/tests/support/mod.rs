// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	body::Body,
	http::{Method, Request},
	response::Response,
	Router,
};
use tower::ServiceExt;

use usher_server::api::{create_router, AppState};
use usher_server_config::{EmailCollisionPolicy, EventsConfig, InvitesConfig};
use usher_server_identity::testing::MemoryIdentityGateway;
use usher_server_identity::{Account, AccountClaims, AccountId};
use usher_server_profile::testing::MemoryProfileStore;
use usher_server_smtp::testing::MemoryMailer;

/// A seeded account together with a bearer token naming it.
pub struct TestCaller {
	pub id: AccountId,
	pub token: String,
}

/// The server wired to in-memory upstream doubles, plus direct handles to
/// those doubles for seeding and assertions.
pub struct TestApp {
	pub router: Router,
	pub identity: Arc<MemoryIdentityGateway>,
	pub profile: Arc<MemoryProfileStore>,
	pub mailer: Arc<MemoryMailer>,
	pub admin: TestCaller,
	pub member: TestCaller,
}

impl TestApp {
	pub fn new() -> Self {
		Self::build(EventsConfig::default(), default_invites(), MemoryMailer::new())
	}

	/// App whose event webhook requires the given shared token.
	pub fn with_webhook_token(token: &str) -> Self {
		let events = EventsConfig {
			webhook_token: Some(usher_common_secret::SecretString::new(token.to_string())),
		};
		Self::build(events, default_invites(), MemoryMailer::new())
	}

	/// App running invite acceptance under the given collision policy.
	pub fn with_collision_policy(policy: EmailCollisionPolicy) -> Self {
		let invites = InvitesConfig {
			collision_policy: policy,
			..default_invites()
		};
		Self::build(EventsConfig::default(), invites, MemoryMailer::new())
	}

	/// App whose SMTP client rejects every send.
	pub fn with_failing_mailer() -> Self {
		Self::build(EventsConfig::default(), default_invites(), MemoryMailer::failing())
	}

	fn build(events: EventsConfig, invites: InvitesConfig, mailer: MemoryMailer) -> Self {
		let identity = Arc::new(MemoryIdentityGateway::new());
		let profile = Arc::new(MemoryProfileStore::new());
		let mailer = Arc::new(mailer);

		let admin = seed_caller(
			&identity,
			"admin",
			"admin@example.com",
			AccountClaims {
				is_admin: true,
				..Default::default()
			},
		);
		let member = seed_caller(
			&identity,
			"member",
			"member@example.com",
			AccountClaims {
				is_member: true,
				..Default::default()
			},
		);

		let state = AppState {
			identity: identity.clone() as Arc<dyn usher_server_identity::IdentityGateway>,
			profile: profile.clone() as Arc<dyn usher_server_profile::ProfileStore>,
			mailer: Some(mailer.clone() as Arc<dyn usher_server_smtp::Mailer>),
			invites,
			events,
		};

		Self {
			router: create_router(state),
			identity,
			profile,
			mailer,
			admin,
			member,
		}
	}

	pub async fn get(&self, path: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.body(Body::empty())
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	pub async fn post(
		&self,
		path: &str,
		token: Option<&str>,
		body: serde_json::Value,
	) -> Response<Body> {
		self.request(Method::POST, path, token, Some(body)).await
	}

	pub async fn delete(
		&self,
		path: &str,
		token: Option<&str>,
		body: Option<serde_json::Value>,
	) -> Response<Body> {
		self.request(Method::DELETE, path, token, body).await
	}

	async fn request(
		&self,
		method: Method,
		path: &str,
		token: Option<&str>,
		body: Option<serde_json::Value>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);
		if let Some(token) = token {
			builder = builder.header("authorization", format!("Bearer {token}"));
		}
		let request_body = match body {
			Some(body) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&body).unwrap())
			}
			None => Body::empty(),
		};
		let request = builder.body(request_body).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}
}

fn default_invites() -> InvitesConfig {
	InvitesConfig {
		send_email: true,
		..Default::default()
	}
}

fn seed_caller(
	identity: &MemoryIdentityGateway,
	id: &str,
	email: &str,
	claims: AccountClaims,
) -> TestCaller {
	let id = AccountId::new(id);
	identity.add_account(Account {
		id: id.clone(),
		email: email.to_string(),
		display_name: None,
		claims,
	});
	let token = identity.issue_token(&id);
	TestCaller { id, token }
}

/// Read a JSON response body.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Let spawned fire-and-forget tasks run to completion on the test runtime.
pub async fn settle() {
	for _ in 0..50 {
		tokio::task::yield_now().await;
	}
}
