// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests of the invitation workflow: issue, email, accept.

mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{body_json, settle, TestApp};
use usher_server_config::EmailCollisionPolicy;
use usher_server_identity::IdentityGateway;
use usher_server_profile::{InviteRecord, ProfileStore};

#[tokio::test]
async fn available_email_validates_ok() {
	let app = TestApp::new();

	let response = app
		.post(
			"/api/onboarding/validate-email",
			None,
			json!({"email": "fresh@example.com"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn taken_email_fails_validation() {
	let app = TestApp::new();

	let response = app
		.post(
			"/api/onboarding/validate-email",
			None,
			json!({"email": "admin@example.com"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["message"], "Email is already in use or has been invited");
}

#[tokio::test]
async fn full_invitation_flow_for_a_manager() {
	let app = TestApp::new();

	let response = app
		.post(
			"/api/admin/invites",
			Some(&app.admin.token),
			json!({
				"email": "papa@example.com",
				"firstName": "Papa",
				"lastName": "Roach",
				"role": "manager"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	settle().await;

	// The placeholder account carries the role claim, the pending invite
	// token, and a derived display name.
	let invited = app
		.identity
		.get_account_by_email("papa@example.com")
		.await
		.unwrap()
		.unwrap();
	assert!(invited.claims.is_manager);
	assert!(!invited.claims.is_admin);
	let invite_token = invited.claims.invite_token.clone().unwrap();
	assert_eq!(invite_token.len(), 128);
	assert_eq!(invited.display_name.as_deref(), Some("Papa Roach"));
	assert_eq!(app.profile.invite_count(), 1);

	// The email carries the acceptance link ending in /<key>/<token>.
	let sent = app.mailer.sent_emails();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].to, "papa@example.com");
	assert_eq!(sent[0].subject, "You've been invited");
	let link = sent[0]
		.body_text
		.strip_prefix("Click here to create your account: ")
		.unwrap();
	let mut segments = link.rsplitn(3, '/');
	let link_token = segments.next().unwrap();
	let invite_key = segments.next().unwrap();
	assert_eq!(link_token, invite_token);

	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": invite_key,
				"token": invite_token,
				"email": "roach@example.com",
				"password": "hunter2hunter2",
				"firstName": "Poppa",
				"lastName": "Roach"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	// Acceptance clears the pending claim, recomputes the profile from the
	// submitted names, and consumes the record.
	let accepted = app.identity.account(&invited.id).unwrap();
	assert!(accepted.claims.invite_token.is_none());
	assert!(accepted.claims.is_manager);
	assert_eq!(accepted.email, "roach@example.com");
	assert_eq!(accepted.display_name.as_deref(), Some("Poppa Roach"));
	let profile = app
		.profile
		.get_profile(invited.id.as_str())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(profile.first_name, "Poppa");
	assert_eq!(profile.display_name, "Poppa Roach");
	assert_eq!(app.profile.invite_count(), 0);

	// A second accept finds no record.
	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": invite_key,
				"token": invite_token,
				"email": "roach@example.com",
				"password": "hunter2hunter2",
				"firstName": "Papa",
				"lastName": "Roach"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["message"], "Could not find invitation");
}

#[tokio::test]
async fn invite_email_send_failure_is_a_server_error() {
	let app = TestApp::with_failing_mailer();

	let response = app
		.post(
			"/api/admin/invites",
			Some(&app.admin.token),
			json!({
				"email": "unreachable@example.com",
				"firstName": "Un",
				"lastName": "Reachable"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body_json(response).await["message"],
		"Could not send invitation email"
	);
}

#[tokio::test]
async fn inviting_the_same_email_twice_is_refused() {
	let app = TestApp::new();
	let invite = json!({
		"email": "twice@example.com",
		"firstName": "In",
		"lastName": "Vited"
	});

	let response = app
		.post("/api/admin/invites", Some(&app.admin.token), invite.clone())
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	settle().await;

	let response = app
		.post("/api/admin/invites", Some(&app.admin.token), invite)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["message"], "Invitation already sent");
}

#[tokio::test]
async fn token_mismatch_leaves_the_invitation_intact() {
	let app = TestApp::new();

	app.post(
		"/api/admin/invites",
		Some(&app.admin.token),
		json!({"email": "m@example.com", "firstName": "M", "lastName": "M"}),
	)
	.await;
	settle().await;

	// Read the real key out of the emailed link; only the token is forged.
	let sent = app.mailer.sent_emails();
	let link = sent[0]
		.body_text
		.strip_prefix("Click here to create your account: ")
		.unwrap()
		.to_string();
	let mut segments = link.rsplitn(3, '/');
	let _token = segments.next().unwrap();
	let key = segments.next().unwrap().to_string();

	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": "not-the-token",
				"email": "m@example.com",
				"password": "pw",
				"firstName": "M",
				"lastName": "M"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["message"], "Tokens do not match");
	assert_eq!(app.profile.invite_count(), 1);
}

#[tokio::test]
async fn accepting_with_an_unknown_key_fails() {
	let app = TestApp::new();

	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": "-Missing",
				"token": "whatever",
				"email": "x@example.com",
				"password": "pw",
				"firstName": "X",
				"lastName": "Y"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["message"], "Could not find invitation");
}

#[tokio::test]
async fn accepting_after_the_claim_was_cleared_conflicts() {
	let app = TestApp::new();

	// An account whose invite claim is already gone, with a stale record
	// still in the store.
	let response = app
		.post(
			"/api/admin/users",
			Some(&app.admin.token),
			json!({
				"email": "done@example.com",
				"password": "pw",
				"firstName": "Al",
				"lastName": "Ready"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	settle().await;

	let key = app
		.profile
		.create_invite(&InviteRecord {
			token: "stale-token".to_string(),
			inviter: app.admin.id.to_string(),
			email: "done@example.com".to_string(),
			first_name: "Al".to_string(),
			last_name: "Ready".to_string(),
		})
		.await
		.unwrap();

	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": "stale-token",
				"email": "done@example.com",
				"password": "pw",
				"firstName": "Al",
				"lastName": "Ready"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(
		body_json(response).await["message"],
		"User has already accepted invitation"
	);
}

#[tokio::test]
async fn accepting_with_a_colliding_email_conflicts() {
	let app = TestApp::new();

	app.post(
		"/api/admin/invites",
		Some(&app.admin.token),
		json!({"email": "new@example.com", "firstName": "New", "lastName": "User"}),
	)
	.await;
	settle().await;

	let sent = app.mailer.sent_emails();
	let link = sent[0]
		.body_text
		.strip_prefix("Click here to create your account: ")
		.unwrap()
		.to_string();
	let mut segments = link.rsplitn(3, '/');
	let token = segments.next().unwrap().to_string();
	let key = segments.next().unwrap().to_string();

	// The submitted email belongs to a different, fully-registered account.
	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": token,
				"email": "member@example.com",
				"password": "pw",
				"firstName": "New",
				"lastName": "User"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["message"], "Email already in use");
}

#[tokio::test]
async fn pending_claim_policy_collides_only_with_pending_invitees() {
	let app = TestApp::with_collision_policy(EmailCollisionPolicy::PendingClaim);

	// Two outstanding invitations.
	for (email, first) in [("first@example.com", "First"), ("second@example.com", "Second")] {
		let response = app
			.post(
				"/api/admin/invites",
				Some(&app.admin.token),
				json!({"email": email, "firstName": first, "lastName": "Invitee"}),
			)
			.await;
		assert_eq!(response.status(), StatusCode::OK);
	}
	settle().await;

	let sent = app.mailer.sent_emails();
	let link = sent[0]
		.body_text
		.strip_prefix("Click here to create your account: ")
		.unwrap()
		.to_string();
	let mut segments = link.rsplitn(3, '/');
	let token = segments.next().unwrap().to_string();
	let key = segments.next().unwrap().to_string();

	// The second invitee's address still carries its invite claim, so
	// taking it over is a conflict.
	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": token,
				"email": "second@example.com",
				"password": "pw",
				"firstName": "First",
				"lastName": "Invitee"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["message"], "Email already in use");

	// A fully registered account's address is no obstacle under this
	// policy; the record survived the conflict, so the retry goes through.
	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": token,
				"email": "member@example.com",
				"password": "pw",
				"firstName": "First",
				"lastName": "Invitee"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_invited_account_is_a_server_error() {
	let app = TestApp::new();

	// Invite record without any matching account.
	let key = app
		.profile
		.create_invite(&InviteRecord {
			token: "orphan-token".to_string(),
			inviter: app.admin.id.to_string(),
			email: "ghost@example.com".to_string(),
			first_name: "Gh".to_string(),
			last_name: "Ost".to_string(),
		})
		.await
		.unwrap();

	let response = app
		.post(
			"/api/onboarding/accept-invite",
			None,
			json!({
				"inviteId": key,
				"token": "orphan-token",
				"email": "ghost@example.com",
				"password": "pw",
				"firstName": "Gh",
				"lastName": "Ost"
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body_json(response).await["message"], "No invited user found");
}
