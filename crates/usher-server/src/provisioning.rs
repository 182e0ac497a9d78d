// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User provisioning primitives shared by the admin and onboarding routes.
//!
//! Provisioning is a three-step sequence against two upstreams: create the
//! gateway account, optionally set claims in a second (non-atomic) call, and
//! write the Profile Record without awaiting completion. There is no
//! compensating delete if the profile write fails; the failure is logged and
//! the account stands.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use usher_server_identity::{
	Account, AccountClaims, AccountId, IdentityError, IdentityGateway, NewAccount,
};
use usher_server_profile::{display_name, ProfileStore, UserProfile};

/// Length of the random invite token carried in the acceptance link and in
/// the invitee's claims.
pub const INVITE_TOKEN_LEN: usize = 128;

/// Accounts fetched per page during bulk deprovisioning.
pub const DEPROVISION_PAGE_SIZE: u32 = 1000;

/// Generate a random alphanumeric invite token.
pub fn generate_invite_token() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(INVITE_TOKEN_LEN)
		.map(char::from)
		.collect()
}

/// Map the role selector from an invite to the claims the invited account
/// starts with. Unknown or absent roles get the anonymous claim.
pub fn role_claims(role: Option<&str>) -> AccountClaims {
	match role {
		Some("manager") => AccountClaims {
			is_manager: true,
			..Default::default()
		},
		Some("client") => AccountClaims {
			is_client: true,
			..Default::default()
		},
		Some("member") => AccountClaims {
			is_member: true,
			..Default::default()
		},
		_ => AccountClaims {
			is_anonymous: true,
			..Default::default()
		},
	}
}

/// Is `email` free to use for a new account?
///
/// Found means unavailable. Not-found means available, and so does a lookup
/// failure: the gateway error is logged and then deliberately conflated with
/// availability. Callers own the HTTP response; this check never writes one.
pub async fn email_available(identity: &dyn IdentityGateway, email: &str) -> bool {
	match identity.get_account_by_email(email).await {
		Ok(Some(_)) => false,
		Ok(None) => true,
		Err(e) => {
			tracing::warn!(error = %e, "Email lookup failed, treating email as available");
			true
		}
	}
}

/// Input for [`provision_user`].
#[derive(Debug)]
pub struct NewUser {
	pub email: String,
	pub password: Option<String>,
	pub first_name: String,
	pub last_name: String,
	/// When set, applied in a second gateway call after account creation.
	pub claims: Option<AccountClaims>,
}

/// Create the account (with display name), apply claims if supplied, and
/// spawn the Profile Record write.
///
/// The returned account reflects the claims that were applied.
pub async fn provision_user(
	identity: &Arc<dyn IdentityGateway>,
	profile: &Arc<dyn ProfileStore>,
	new_user: NewUser,
) -> Result<Account, IdentityError> {
	let NewUser {
		email,
		password,
		first_name,
		last_name,
		claims,
	} = new_user;

	let mut account = identity
		.create_account(NewAccount {
			email,
			password,
			display_name: Some(display_name(&first_name, &last_name)),
		})
		.await?;

	if let Some(claims) = claims {
		identity.set_claims(&account.id, claims.clone()).await?;
		account.claims = claims;
	}

	let profile_store = Arc::clone(profile);
	let record = UserProfile::new(None, &first_name, &last_name);
	let account_id = account.id.to_string();
	tokio::spawn(async move {
		if let Err(e) = profile_store.put_profile(&account_id, &record).await {
			tracing::warn!(
				error = %e,
				account_id = %account_id,
				"Failed to write profile record for new account"
			);
		}
	});

	Ok(account)
}

/// Tally of one bulk-deprovisioning sweep.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepOutcome {
	pub deleted: usize,
	pub errors: usize,
}

/// Delete every account except `keep`, page by page.
///
/// Per-page deletes run concurrently; the next page is not fetched until the
/// whole page has settled. Each deleted account also loses its Profile
/// Record. Errors are logged and tallied, never short-circuited, except that
/// a failed page fetch ends the walk (there is no continuation token to
/// follow).
pub async fn deprovision_all(
	identity: &Arc<dyn IdentityGateway>,
	profile: &Arc<dyn ProfileStore>,
	keep: &AccountId,
) -> SweepOutcome {
	deprovision_pages(identity, profile, keep, DEPROVISION_PAGE_SIZE).await
}

async fn deprovision_pages(
	identity: &Arc<dyn IdentityGateway>,
	profile: &Arc<dyn ProfileStore>,
	keep: &AccountId,
	page_size: u32,
) -> SweepOutcome {
	let mut outcome = SweepOutcome::default();
	let mut page_token: Option<String> = None;

	loop {
		let page = match identity
			.list_accounts(page_size, page_token.as_deref())
			.await
		{
			Ok(page) => page,
			Err(e) => {
				tracing::error!(error = %e, "Failed to list accounts during deprovisioning sweep");
				outcome.errors += 1;
				return outcome;
			}
		};

		let actions = page
			.accounts
			.into_iter()
			.filter(|account| account.id != *keep)
			.map(|account| {
				let identity = Arc::clone(identity);
				let profile = Arc::clone(profile);
				async move {
					if let Err(e) = identity.delete_account(&account.id).await {
						tracing::error!(
							error = %e,
							account_id = %account.id,
							"Failed to delete account"
						);
						return Err(());
					}
					if let Err(e) = profile.remove_profile(account.id.as_str()).await {
						tracing::error!(
							error = %e,
							account_id = %account.id,
							"Failed to remove profile record"
						);
						return Err(());
					}
					Ok(())
				}
			});

		for result in futures::future::join_all(actions).await {
			match result {
				Ok(()) => outcome.deleted += 1,
				Err(()) => outcome.errors += 1,
			}
		}

		match page.next_page_token {
			Some(token) => page_token = Some(token),
			None => break,
		}
	}

	outcome
}

#[cfg(test)]
mod tests {
	use super::*;
	use usher_server_identity::testing::MemoryIdentityGateway;
	use usher_server_profile::testing::MemoryProfileStore;

	#[test]
	fn invite_tokens_are_long_and_alphanumeric() {
		let token = generate_invite_token();
		assert_eq!(token.len(), INVITE_TOKEN_LEN);
		assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(token, generate_invite_token());
	}

	#[test]
	fn role_selector_maps_to_claims() {
		assert!(role_claims(Some("manager")).is_manager);
		assert!(role_claims(Some("client")).is_client);
		assert!(role_claims(Some("member")).is_member);
		assert!(role_claims(Some("superuser")).is_anonymous);
		assert!(role_claims(None).is_anonymous);
	}

	#[tokio::test]
	async fn availability_is_fail_open() {
		let gateway = MemoryIdentityGateway::new();
		assert!(email_available(&gateway, "free@example.com").await);

		gateway
			.create_account(usher_server_identity::NewAccount {
				email: "taken@example.com".to_string(),
				password: None,
				display_name: None,
			})
			.await
			.unwrap();
		assert!(!email_available(&gateway, "taken@example.com").await);
	}

	#[tokio::test]
	async fn sweep_keeps_the_acting_admin() {
		let identity: Arc<dyn IdentityGateway> = Arc::new(MemoryIdentityGateway::new());
		let profile: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());

		let mut keep = None;
		for i in 0..4 {
			let account = identity
				.create_account(NewAccount {
					email: format!("user{i}@example.com"),
					password: None,
					display_name: None,
				})
				.await
				.unwrap();
			if i == 0 {
				keep = Some(account.id);
			}
		}
		let keep = keep.unwrap();

		let outcome = deprovision_all(&identity, &profile, &keep).await;
		assert_eq!(outcome.deleted, 3);
		assert_eq!(outcome.errors, 0);
		assert!(identity.get_account(&keep).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn sweep_spans_pages_and_still_keeps_the_admin() {
		let gateway = Arc::new(MemoryIdentityGateway::new());
		let profile: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());

		// Five doomed accounts, plus an admin whose id sorts after all of
		// them so it only shows up on the final page.
		for i in 0..5 {
			gateway.add_account(Account {
				id: AccountId::new(format!("user-{i}")),
				email: format!("user{i}@example.com"),
				display_name: None,
				claims: AccountClaims::default(),
			});
		}
		let keep = AccountId::new("zz-admin");
		gateway.add_account(Account {
			id: keep.clone(),
			email: "admin@example.com".to_string(),
			display_name: None,
			claims: AccountClaims::default(),
		});

		let identity: Arc<dyn IdentityGateway> = gateway.clone();
		let outcome = deprovision_pages(&identity, &profile, &keep, 2).await;
		assert_eq!(outcome.deleted, 5);
		assert_eq!(outcome.errors, 0);
		assert_eq!(gateway.account_count(), 1);
		assert!(identity.get_account(&keep).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn sweep_with_only_the_caller_deletes_nothing() {
		let identity: Arc<dyn IdentityGateway> = Arc::new(MemoryIdentityGateway::new());
		let profile: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());

		let admin = identity
			.create_account(NewAccount {
				email: "admin@example.com".to_string(),
				password: None,
				display_name: None,
			})
			.await
			.unwrap();

		let outcome = deprovision_all(&identity, &profile, &admin.id).await;
		assert_eq!(outcome.deleted, 0);
		assert_eq!(outcome.errors, 0);
		assert!(identity.get_account(&admin.id).await.unwrap().is_some());
	}
}
