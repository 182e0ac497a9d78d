// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory Identity Gateway for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::IdentityError;
use crate::types::{
	Account, AccountClaims, AccountId, AccountPage, AccountUpdate, NewAccount, VerifiedToken,
};
use crate::IdentityGateway;

/// In-memory gateway double. Accounts live in a map keyed by id; bearer
/// tokens are minted explicitly via [`MemoryIdentityGateway::issue_token`].
#[derive(Default)]
pub struct MemoryIdentityGateway {
	accounts: Mutex<HashMap<AccountId, Account>>,
	tokens: Mutex<HashMap<String, AccountId>>,
}

impl MemoryIdentityGateway {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert an account directly, bypassing uniqueness checks.
	pub fn add_account(&self, account: Account) {
		self
			.accounts
			.lock()
			.unwrap()
			.insert(account.id.clone(), account);
	}

	/// Read an account without going through the trait.
	pub fn account(&self, id: &AccountId) -> Option<Account> {
		self.accounts.lock().unwrap().get(id).cloned()
	}

	/// Mint a bearer token whose subject is the given account.
	pub fn issue_token(&self, id: &AccountId) -> String {
		let token = Uuid::new_v4().simple().to_string();
		self
			.tokens
			.lock()
			.unwrap()
			.insert(token.clone(), id.clone());
		token
	}

	pub fn account_count(&self) -> usize {
		self.accounts.lock().unwrap().len()
	}
}

#[async_trait]
impl IdentityGateway for MemoryIdentityGateway {
	async fn create_account(&self, new_account: NewAccount) -> Result<Account, IdentityError> {
		let mut accounts = self.accounts.lock().unwrap();
		if accounts.values().any(|a| a.email == new_account.email) {
			return Err(IdentityError::Api {
				status: 409,
				message: format!("email {} already registered", new_account.email),
			});
		}

		let account = Account {
			id: AccountId::new(Uuid::new_v4().simple().to_string()),
			email: new_account.email,
			display_name: new_account.display_name,
			claims: AccountClaims::default(),
		};
		accounts.insert(account.id.clone(), account.clone());
		Ok(account)
	}

	async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, IdentityError> {
		Ok(self.accounts.lock().unwrap().get(id).cloned())
	}

	async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
		Ok(self
			.accounts
			.lock()
			.unwrap()
			.values()
			.find(|a| a.email == email)
			.cloned())
	}

	async fn update_account(
		&self,
		id: &AccountId,
		update: AccountUpdate,
	) -> Result<Account, IdentityError> {
		let mut accounts = self.accounts.lock().unwrap();
		let account = accounts.get_mut(id).ok_or_else(|| IdentityError::Api {
			status: 404,
			message: format!("no account {id}"),
		})?;

		if let Some(email) = update.email {
			account.email = email;
		}
		if let Some(display_name) = update.display_name {
			account.display_name = Some(display_name);
		}
		// Passwords are write-only; the double drops them.
		Ok(account.clone())
	}

	async fn set_claims(&self, id: &AccountId, claims: AccountClaims) -> Result<(), IdentityError> {
		let mut accounts = self.accounts.lock().unwrap();
		let account = accounts.get_mut(id).ok_or_else(|| IdentityError::Api {
			status: 404,
			message: format!("no account {id}"),
		})?;
		account.claims = claims;
		Ok(())
	}

	async fn delete_account(&self, id: &AccountId) -> Result<bool, IdentityError> {
		Ok(self.accounts.lock().unwrap().remove(id).is_some())
	}

	async fn list_accounts(
		&self,
		page_size: u32,
		page_token: Option<&str>,
	) -> Result<AccountPage, IdentityError> {
		let accounts = self.accounts.lock().unwrap();
		let mut all: Vec<Account> = accounts.values().cloned().collect();
		all.sort_by(|a, b| a.id.cmp(&b.id));

		// The token is the last id of the previous page, so the walk stays
		// stable when accounts are deleted between fetches.
		let start = match page_token {
			Some(token) => all
				.iter()
				.position(|a| a.id.as_str() > token)
				.unwrap_or(all.len()),
			None => 0,
		};
		let end = (start + page_size as usize).min(all.len());
		let next_page_token = if end < all.len() {
			Some(all[end - 1].id.to_string())
		} else {
			None
		};

		Ok(AccountPage {
			accounts: all[start..end].to_vec(),
			next_page_token,
		})
	}

	async fn verify_token(&self, token: &str) -> Result<VerifiedToken, IdentityError> {
		Ok(VerifiedToken {
			subject: self.tokens.lock().unwrap().get(token).cloned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn account(id: &str, email: &str) -> Account {
		Account {
			id: AccountId::new(id),
			email: email.to_string(),
			display_name: None,
			claims: AccountClaims::default(),
		}
	}

	#[tokio::test]
	async fn create_rejects_duplicate_email() {
		let gateway = MemoryIdentityGateway::new();
		gateway.add_account(account("u1", "taken@example.com"));

		let result = gateway
			.create_account(NewAccount {
				email: "taken@example.com".to_string(),
				password: None,
				display_name: None,
			})
			.await;
		assert!(matches!(result, Err(IdentityError::Api { status: 409, .. })));
	}

	#[tokio::test]
	async fn lookup_by_email_finds_account() {
		let gateway = MemoryIdentityGateway::new();
		gateway.add_account(account("u1", "papa@example.com"));

		let found = gateway
			.get_account_by_email("papa@example.com")
			.await
			.unwrap();
		assert_eq!(found.unwrap().id, AccountId::new("u1"));
		assert!(gateway
			.get_account_by_email("absent@example.com")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn token_verification_resolves_subject() {
		let gateway = MemoryIdentityGateway::new();
		gateway.add_account(account("u1", "a@example.com"));
		let token = gateway.issue_token(&AccountId::new("u1"));

		let verified = gateway.verify_token(&token).await.unwrap();
		assert_eq!(verified.subject, Some(AccountId::new("u1")));

		let unknown = gateway.verify_token("garbage").await.unwrap();
		assert!(unknown.subject.is_none());
	}

	#[tokio::test]
	async fn list_accounts_pages_through_everything() {
		let gateway = MemoryIdentityGateway::new();
		for i in 0..5 {
			gateway.add_account(account(&format!("u{i}"), &format!("u{i}@example.com")));
		}

		let mut seen = Vec::new();
		let mut page_token: Option<String> = None;
		loop {
			let page = gateway
				.list_accounts(2, page_token.as_deref())
				.await
				.unwrap();
			seen.extend(page.accounts.into_iter().map(|a| a.id));
			match page.next_page_token {
				Some(token) => page_token = Some(token),
				None => break,
			}
		}
		assert_eq!(seen.len(), 5);
	}

	#[tokio::test]
	async fn paging_stays_stable_while_accounts_are_deleted() {
		let gateway = MemoryIdentityGateway::new();
		for i in 0..5 {
			gateway.add_account(account(&format!("u{i}"), &format!("u{i}@example.com")));
		}

		// Delete each page before fetching the next, the way a
		// deprovisioning sweep does. Every account must be visited once.
		let mut seen = Vec::new();
		let mut page_token: Option<String> = None;
		loop {
			let page = gateway
				.list_accounts(2, page_token.as_deref())
				.await
				.unwrap();
			for account in page.accounts {
				gateway.delete_account(&account.id).await.unwrap();
				seen.push(account.id);
			}
			match page.next_page_token {
				Some(token) => page_token = Some(token),
				None => break,
			}
		}
		assert_eq!(seen.len(), 5);
		assert_eq!(gateway.account_count(), 0);
	}

	#[tokio::test]
	async fn delete_absent_account_reports_false() {
		let gateway = MemoryIdentityGateway::new();
		assert!(!gateway.delete_account(&AccountId::new("ghost")).await.unwrap());
	}
}
