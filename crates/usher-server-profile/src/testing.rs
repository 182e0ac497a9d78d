// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory Profile Store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProfileError;
use crate::types::{InviteRecord, ProfileChanges, UserProfile};
use crate::ProfileStore;

/// In-memory store double with the same observable semantics as the REST
/// tree: absent reads are `None`, invite deletion reports prior existence.
#[derive(Default)]
pub struct MemoryProfileStore {
	profiles: Mutex<HashMap<String, UserProfile>>,
	invites: Mutex<HashMap<String, InviteRecord>>,
}

impl MemoryProfileStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn profile_count(&self) -> usize {
		self.profiles.lock().unwrap().len()
	}

	pub fn invite_count(&self) -> usize {
		self.invites.lock().unwrap().len()
	}
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
	async fn get_profile(&self, account_id: &str) -> Result<Option<UserProfile>, ProfileError> {
		Ok(self.profiles.lock().unwrap().get(account_id).cloned())
	}

	async fn put_profile(
		&self,
		account_id: &str,
		profile: &UserProfile,
	) -> Result<(), ProfileError> {
		self
			.profiles
			.lock()
			.unwrap()
			.insert(account_id.to_string(), profile.clone());
		Ok(())
	}

	async fn update_profile(
		&self,
		account_id: &str,
		changes: &ProfileChanges,
	) -> Result<(), ProfileError> {
		let mut profiles = self.profiles.lock().unwrap();
		let entry = profiles
			.entry(account_id.to_string())
			.or_insert_with(|| UserProfile::new(None, "", ""));
		if let Some(ref display_name) = changes.display_name {
			entry.display_name = display_name.clone();
		}
		if let Some(refresh_time) = changes.refresh_time {
			entry.refresh_time = refresh_time;
		}
		Ok(())
	}

	async fn remove_profile(&self, account_id: &str) -> Result<(), ProfileError> {
		self.profiles.lock().unwrap().remove(account_id);
		Ok(())
	}

	async fn create_invite(&self, record: &InviteRecord) -> Result<String, ProfileError> {
		let key = format!("-{}", Uuid::new_v4().simple());
		self
			.invites
			.lock()
			.unwrap()
			.insert(key.clone(), record.clone());
		Ok(key)
	}

	async fn get_invite(&self, key: &str) -> Result<Option<InviteRecord>, ProfileError> {
		Ok(self.invites.lock().unwrap().get(key).cloned())
	}

	async fn delete_invite(&self, key: &str) -> Result<bool, ProfileError> {
		Ok(self.invites.lock().unwrap().remove(key).is_some())
	}
}
