//! Per-account profile storage.
//!
//! # Responsibility
//! - Keep every profile in one `sp_profiles` document keyed by account id.
//! - Provide explicit creation and critical-section updates.
//!
//! # Invariants
//! - A profile is created only through `get_or_create`.
//! - `update` never creates a profile; a missing one is an error.

use crate::model::account::AccountId;
use crate::model::profile::Profile;
use crate::repo::kv_store::{KeyValueStore, RepoError, RepoResult};
use log::info;
use std::collections::BTreeMap;

pub const PROFILES_KEY: &str = "sp_profiles";

type ProfileMap = BTreeMap<AccountId, Profile>;

/// Profile documents for all local accounts.
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the profile for `account_id`, creating an empty one first when
    /// none exists.
    pub fn get_or_create(&self, account_id: &str) -> RepoResult<Profile> {
        self.store.atomically(|| {
            let mut profiles = self.load_all()?;
            if let Some(profile) = profiles.get(account_id) {
                return Ok(profile.clone());
            }

            let profile = Profile::default();
            profiles.insert(account_id.to_string(), profile.clone());
            self.store.save_json(PROFILES_KEY, &profiles)?;
            info!("event=profile_create module=repo status=ok");
            Ok(profile)
        })
    }

    pub fn load(&self, account_id: &str) -> RepoResult<Option<Profile>> {
        Ok(self.load_all()?.remove(account_id))
    }

    /// Stores `profile` as the full state of `account_id`.
    pub fn save(&self, account_id: &str, profile: &Profile) -> RepoResult<()> {
        self.store.atomically(|| {
            let mut profiles = self.load_all()?;
            profiles.insert(account_id.to_string(), profile.clone());
            self.store.save_json(PROFILES_KEY, &profiles)
        })
    }

    /// Loads, mutates and writes back one profile in a single critical
    /// section.
    pub fn update<T>(&self, account_id: &str, f: impl FnOnce(&mut Profile) -> T) -> RepoResult<T> {
        self.store.atomically(|| {
            let mut profiles = self.load_all()?;
            let profile = profiles
                .get_mut(account_id)
                .ok_or_else(|| RepoError::ProfileNotFound(account_id.to_string()))?;
            let value = f(profile);
            self.store.save_json(PROFILES_KEY, &profiles)?;
            Ok(value)
        })
    }

    fn load_all(&self) -> RepoResult<ProfileMap> {
        Ok(self
            .store
            .load_json::<ProfileMap>(PROFILES_KEY)?
            .unwrap_or_default())
    }
}
