//! Account directory and active-session pointer.
//!
//! # Invariants
//! - Emails are unique within `sp_users`.
//! - At most one active-session pointer exists; `None` means signed out.

use crate::model::account::{Account, AccountId};
use crate::repo::kv_store::{KeyValueStore, RepoResult};

pub const USERS_KEY: &str = "sp_users";
pub const SESSION_KEY: &str = "sp_current_user";

/// Account records stored as one JSON list.
pub struct AccountDirectory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AccountDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_accounts(&self) -> RepoResult<Vec<Account>> {
        Ok(self
            .store
            .load_json::<Vec<Account>>(USERS_KEY)?
            .unwrap_or_default())
    }

    pub fn find(&self, email: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .list_accounts()?
            .into_iter()
            .find(|account| account.email == email))
    }

    /// Appends an account. Callers check uniqueness in the same critical
    /// section.
    pub fn insert(&self, account: Account) -> RepoResult<()> {
        let mut accounts = self.list_accounts()?;
        accounts.push(account);
        self.store.save_json(USERS_KEY, &accounts)
    }

    /// Reads the active-session pointer.
    pub fn active_account_id(&self) -> RepoResult<Option<AccountId>> {
        Ok(self
            .store
            .load_json::<Option<AccountId>>(SESSION_KEY)?
            .flatten())
    }

    /// Points the active session at `account_id`, or clears it.
    pub fn set_active_account_id(&self, account_id: Option<&str>) -> RepoResult<()> {
        match account_id {
            Some(account_id) => self.store.save_json(SESSION_KEY, account_id),
            None => self.store.remove(SESSION_KEY),
        }
    }
}
