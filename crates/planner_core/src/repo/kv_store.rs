//! Key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable string get/set/remove keyed by document name.
//! - Provide JSON (de)serialization helpers for whole documents.
//! - Provide a critical section for read-modify-write updates.
//!
//! # Invariants
//! - Every `set` replaces the full value of a key.
//! - `atomically` nests: inner calls join the outer critical section.

use crate::db::DbError;
use crate::model::account::AccountId;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence and document decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored document exists but cannot be decoded.
    InvalidData(String),
    /// Value could not be encoded as JSON.
    Encode(serde_json::Error),
    /// No profile has been created for this account yet.
    ProfileNotFound(AccountId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted planner data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode planner data: {err}"),
            Self::ProfileNotFound(account_id) => write!(f, "profile not found: {account_id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) | Self::ProfileNotFound(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-keyed storage used by every planner collaborator.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove(&self, key: &str) -> RepoResult<()>;

    /// Runs `f` as one critical section against this store.
    fn atomically<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce() -> RepoResult<T>,
    {
        f()
    }

    /// Loads and decodes a JSON document. Missing keys yield `None`.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::InvalidData(format!("key `{key}`: {err}")))
    }

    /// Encodes `value` as JSON and stores it under `key`.
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> RepoResult<()> {
        let raw = serde_json::to_string(value).map_err(RepoError::Encode)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore> KeyValueStore for &S {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        (**self).remove(key)
    }

    fn atomically<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce() -> RepoResult<T>,
    {
        (**self).atomically(f)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
#[derive(Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `RepoError::InvalidData` when the `kv_entries` table is missing,
    ///   i.e. the connection was not opened through the migration path.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::InvalidData(
                "kv_entries table is missing; open the database via open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=repo status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn atomically<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce() -> RepoResult<T>,
    {
        if !self.conn.is_autocommit() {
            return f();
        }

        // IMMEDIATE takes the write lock up front so two writers cannot both
        // read the old document.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = f()?;
        tx.commit()?;
        Ok(value)
    }
}
