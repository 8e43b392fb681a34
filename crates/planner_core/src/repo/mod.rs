//! Persistence collaborators layered over a string key-value store.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract and its SQLite implementation.
//! - Keep JSON document layout (`sp_users`, `sp_current_user`,
//!   `sp_profiles`) inside the persistence boundary.
//!
//! # Invariants
//! - Read-modify-write sequences run through `KeyValueStore::atomically`.
//! - Corrupt documents surface as `RepoError::InvalidData`, never as
//!   silently reset state.

pub mod account_repo;
pub mod kv_store;
pub mod profile_repo;
