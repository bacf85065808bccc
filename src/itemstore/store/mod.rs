//! # Storage Layer
//!
//! This module defines the storage abstraction for itemstore. The
//! [`PrefsBackend`] trait models the platform's preference store as the
//! smallest possible surface: a durable string-keyed map with an explicit
//! commit step.
//!
//! ## Design Rationale
//!
//! The backend is abstracted behind a trait to:
//! - Enable **testing** with [`memory::MemBackend`] (no filesystem needed),
//!   including simulated write and commit failures
//! - Keep the CRUD logic in [`item_store::ItemStore`] **decoupled** from
//!   where the bytes actually live
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: production storage. All preferences live in a
//!   single `prefs.json` file (a JSON object of string keys to string
//!   values) in an application-private directory. Commits are atomic.
//! - [`memory::MemBackend`]: in-memory storage for tests.
//!
//! ## Consistency Model
//!
//! `put_string` and `remove` stage changes; `commit` makes them durable.
//! The store is single-threaded by contract: the bridge serializes calls,
//! so no backend needs internal locking. Implementations use `RefCell`
//! interior mutability so the trait can take `&self` throughout.

use crate::error::Result;

pub mod fs;
pub mod item_store;
pub mod memory;

pub use item_store::ItemStore;

/// Abstract interface for the preference store.
///
/// Mirrors the primitives of a platform key-value preference area:
/// read a string, stage a write or a removal, commit.
pub trait PrefsBackend {
    /// Read the value under `key`. `Ok(None)` when the key is absent;
    /// `Err` only on an actual backend failure.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Stage `value` under `key`.
    fn put_string(&self, key: &str, value: &str) -> Result<()>;

    /// Stage removal of `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Make staged changes durable.
    fn commit(&self) -> Result<()>;
}
