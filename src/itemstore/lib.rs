//! # Itemstore Architecture
//!
//! Itemstore is a persistence shim: one JSON array of "item" records kept
//! under a single key of a simple string-keyed preference store, exposed
//! through a synchronous request/response bridge. It is deliberately a
//! dumb cache — no index, no schema, no query engine. Every operation
//! re-parses the whole array, scans it linearly, and writes it back.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Host (main.rs + args.rs)                            │
//! │  CLI subcommands and the line-delimited serve loop   │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Bridge (bridge.rs)                                  │
//! │  Argument marshaling only: Call -> Response          │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Store (store/item_store.rs)                         │
//! │  CRUD + membership over the saved_items array;       │
//! │  swallows failures into per-operation sentinels      │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Backend (store/mod.rs trait)                        │
//! │  get/put/remove/commit on a durable string map;      │
//! │  FsBackend (production), MemBackend (tests)          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Caller contract
//!
//! Calls are synchronous and must be serialized: the store performs
//! unguarded read-modify-write cycles, so two overlapping mutations can
//! lose an update. The bridge hosts in this crate serialize calls by
//! construction.
//!
//! ## Module Overview
//!
//! - [`bridge`]: the call/response adapter — entry point for hosts
//! - [`store`]: the item store and the backend abstraction
//! - [`model`]: item field access and payload parsing
//! - [`error`]: internal error types (never cross the store boundary)

pub mod bridge;
pub mod error;
pub mod model;
pub mod store;
