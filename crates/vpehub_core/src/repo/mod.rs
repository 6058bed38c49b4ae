//! Persistence layer: the key-value substrate and typed collections over it.
//!
//! # Responsibility
//! - Define the `get`/`set` persistence contract consumed by the store.
//! - Map each record type to its collection key, seed data and JSON blob.
//!
//! # Invariants
//! - Each collection is one JSON array under one key, in insertion order.
//! - An absent key is seeded and persisted on first read.
//! - Transport and decoding failures surface as `RepoError`, never as
//!   business-rule rejections.

pub mod collection;
pub mod kv_repo;
pub mod seed;
