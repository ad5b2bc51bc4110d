//! Shard Integration Tests
//!
//! End-to-end tests through the public `chronoshard` facade: database
//! lifecycle, the write path, query dispatch and concurrent access.

#[path = "../common/mod.rs"]
mod common;

mod lifecycle;
mod writes;
