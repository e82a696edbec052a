//! # Trade Journal Database Crate
//!
//! This crate is the ledger boundary of the journal: it knows where trades and
//! mistake tags live and hands them to the analytics layer.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** Everything storage-specific stays here. Callers work
//!   against the `JournalStore` trait and never see SQL or file formats.
//! - **Read-Only Ledger:** Trades are only read. The single write is seeding the
//!   mistake catalog, which is idempotent.
//! - **Two Backends:** `DbRepository` reads the journal's PostgreSQL tables
//!   through a pooled `sqlx` connection; `MemoryStore` serves a JSON ledger file.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `JournalStore`: The async trait both backends implement.
//! - `DbRepository`, `MemoryStore`, `Ledger`: The backends and the JSON ledger shape.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use memory::{Ledger, MemoryStore};
pub use repository::DbRepository;
pub use store::JournalStore;
