//! SQLite storage implementation for the 2086 calculator.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the persistence port defined in `formulaire2086-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor serialising all writes
//! - The key/value repository holding the disposal sequence
//!
//! ```text
//!   core (domain)      server (HTTP)
//!        │                  │
//!        └────────┬─────────┘
//!                 ▼
//!      storage-sqlite (this crate)
//!                 │
//!                 ▼
//!             SQLite DB
//! ```

pub mod db;
pub mod disposals;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from formulaire2086-core for convenience
pub use formulaire2086_core::errors::{DatabaseError, Error, Result};
