//! # Salesight Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database that stores recorded transaction amounts.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all database-specific
//!   logic. It implements the `analytics::AmountSource` contract, so the analytics
//!   layer never sees SQL or a connection.
//! - **Stable Ordering:** A user's amounts are always read in ascending `sales.id` order.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) owned by the caller and passed in explicitly.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and provides all
//!   the high-level data access methods (e.g., `get_amounts_for_user`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, USER_INDEX_NAME};
