//! # Salesight Analytics Engine
//!
//! This crate computes per-user trailing moving averages over recorded
//! transaction amounts.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** The `MovingAverageEngine` is pure. It has no knowledge of
//!   external systems and depends only on `core-types` (Layer 0).
//! - **Injected Data Access:** Amounts arrive through the `AmountSource` trait. The
//!   database crate implements it; the engine never holds a connection.
//! - **Explicit Outcomes:** `AnalyticsService` returns a `MovingAverageOutcome` so
//!   callers cannot confuse "this user has no data" with "the store is down".
//!
//! ## Public API
//!
//! - `MovingAverageEngine`: The stateless trailing simple moving average calculator.
//! - `MovingAverageReport`: The serializable result handed to callers.
//! - `AmountSource` / `InMemorySource`: The ordered amount lookup contract.
//! - `AnalyticsService` / `MovingAverageOutcome`: Source + engine wiring.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod service;
pub mod source;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MovingAverageEngine;
pub use error::AnalyticsError;
pub use report::MovingAverageReport;
pub use service::{AnalyticsService, MovingAverageOutcome};
pub use source::{AmountSource, InMemorySource, SourceError};
