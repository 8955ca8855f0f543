//! fizzbuzz core: parameter validation, sequence generation, and request statistics.
//!
//! This crate is transport-agnostic: it knows nothing about HTTP or async
//! runtimes, so the gateway and tests can use it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Invalid input surfaces as `FizzBuzzError`; the generator and the store
//! have no failure modes at all.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod generator;
pub mod params;
pub mod stats;

/// Shared result type.
pub use error::{ClientCode, FizzBuzzError, Result};
pub use generator::generate;
pub use params::{validate, RawParams, RequestParams, ValidationLimits};
pub use stats::{FrequencyEntry, FrequencyStore};
