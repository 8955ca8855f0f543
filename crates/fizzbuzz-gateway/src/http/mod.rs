//! HTTP handlers for the generation and statistics endpoints.

pub mod fizzbuzz;
pub mod response;
pub mod statistics;

pub use response::{json_response, ApiError};
