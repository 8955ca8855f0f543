//! fizzbuzz gateway library entry.
//!
//! Wires config, shared state, middleware, and handlers into an axum
//! service. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod obs;
pub mod ops;
pub mod router;
pub mod shutdown;
