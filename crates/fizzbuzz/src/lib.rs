//! Top-level facade crate for the fizzbuzz service.
//!
//! Re-exports the core primitives and the HTTP gateway so users can depend on a single crate.

pub mod core {
    pub use fizzbuzz_core::*;
}

pub mod gateway {
    pub use fizzbuzz_gateway::*;
}
