//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, reproducible draws.
//! CRITICAL: agent spawning, grid seeding and movement choices MUST all draw
//! from the one `RngManager` owned by the orchestrator.

mod xorshift;

pub use xorshift::RngManager;
