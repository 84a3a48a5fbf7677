//! Domain Layer - Price simulation with no I/O.
//!
//! Pure types and logic: the fixed symbol set, per-tick quote generation,
//! and frame formatting. Cadence and transport live in the outer layers.

/// Simulated quote generation and frame formatting.
pub mod pricing;
