//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the port interfaces defined in the
//! application layer, plus deployment plumbing.

/// Environment-driven server configuration.
pub mod config;

/// Axum HTTP adapter: routes, streaming bodies, disconnect wiring.
pub mod http;

/// Tracing subscriber initialization.
pub mod telemetry;
