#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::default_trait_access
    )
)]

//! Stock Stream Server - Simulated Price Event Streaming
//!
//! An HTTP service that streams simulated stock prices as Server-Sent
//! Events. Every `/stock-stream` connection gets its own bounded stream:
//! one price sample per tick, a fixed number of samples, terminated early
//! if the client disconnects. The core is the race between sample
//! production and the client-disconnect signal, with resources released
//! exactly once on every exit path.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: Price simulation with no I/O
//!   - `pricing`: symbol cycling, quote generation, frame formatting
//!
//! - **Application**: Session orchestration and port definitions
//!   - `ports`: the frame-sink contract the transport must implement
//!   - `session`: the per-connection stream controller and its
//!     single-assignment completion signal
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `http`: axum routes, streaming bodies, disconnect wiring
//!   - `config`: environment-driven deployment settings
//!   - `telemetry`: tracing subscriber initialization
//!
//! # Data Flow
//!
//! ```text
//! interval ticks ──► PriceGenerator ──► StreamSession ──► response body
//!                                            ▲
//!                              client disconnect (CancellationToken)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Price simulation with no external dependencies.
pub mod domain;

/// Application layer - Session orchestration and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::pricing::{DEFAULT_SYMBOLS, PriceGenerator, Quote};

// Application ports and session
pub use application::ports::{FrameSink, WriteError};
pub use application::session::{
    Completion, CompletionHandle, SessionOutcome, SessionSettings, StreamError, StreamSession,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, ServerConfig};

// HTTP server (also used by integration tests)
pub use infrastructure::http::{AppState, StreamServer, StreamServerError, router};

// Telemetry
pub use infrastructure::telemetry::init as init_telemetry;
