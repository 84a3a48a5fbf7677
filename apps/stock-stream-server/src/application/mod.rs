//! Application Layer - Session orchestration and port definitions.
//!
//! This layer contains the stream controller and the port interfaces
//! that define how it talks to the transport.

/// Port interfaces for the transport adapter.
pub mod ports;

/// The per-connection stream session and its completion primitive.
pub mod session;
