//! Port Interfaces
//!
//! Contracts between the stream session and the outside world, following
//! the hexagonal layering used across the crate.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`FrameSink`]: ordered, flushed delivery of formatted frames to the
//!   transport that owns the client connection.

use std::future::Future;

/// Failure writing a frame to the transport.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The transport was closed by the peer; no further writes are
    /// possible. The session treats this as a disconnect, not a fault.
    #[error("transport closed by peer")]
    Closed,

    /// The transport failed for a reason other than a disconnect.
    #[error("transport write failed: {0}")]
    Transport(String),
}

/// Outbound port for delivering frames to one client connection.
///
/// Implementations must deliver frames in call order, and `write_frame`
/// must resolve only once the frame has been handed to the transport, so
/// the caller's next write cannot overlap the previous one.
pub trait FrameSink: Send {
    /// Write one frame and flush it to the transport.
    fn write_frame(&mut self, frame: &str) -> impl Future<Output = Result<(), WriteError>> + Send;
}
