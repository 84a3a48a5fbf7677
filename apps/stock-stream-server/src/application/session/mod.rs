//! Stream Session
//!
//! The per-connection stream controller: races quote production against
//! the client-disconnect signal and forwards each sample to the transport
//! sink, one write-and-flush at a time.
//!
//! A session is owned by exactly one connection and ends in one of three
//! terminal states:
//!
//! - `Completed`: every sample was emitted, disconnect never observed
//! - `Cancelled`: disconnect observed first (a normal outcome, not an error)
//! - `Failed`: sample generation or the write path errored
//!
//! Termination is reported through a single-assignment [`Completion`];
//! signals arriving after a terminal state are ignored.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{FrameSink, WriteError};
use crate::domain::pricing::PriceGenerator;

// =============================================================================
// Settings
// =============================================================================

/// Per-session streaming settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Spacing between samples.
    pub tick_interval: Duration,
    /// Number of samples after which the stream completes normally.
    pub max_ticks: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            max_ticks: 10,
        }
    }
}

// =============================================================================
// Outcomes and Errors
// =============================================================================

/// Error terminating a session in the `Failed` state.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Sample production failed. Reserved for timer or infrastructure
    /// faults; price computation itself cannot fail.
    #[error("sample generation failed: {0}")]
    Generation(String),

    /// The write path failed for a reason other than a client disconnect.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Terminal state of a stream session.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Every sample was emitted and the client stayed connected.
    Completed {
        /// Frames written before completion.
        frames: usize,
    },
    /// The client disconnected first; a prefix of the samples was emitted.
    Cancelled {
        /// Frames written before the disconnect was observed.
        frames: usize,
    },
    /// Generation or the write path errored.
    Failed {
        /// Frames written before the error.
        frames: usize,
        /// The error that terminated the session.
        error: StreamError,
    },
}

impl SessionOutcome {
    /// Whether this outcome is a success. Both completion and a client
    /// disconnect are expected, non-exceptional endings.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Cancelled { .. })
    }

    /// Number of frames written before the session terminated.
    #[must_use]
    pub const fn frames(&self) -> usize {
        match self {
            Self::Completed { frames } | Self::Cancelled { frames } => *frames,
            Self::Failed { frames, .. } => *frames,
        }
    }
}

// =============================================================================
// Completion
// =============================================================================

/// Single-assignment completion signal for one session: the join-point the
/// connection owner waits on.
///
/// `resolve` follows a first-writer-wins discipline: the first terminal
/// outcome is delivered and every later call is a no-op, so a late error
/// after a cancellation can never be delivered twice.
#[derive(Debug)]
pub struct Completion {
    tx: Option<oneshot::Sender<SessionOutcome>>,
}

/// Waiting side of a [`Completion`].
#[derive(Debug)]
pub struct CompletionHandle {
    rx: oneshot::Receiver<SessionOutcome>,
}

impl Completion {
    /// Create a completion pair.
    #[must_use]
    pub fn new() -> (Self, CompletionHandle) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, CompletionHandle { rx })
    }

    /// Resolve with the given outcome.
    ///
    /// Returns `true` if this call won the assignment, `false` if the
    /// completion was already resolved.
    pub fn resolve(&mut self, outcome: SessionOutcome) -> bool {
        self.tx.take().is_some_and(|tx| {
            let _ = tx.send(outcome);
            true
        })
    }
}

impl CompletionHandle {
    /// Wait for the session's terminal outcome.
    ///
    /// If the session task dropped its completion without resolving it
    /// (a panic), this reports a failure rather than hanging.
    pub async fn wait(self) -> SessionOutcome {
        self.rx.await.unwrap_or_else(|_| SessionOutcome::Failed {
            frames: 0,
            error: StreamError::Generation(
                "session ended without resolving its completion".to_string(),
            ),
        })
    }
}

// =============================================================================
// Stream Session
// =============================================================================

/// Per-connection stream controller.
///
/// Owns a tick schedule and a price generator; [`StreamSession::run`]
/// drives them to a terminal state against a cancellation token supplied
/// by the transport adapter.
#[derive(Debug)]
pub struct StreamSession {
    settings: SessionSettings,
    generator: PriceGenerator,
}

impl StreamSession {
    /// Create a session with a fresh OS-seeded price generator.
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            generator: PriceGenerator::new(),
        }
    }

    /// Drive the stream to a terminal state.
    ///
    /// Each sample is formatted and written through `sink` before the next
    /// tick is accepted; writes never overlap. The first tick fires one
    /// interval after the call, not immediately. Ticks fire on a stable
    /// schedule (missed ticks are skipped, never compounded), so a slow
    /// consumer delays frames without accumulating drift.
    ///
    /// Cancellation is observed before each tick and before each write;
    /// once observed, no further samples are written.
    pub async fn run<S: FrameSink>(
        mut self,
        sink: &mut S,
        cancel: CancellationToken,
    ) -> SessionOutcome {
        let mut ticks = tokio::time::interval_at(
            tokio::time::Instant::now() + self.settings.tick_interval,
            self.settings.tick_interval,
        );
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut frames = 0_usize;
        while frames < self.settings.max_ticks {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return SessionOutcome::Cancelled { frames },
                _ = ticks.tick() => {}
            }

            let frame = self.generator.quote_at(frames).to_frame();
            tokio::select! {
                biased;
                () = cancel.cancelled() => return SessionOutcome::Cancelled { frames },
                result = sink.write_frame(&frame) => match result {
                    Ok(()) => frames += 1,
                    Err(WriteError::Closed) => return SessionOutcome::Cancelled { frames },
                    Err(error) => {
                        return SessionOutcome::Failed {
                            frames,
                            error: error.into(),
                        };
                    }
                }
            }
        }

        SessionOutcome::Completed { frames }
    }
}

// =============================================================================
// Tests
// =============================================================================
