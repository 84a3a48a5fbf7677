//! HTTP Streaming Adapter
//!
//! Axum server exposing the price stream. Each `/stock-stream` request
//! gets its own session: a producer task drives the tick/price sequence
//! into a capacity-1 channel feeding the response body, and a drop guard
//! on the body converts the client disconnect into the session's
//! cancellation token.
//!
//! # Endpoints
//!
//! - `GET /stock-stream` - Server-Sent Events price stream
//! - `GET /` - static welcome text
//! - `GET /healthz` - liveness probe

use std::convert::Infallible;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{FrameSink, WriteError};
use crate::application::session::{Completion, SessionOutcome, SessionSettings, StreamSession};

/// Static welcome text served at `/`.
const WELCOME: &str = "Welcome to the Stock Stream Demo!";

// =============================================================================
// Application State and Router
// =============================================================================

/// Shared state for the HTTP routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Streaming settings applied to every new session.
    pub settings: SessionSettings,
}

impl AppState {
    /// Create state with the given session settings.
    #[must_use]
    pub const fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }
}

/// Build the application router.
///
/// CORS is fully permissive on every route: the demo is meant to be
/// consumed from arbitrary origins.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/healthz", get(liveness_handler))
        .route("/stock-stream", get(stock_stream_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Stream Server
// =============================================================================

/// HTTP server exposing the stream endpoint.
pub struct StreamServer {
    port: u16,
    state: Arc<AppState>,
    cancel: CancellationToken,
}

impl StreamServer {
    /// Create a new server.
    #[must_use]
    pub fn new(port: u16, settings: SessionSettings, cancel: CancellationToken) -> Self {
        Self {
            port,
            state: Arc::new(AppState::new(settings)),
            cancel,
        }
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `StreamServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), StreamServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| StreamServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Stream server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| StreamServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Stream server stopped");
        Ok(())
    }
}

/// Stream server errors.
#[derive(Debug, thiserror::Error)]
pub enum StreamServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn welcome_handler() -> impl IntoResponse {
    (StatusCode::OK, WELCOME)
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Open one stream session and return its response.
///
/// The producer task owns the session and the channel sender; the body
/// stream owns the receiver plus the disconnect guard. When the client
/// goes away the transport drops the body, the guard cancels the token,
/// and the producer terminates without writing another frame. A separate
/// waiter task observes the join-point and logs the terminal outcome
/// exactly once.
async fn stock_stream_handler(State(state): State<Arc<AppState>>) -> Response {
    let setup_started = Instant::now();
    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("stream_session", session_id = %session_id);

    let cancel = CancellationToken::new();
    let (frame_tx, frame_rx) = mpsc::channel::<Bytes>(1);

    let session = StreamSession::new(state.settings.clone());
    let (mut completion, handle) = Completion::new();

    let producer_cancel = cancel.clone();
    tokio::spawn(
        async move {
            let mut sink = ChannelFrameSink::new(frame_tx);
            let outcome = session.run(&mut sink, producer_cancel).await;
            completion.resolve(outcome);
        }
        .instrument(span.clone()),
    );

    tokio::spawn(
        async move {
            match handle.wait().await {
                SessionOutcome::Completed { frames } => {
                    tracing::info!(frames, "stream completed");
                }
                SessionOutcome::Cancelled { frames } => {
                    tracing::info!(frames, "client disconnected, stream cancelled");
                }
                SessionOutcome::Failed { frames, error } => {
                    tracing::error!(frames, error = %error, "stream failed");
                }
            }
        }
        .instrument(span),
    );

    let body = Body::from_stream(SessionBodyStream::new(frame_rx, cancel.drop_guard()));
    let setup_ms = setup_started.elapsed().as_millis();

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("server-timing", format!("app;dur={setup_ms}"))
        .body(body)
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "failed to build stream response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// =============================================================================
// Transport Adapters
// =============================================================================

/// Frame sink writing into the bounded channel feeding one response body.
///
/// The channel has capacity 1, so a write resolves only after the body
/// stream has taken the previous frame: the producer can never run ahead
/// of the transport, and frames reach the wire in write order.
pub struct ChannelFrameSink {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelFrameSink {
    /// Wrap a channel sender.
    #[must_use]
    pub const fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx }
    }
}

impl FrameSink for ChannelFrameSink {
    async fn write_frame(&mut self, frame: &str) -> Result<(), WriteError> {
        self.tx
            .send(Bytes::copy_from_slice(frame.as_bytes()))
            .await
            .map_err(|_| WriteError::Closed)
    }
}

/// Response body stream for one session.
///
/// Wraps the frame channel and holds the disconnect registration: when the
/// transport drops the body (client gone, or response fully sent) the
/// guard cancels the session token. Cancelling after normal completion is
/// a no-op, so the guard is safe to hold on every path.
struct SessionBodyStream {
    frames: ReceiverStream<Bytes>,
    _disconnect: DropGuard,
}

impl SessionBodyStream {
    fn new(rx: mpsc::Receiver<Bytes>, disconnect: DropGuard) -> Self {
        Self {
            frames: ReceiverStream::new(rx),
            _disconnect: disconnect,
        }
    }
}

impl Stream for SessionBodyStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.frames)
            .poll_next(cx)
            .map(|frame| frame.map(Ok))
    }
}

// =============================================================================
// Tests
// =============================================================================
