//! Tracing Initialization
//!
//! Console logging for the server: an `EnvFilter` honoring `RUST_LOG` on
//! top of sensible defaults, plus a fmt layer. Sessions stay independently
//! observable through per-session spans carrying a `session_id` field; no
//! session code logs outside its own span.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// Call once at startup. `RUST_LOG` extends or overrides the default
/// directives.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(
            "stock_stream_server=info"
                .parse()
                .expect("static directive 'stock_stream_server=info' is valid"),
        )
        .add_directive(
            "hyper=warn"
                .parse()
                .expect("static directive 'hyper=warn' is valid"),
        )
        .add_directive(
            "h2=warn"
                .parse()
                .expect("static directive 'h2=warn' is valid"),
        );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
