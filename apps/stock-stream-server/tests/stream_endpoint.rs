//! Stream Endpoint Integration Tests
//!
//! Exercises the full HTTP surface over a real listener: frame contents
//! and ordering, disconnect handling, CORS, and session independence.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use stock_stream_server::{AppState, DEFAULT_SYMBOLS, SessionSettings, router};

/// Spin up a server on a random port and return its address.
async fn spawn_server(settings: SessionSettings) -> (SocketAddr, CancellationToken) {
    let state = Arc::new(AppState::new(settings));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .unwrap();
    });

    (addr, cancel)
}

fn fast_settings() -> SessionSettings {
    SessionSettings {
        tick_interval: Duration::from_millis(20),
        max_ticks: 10,
    }
}

/// Split a complete SSE body into frames, separators included.
fn split_frames(body: &str) -> Vec<&str> {
    body.split_inclusive("\n\n").collect()
}

/// Assert one frame matches `data: {SYMBOL}: \d+\.\d{2}\n\n` with a price
/// in the simulated band.
fn assert_frame(frame: &str, expected_symbol: &str) {
    let prefix = format!("data: {expected_symbol}: ");
    assert!(
        frame.starts_with(&prefix),
        "frame {frame:?} does not start with {prefix:?}"
    );
    assert!(frame.ends_with("\n\n"), "frame {frame:?} lacks separator");

    let value = &frame[prefix.len()..frame.len() - 2];
    let (int_part, dec_part) = value.split_once('.').expect("price has a decimal point");
    assert!(int_part.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(dec_part.len(), 2, "price {value:?} not two decimals");
    assert!(dec_part.chars().all(|c| c.is_ascii_digit()));

    let price: f64 = value.parse().unwrap();
    assert!(
        (100.0..110.0).contains(&price),
        "price {price} out of band"
    );
}

#[tokio::test]
async fn full_run_emits_ten_frames_in_symbol_order() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;
    let client = reqwest::Client::new();

    let response = timeout(
        Duration::from_secs(5),
        client.get(format!("http://{addr}/stock-stream")).send(),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "text/event-stream");
    assert_eq!(headers.get("cache-control").unwrap(), "no-cache");
    assert!(
        headers
            .get("server-timing")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("app;dur=")
    );

    let body = timeout(Duration::from_secs(5), response.text())
        .await
        .unwrap()
        .unwrap();

    let frames = split_frames(&body);
    assert_eq!(frames.len(), 10, "unexpected body: {body:?}");
    for (i, frame) in frames.iter().enumerate() {
        assert_frame(frame, DEFAULT_SYMBOLS[i % DEFAULT_SYMBOLS.len()]);
    }
}

#[tokio::test]
async fn immediate_disconnect_leaves_server_healthy() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;
    let client = reqwest::Client::new();

    // Connect, then hang up before the first tick fires.
    let response = client
        .get(format!("http://{addr}/stock-stream"))
        .send()
        .await
        .unwrap();
    drop(response);

    // The server must keep serving fresh requests.
    let welcome = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(welcome.status(), 200);
    assert_eq!(
        welcome.text().await.unwrap(),
        "Welcome to the Stock Stream Demo!"
    );
}

#[tokio::test]
async fn disconnect_mid_stream_stops_after_prefix() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;
    let client = reqwest::Client::new();

    let mut response = client
        .get(format!("http://{addr}/stock-stream"))
        .send()
        .await
        .unwrap();

    // Read until three full frames arrived, then hang up.
    let mut received = String::new();
    while received.matches("\n\n").count() < 3 {
        let chunk = timeout(Duration::from_secs(5), response.chunk())
            .await
            .unwrap()
            .unwrap()
            .expect("stream ended before three frames");
        received.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    drop(response);

    // Give the session a moment to observe the disconnect, then verify a
    // fresh stream still runs end to end.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let body = client
        .get(format!("http://{addr}/stock-stream"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(split_frames(&body).len(), 10);
}

#[tokio::test]
async fn concurrent_sessions_are_independent() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/stock-stream");

    let (first, second) = tokio::join!(
        async {
            let response = client.get(&url).send().await.unwrap();
            timeout(Duration::from_secs(5), response.text())
                .await
                .unwrap()
                .unwrap()
        },
        async {
            let response = client.get(&url).send().await.unwrap();
            timeout(Duration::from_secs(5), response.text())
                .await
                .unwrap()
                .unwrap()
        },
    );

    for body in [first, second] {
        let frames = split_frames(&body);
        assert_eq!(frames.len(), 10);
        for (i, frame) in frames.iter().enumerate() {
            assert_frame(frame, DEFAULT_SYMBOLS[i % DEFAULT_SYMBOLS.len()]);
        }
    }
}

#[tokio::test]
async fn liveness_probe_responds() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;

    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (addr, _cancel) = spawn_server(fast_settings()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("origin", "http://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
