#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use hostel_console::services::{AuthGateway, BookingsClient};
use hostel_console::token_store::MemoryTokenStore;

/// HTTP client with a short timeout so broken tests fail fast
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("failed to build test HTTP client")
}

/// Build an auth gateway over a shared in-memory token store
pub fn gateway(base_url: &str, store: Arc<MemoryTokenStore>, local_admin: bool) -> AuthGateway {
    AuthGateway::new(http_client(), base_url, store, local_admin)
}

/// Build a bookings client over a shared in-memory token store
pub fn bookings_client(base_url: &str, store: Arc<MemoryTokenStore>) -> BookingsClient {
    BookingsClient::new(http_client(), base_url, store)
}

/// Serve exactly one HTTP request with a canned response.
///
/// Returns the base URL to point a client at and a handle resolving to
/// the raw request text once the exchange completes. The listener is
/// gone after the single exchange, so later requests to the same address
/// are refused.
pub async fn one_shot_server(
    status: u16,
    reason: &'static str,
    body: &str,
) -> (String, JoinHandle<String>) {
    let response = http_response(status, reason, body);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("no connection arrived");
        let request = read_request(&mut stream).await;
        stream
            .write_all(response.as_bytes())
            .await
            .expect("failed to write canned response");
        stream.shutdown().await.ok();
        request
    });

    (format!("http://{}", addr), handle)
}

/// Serve two HTTP requests where the first connection answers only after
/// the second has been answered.
///
/// Lets a test start a request, let a later one complete first, and then
/// release the earlier one. Connections are answered in accept order:
/// the first gets `delayed_body` late, the second gets `immediate_body`
/// right away.
pub async fn staggered_server(
    delayed_body: String,
    immediate_body: String,
) -> (String, JoinHandle<()>) {
    let delayed = http_response(200, "OK", &delayed_body);
    let immediate = http_response(200, "OK", &immediate_body);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut slow, _) = listener.accept().await.expect("no first connection");
        read_request(&mut slow).await;

        let (mut fast, _) = listener.accept().await.expect("no second connection");
        read_request(&mut fast).await;
        fast.write_all(immediate.as_bytes())
            .await
            .expect("failed to write immediate response");
        fast.shutdown().await.ok();

        tokio::time::sleep(Duration::from_millis(100)).await;
        slow.write_all(delayed.as_bytes())
            .await
            .expect("failed to write delayed response");
        slow.shutdown().await.ok();
    });

    (format!("http://{}", addr), handle)
}

fn http_response(status: u16, reason: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}

/// Base URL on a loopback port nothing listens on, to provoke
/// connection-level failures
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.expect("read failed");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_subsequence(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]);
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A user payload in the backend's wire shape
pub fn user_json(role: &str, hostel_id: Option<u64>) -> serde_json::Value {
    let mut user = serde_json::json!({
        "id": 1,
        "email": "operator@hostel.example",
        "name": "Operator",
        "username": "operator",
        "role": role,
    });
    if let Some(id) = hostel_id {
        user["hostel_id"] = serde_json::json!(id);
    }
    user
}
