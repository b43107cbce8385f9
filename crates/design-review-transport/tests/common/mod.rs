//! Shared fixtures for transport integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use design_review_transport::{AnalysisTransport, TransportError, TransportResponse};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Transport that replays one canned outcome and records request bodies.
#[allow(dead_code)]
pub struct ScriptedTransport {
    outcome: Result<TransportResponse, TransportError>,
    pub requests: Mutex<Vec<Vec<u8>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn responding(status: u16, content_type: Option<&str>, body: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(TransportResponse {
                status,
                content_type: content_type.map(str::to_string),
                body: body.as_bytes().to_vec(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn post_json(
        &self,
        _url: &Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().expect("request log lock").push(body);
        self.outcome.clone()
    }
}

/// Serves exactly one canned HTTP/1.1 response on a loopback port.
///
/// Returns the base URL and a handle resolving to the raw request bytes.
#[allow(dead_code)]
pub async fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    serve_with_declared_length(status_line, content_type, body.len(), body).await
}

/// Like [`serve_once`] but advertises `declared_len` as `Content-Length`.
///
/// A declared length above `body.len()` simulates a connection cut mid-body.
#[allow(dead_code)]
pub async fn serve_with_declared_length(
    status_line: &'static str,
    content_type: &'static str,
    declared_len: usize,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("loopback listener should bind");
    let address = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("client should connect");
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {declared_len}\r\nConnection: close\r\n\r\n{body}"
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("response should be written");
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{address}"), handle)
}

#[allow(dead_code)]
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    loop {
        let read = socket.read(&mut chunk).await.expect("request should be readable");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

/// HTTP transport that ignores proxy environment variables.
#[allow(dead_code)]
pub fn loopback_transport() -> Arc<design_review_transport::HttpTransport> {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("reqwest client should build");
    Arc::new(design_review_transport::HttpTransport::with_client(client))
}
