//! Shared fixtures for the integration suites: a recording stub provider
//! and a loopback HTTP responder that speaks just enough HTTP/1.1 for
//! `reqwest`.

use domain::error::ProviderError;
use domain::models::{ChatRequest, EmbeddingRequest};
use domain::provider::{ChatProvider, EmbeddingProvider};
use infrastructure::config::Config;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub fn test_config(base_url: &str) -> Config {
    Config {
        api_key: "sk-test".to_string(),
        embedding_model: "text-embedding-3-small".to_string(),
        chat_model: "gpt-4.1-mini".to_string(),
        base_url: base_url.to_string(),
    }
}

/// Provider double answering both embeddings and chats, recording all calls.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    dimensions: usize,
    reply: String,
    failure: Option<ProviderError>,
    embeddings: Arc<Mutex<Vec<EmbeddingRequest>>>,
    chats: Arc<Mutex<Vec<ChatRequest>>>,
}

impl RecordingProvider {
    pub fn new(dimensions: usize, reply: &str) -> Self {
        Self {
            dimensions,
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(failure: ProviderError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn embedding_requests(&self) -> Vec<EmbeddingRequest> {
        self.embeddings.lock().unwrap().clone()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chats.lock().unwrap().clone()
    }
}

impl EmbeddingProvider for RecordingProvider {
    async fn create_embedding(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ProviderError> {
        self.embeddings.lock().unwrap().push(request);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok((0..self.dimensions).map(|i| i as f32 / 10.0).collect()),
        }
    }
}

impl ChatProvider for RecordingProvider {
    async fn create_chat_completion(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.chats.lock().unwrap().push(request);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.reply.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Answers every connection with the same canned response.
pub struct LoopbackServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl LoopbackServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::default();
        let captured = Arc::clone(&requests);
        let body = body.to_string();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let captured = Arc::clone(&captured);
                let body = body.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, status, &body, captured).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

async fn serve(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    captured.lock().unwrap().push(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..]).into_owned(),
    });

    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
