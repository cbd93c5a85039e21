//! Shared test fixtures for the Scryfall SDK integration tests.
//!
//! Provides `TestServer`, a minimal HTTP/1.1 server on a background thread
//! that serves canned responses and records every request it receives, plus
//! helpers for building clients and sample card payloads.

#![allow(dead_code)]

use scryfall_sdk::{ScryfallClient, Unlimited};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request as seen by the test server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: Vec<u8>,
    /// Send the body with chunked transfer encoding (no Content-Length).
    pub chunked: bool,
    /// Declare a longer Content-Length than the body, then close.
    pub truncated: bool,
}

impl Canned {
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            chunked: false,
            truncated: false,
        }
    }

    pub fn ok(value: &serde_json::Value) -> Self {
        Self::json(200, serde_json::to_vec(value).unwrap())
    }

    pub fn empty(status: u16) -> Self {
        Self::json(status, Vec::new())
    }

    pub fn chunked(mut self) -> Self {
        self.chunked = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}

type Handler = dyn Fn(&RecordedRequest) -> Canned + Send + Sync + 'static;

pub struct TestServer {
    base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    /// Start a server that answers every request with `handler`.
    pub fn start<H>(handler: H) -> Self
    where
        H: Fn(&RecordedRequest) -> Canned + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let recorded = Arc::clone(&recorded);
                let handler = Arc::clone(&handler);
                thread::spawn(move || serve(stream, &recorded, handler.as_ref()));
            }
        });

        Self {
            base: format!("http://{}", addr),
            requests,
        }
    }

    /// Start a server that answers every request with the same response.
    pub fn fixed(response: Canned) -> Self {
        Self::start(move |_| response.clone())
    }

    /// Base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base
    }

    /// Absolute URL for `path`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, recorded: &Mutex<Vec<RecordedRequest>>, handler: &Handler) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let request = RecordedRequest {
        method,
        path,
        headers,
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);

    let _ = write_response(stream, &response);
}

fn write_response(mut stream: TcpStream, response: &Canned) -> std::io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nConnection: close\r\n",
        response.status
    )?;
    if response.chunked {
        write!(stream, "Transfer-Encoding: chunked\r\n\r\n")?;
        for chunk in response.body.chunks(1024) {
            write!(stream, "{:x}\r\n", chunk.len())?;
            stream.write_all(chunk)?;
            write!(stream, "\r\n")?;
            stream.flush()?;
        }
        write!(stream, "0\r\n\r\n")?;
    } else {
        let declared = response.body.len() + if response.truncated { 64 } else { 0 };
        write!(stream, "Content-Length: {}\r\n\r\n", declared)?;
        stream.write_all(&response.body)?;
    }
    stream.flush()
}

/// Client pointed at `server` with rate limiting disabled.
pub fn client_for(server: &TestServer) -> ScryfallClient {
    client_for_url(server.url())
}

/// Client pointed at `base` with rate limiting disabled.
pub fn client_for_url(base: &str) -> ScryfallClient {
    ScryfallClient::builder()
        .base_url(base)
        .user_agent("scryfall-sdk-tests/0.1")
        .rate_limiter(Arc::new(Unlimited))
        .build()
        .unwrap()
}

/// A JSON array of `n` small cards with ids `card-1..=card-n`.
pub fn sample_cards(n: usize) -> serde_json::Value {
    serde_json::Value::Array(
        (1..=n)
            .map(|i| {
                serde_json::json!({
                    "object": "card",
                    "id": format!("card-{}", i),
                    "name": format!("Test Card {}", i),
                    "set": "tst",
                    "collector_number": i.to_string(),
                    "rarity": "common",
                    "prices": {"usd": format!("{}.99", i), "eur": null},
                })
            })
            .collect(),
    )
}
