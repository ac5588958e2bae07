//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use header_compliance::config::{ComplianceConfig, ServerConfig};
use header_compliance::http::parse_properties;
use header_compliance::lifecycle::resolve_mode;
use header_compliance::{HttpServer, Shutdown};

/// A server bound to an ephemeral port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server under the named built-in mode.
pub async fn start_server(mode: &str, record_violations: bool) -> TestServer {
    let mut config = ServerConfig::default();
    config.compliance = ComplianceConfig {
        mode: mode.to_string(),
        record_violations,
        ..ComplianceConfig::default()
    };
    start_with_config(config).await
}

pub async fn start_with_config(config: ServerConfig) -> TestServer {
    let mode = resolve_mode(&config.compliance, None).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, mode);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer { addr, shutdown }
}

/// A parsed HTTP/1.1 response read off a raw socket.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        parse_properties(&self.body)
    }
}

/// Send a hand-written request and read until the server closes the socket.
///
/// `header_lines` are sent verbatim, so repeated or malformed headers reach
/// the server untouched.
pub async fn raw_request(addr: SocketAddr, path: &str, header_lines: &[&str]) -> RawResponse {
    let mut request = format!("GET {} HTTP/1.1\r\n", path);
    for line in header_lines {
        request.push_str(line);
        request.push_str("\r\n");
    }
    request.push_str("Connection: close\r\n\r\n");

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("server did not close the connection")
        .unwrap();

    parse_raw_response(&String::from_utf8_lossy(&buf))
}

fn parse_raw_response(text: &str) -> RawResponse {
    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text, ""));
    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body: body.to_string(),
    }
}

/// Look up the first entry with `key`.
pub fn entry<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
