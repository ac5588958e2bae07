//! End-to-end Host scenarios over raw TCP, so duplicate and malformed
//! headers reach the server exactly as written.

mod common;

use common::{entry, raw_request, start_server, start_with_config};
use header_compliance::compliance::mode::{LEGACY, RFC6265};
use header_compliance::compliance::ViolationKind;
use header_compliance::config::{ComplianceConfig, CustomModeConfig, ServerConfig};

#[tokio::test]
async fn test_single_host_accepted() {
    let server = start_server(RFC6265, true).await;
    let response = raw_request(server.addr, "/cookie", &["Host: localhost:8080"]).await;

    assert_eq!(response.status, 200);
    assert!(response.header("x-request-id").is_some());
    assert_eq!(response.header("x-compliance-violations"), Some("0"));
}

#[tokio::test]
async fn test_identical_duplicate_hosts_rejected_strict() {
    let server = start_server(RFC6265, true).await;
    let response = raw_request(
        server.addr,
        "/cookie",
        &["Host: localhost", "Host: localhost", "Cookie: a=1"],
    )
    .await;

    assert_eq!(response.status, 400);
    assert_eq!(response.header("connection"), Some("close"));
    let entries = response.entries();
    assert_eq!(entry(&entries, "reason"), Some("DUPLICATE_HOST_HEADERS"));
    assert_eq!(entry(&entries, "cookies.length"), None);
}

#[tokio::test]
async fn test_identical_duplicate_hosts_tolerated() {
    let server = start_server(LEGACY, true).await;
    let response = raw_request(
        server.addr,
        "/cookie",
        &["Host: localhost", "Host: localhost", "Cookie: a=1"],
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header("x-compliance-violations"), Some("1"));
    let entries = response.entries();
    assert_eq!(entry(&entries, "cookie.a"), Some("1"));
    assert!(entry(&entries, "violation.0")
        .unwrap()
        .starts_with("DUPLICATE_HOST_HEADERS"));
}

#[tokio::test]
async fn test_differing_hosts_rejected_in_every_mode() {
    for mode in [RFC6265, LEGACY] {
        let server = start_server(mode, true).await;
        let response = raw_request(
            server.addr,
            "/cookie",
            &["Host: a.example", "Host: b.example"],
        )
        .await;
        assert_eq!(response.status, 400, "mode {}", mode);
    }
}

#[tokio::test]
async fn test_negative_port_rejected() {
    let server = start_server(RFC6265, true).await;
    let response = raw_request(server.addr, "/cookie", &["Host: host:-10"]).await;

    assert_eq!(response.status, 400);
    assert_eq!(
        entry(&response.entries(), "reason"),
        Some("UNSAFE_HOST_HEADER")
    );
}

#[tokio::test]
async fn test_host_check_precedes_routing() {
    let server = start_server(RFC6265, true).await;

    let rejected = raw_request(server.addr, "/missing", &["Host: host:-10"]).await;
    assert_eq!(rejected.status, 400);

    let missing = raw_request(server.addr, "/missing", &["Host: localhost"]).await;
    assert_eq!(missing.status, 404);
}

#[tokio::test]
async fn test_custom_mode_from_config() {
    let mut config = ServerConfig::default();
    config.compliance = ComplianceConfig {
        mode: "HOST_LENIENT".into(),
        modes: vec![CustomModeConfig {
            name: "HOST_LENIENT".into(),
            tolerate: vec![ViolationKind::UnsafeHostHeader],
        }],
        ..ComplianceConfig::default()
    };
    let server = start_with_config(config).await;

    let response = raw_request(server.addr, "/cookie", &["Host: host:-10"]).await;
    assert_eq!(response.status, 200);
    assert!(entry(&response.entries(), "violation.0")
        .unwrap()
        .starts_with("UNSAFE_HOST_HEADER"));
}
