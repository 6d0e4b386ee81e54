//! Integration tests for the HTTP transport against a local canned server.

mod common;

use std::time::{Duration, Instant};

use common::{CannedServer, closed_port, silent_listener};
use html2pdf_client::prelude::*;

fn config_for(port: u16) -> ClientConfigBuilder {
    ClientConfigBuilder::new()
        .credentials("alice", "s3cret")
        .host("127.0.0.1")
        .http_port(port)
        .timeout(Duration::from_secs(10))
}

fn client_for(port: u16) -> Client {
    Client::with_config(config_for(port).build().unwrap())
}

/// Test that a 200 body reaches the caller byte for byte.
#[test]
fn test_success_bytes_are_identical() {
    let pdf: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
    let server = CannedServer::start(vec![(200, pdf.clone())]);

    let client = client_for(server.port);
    let output = client.convert_html("<h1>Hello</h1>").unwrap();
    assert_eq!(output, pdf);

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/pdf/convert/html/");
}

/// Test the request fields: options, credentials and source.
#[test]
fn test_request_fields() {
    let server = CannedServer::start(vec![(200, b"%PDF".to_vec())]);

    let mut client = client_for(server.port);
    client
        .options_mut()
        .set_page_width("210mm")
        .unwrap()
        .enable_javascript(false)
        .set_page_layout(PageLayout::Continuous);

    client.convert_uri("https://example.com/report").unwrap();

    let requests = server.finish();
    let request = &requests[0];
    assert_eq!(request.path, "/api/pdf/convert/uri/");
    assert!(
        request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );
    assert!(request.header("user-agent").unwrap().starts_with("html2pdf-client/"));

    let parts = request.parts();
    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    // 3 options + username, key, src
    assert_eq!(
        names,
        vec!["width", "page_layout", "no_javascript", "username", "key", "src"]
    );
    assert_eq!(request.field("width").as_deref(), Some("210mm"));
    assert_eq!(request.field("no_javascript").as_deref(), Some("true"));
    assert_eq!(request.field("page_layout").as_deref(), Some("2"));
    assert_eq!(request.field("username").as_deref(), Some("alice"));
    assert_eq!(request.field("key").as_deref(), Some("s3cret"));
    assert_eq!(request.field("src").as_deref(), Some("https://example.com/report"));
}

/// Test that a local file is uploaded as a file part.
#[test]
fn test_file_upload() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.html");
    std::fs::write(&input, "<table><tr><td>42</td></tr></table>").unwrap();
    let output = dir.path().join("invoice.pdf");

    let server = CannedServer::start(vec![(200, b"%PDF-1.7".to_vec())]);
    let client = client_for(server.port);

    let written = client.convert_file_to_file(&input, &output).unwrap();
    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.7");

    let requests = server.finish();
    assert_eq!(requests[0].path, "/api/pdf/convert/upload/");

    let parts = requests[0].parts();
    let src = parts.iter().find(|p| p.name == "src").unwrap();
    assert_eq!(src.filename.as_deref(), Some("invoice.html"));
    assert_eq!(src.content_type.as_deref(), Some("text/html"));
    assert_eq!(src.data, b"<table><tr><td>42</td></tr></table>");
}

/// Test that a structured error body becomes a structured error.
#[test]
fn test_structured_error() {
    let server = CannedServer::start(vec![(
        400,
        b"400.12 - Invalid page size. Documentation link: http://example.com/d1".to_vec(),
    )]);

    let client = client_for(server.port);
    let err = client.convert_html("<p>x</p>").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.reason_code(), 12);
    assert_eq!(err.message(), "Invalid page size.");
    assert_eq!(err.documentation_link(), "http://example.com/d1");

    server.finish();
}

/// Test that a free-form error body keeps the observed status.
#[test]
fn test_unstructured_error() {
    let server = CannedServer::start(vec![(503, b"Service Unavailable".to_vec())]);

    let client = client_for(server.port);
    let err = client.convert_html("<p>x</p>").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unstructured);
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.reason_code(), -1);
    assert_eq!(err.message(), "Service Unavailable");
    assert_eq!(err.to_string(), "503 - Service Unavailable");

    server.finish();
}

/// Test that an unreachable service is a transport error.
#[test]
fn test_connection_refused() {
    let client = client_for(closed_port());
    let err = client.convert_html("<p>x</p>").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), None);
    assert_eq!(err.reason_code(), -1);
    assert!(!err.message().is_empty());
}

/// Test that a service that never answers hits the configured timeout.
#[test]
fn test_unanswered_request_times_out() {
    let (_listener, port) = silent_listener();

    let config = config_for(port)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let client = Client::with_config(config);

    let started = Instant::now();
    let err = client.convert_html("<p>x</p>").unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), None);
    assert_eq!(err.reason_code(), -1);
    assert!(elapsed < Duration::from_secs(8), "took {:?}", elapsed);
}

/// Test that a redirect is reported, not followed.
#[test]
fn test_redirect_is_not_followed() {
    let server = CannedServer::start(vec![(302, b"Found".to_vec())]);

    let client = client_for(server.port);
    let err = client.convert_html("<p>x</p>").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unstructured);
    assert_eq!(err.status_code(), Some(302));
    assert_eq!(err.message(), "Found");
    assert_eq!(server.finish().len(), 1);
}

/// Test that the fallback port is used once the primary refuses.
#[test]
fn test_fallback_port() {
    let server = CannedServer::start(vec![(200, b"from fallback".to_vec())]);

    let config = config_for(closed_port())
        .fallback_port(server.port)
        .build()
        .unwrap();
    let client = Client::with_config(config);

    assert_eq!(client.convert_html("<p>x</p>").unwrap(), b"from fallback");

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].field("src").as_deref(), Some("<p>x</p>"));
}

/// Test the token balance query.
#[test]
fn test_num_tokens() {
    let server = CannedServer::start(vec![(200, b"9876\n".to_vec())]);

    let client = client_for(server.port);
    assert_eq!(client.num_tokens().unwrap(), 9876);

    let requests = server.finish();
    assert_eq!(requests[0].path, "/api/user/alice/tokens/");
    assert_eq!(requests[0].field("key").as_deref(), Some("s3cret"));
}

/// Test that a missing input file never reaches the network.
#[test]
fn test_missing_file_is_usage_error() {
    let client = client_for(closed_port());
    let err = client.convert_file("/no/such/input.html").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

/// Test image output selects the image endpoint family.
#[test]
fn test_image_endpoint() {
    let server = CannedServer::start(vec![(200, b"\x89PNG".to_vec())]);

    let config = config_for(server.port)
        .output_format(OutputFormat::Image)
        .build()
        .unwrap();
    let client = Client::with_config(config);

    assert_eq!(client.convert_html("<p>x</p>").unwrap(), b"\x89PNG");
    assert_eq!(server.finish()[0].path, "/api/image/convert/html/");
}
