//! Shared helpers for integration tests: a canned HTTP server and a
//! multipart body parser.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parts of the multipart body, in order.
    pub fn parts(&self) -> Vec<Part> {
        let content_type = self.header("content-type").unwrap_or_default();
        let boundary = content_type
            .split("boundary=")
            .nth(1)
            .expect("multipart boundary")
            .trim();
        parse_multipart(&self.body, boundary)
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.parts()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| String::from_utf8_lossy(&p.data).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Route the crate's log output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Server answering a fixed list of responses, one per connection.
pub struct CannedServer {
    pub port: u16,
    handle: JoinHandle<Vec<CapturedRequest>>,
}

impl CannedServer {
    /// Start a server that answers `responses` in order, then stops.
    pub fn start(responses: Vec<(u16, Vec<u8>)>) -> Self {
        init_logging();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().expect("local addr").port();

        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let (stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                if let Some(request) = handle_connection(stream, status, &body) {
                    captured.push(request);
                }
            }
            captured
        });

        Self { port, handle }
    }

    /// Wait for all canned responses to be served and return the requests.
    pub fn finish(self) -> Vec<CapturedRequest> {
        self.handle.join().expect("test server thread")
    }
}

/// A listener that completes the TCP handshake but never answers.
///
/// Connections wait in the accept backlog for as long as the returned
/// listener is alive.
pub fn silent_listener() -> (TcpListener, u16) {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind silent listener");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

fn handle_connection(stream: TcpStream, status: u16, body: &[u8]) -> Option<CapturedRequest> {
    stream.set_read_timeout(Some(Duration::from_secs(10))).ok()?;
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut words = request_line.split_whitespace();
    let method = words.next()?.to_string();
    let path = words.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };

    let request_body = if header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        read_chunked(&mut reader)?
    } else {
        let length: usize = header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let mut buf = vec![0u8; length];
        reader.read_exact(&mut buf).ok()?;
        buf
    };

    let mut stream = stream;
    let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    stream.write_all(head.as_bytes()).ok()?;
    stream.write_all(body).ok()?;
    stream.flush().ok()?;

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: request_body,
    })
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).ok()?;
        let size = usize::from_str_radix(size_line.trim().split(';').next()?, 16).ok()?;
        if size == 0 {
            let mut trailer = String::new();
            reader.read_line(&mut trailer).ok()?;
            return Some(body);
        }
        let mut chunk = vec![0u8; size + 2];
        reader.read_exact(&mut chunk).ok()?;
        chunk.truncate(size);
        body.extend_from_slice(&chunk);
    }
}

/// Split a multipart body into its parts.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Vec<Part> {
    let delimiter = format!("--{}", boundary).into_bytes();
    let mut parts = Vec::new();

    let positions: Vec<usize> = body
        .windows(delimiter.len())
        .enumerate()
        .filter(|(_, w)| *w == delimiter.as_slice())
        .map(|(i, _)| i)
        .collect();

    for pair in positions.windows(2) {
        // Skip the delimiter and its CRLF; drop the CRLF before the next one.
        let start = pair[0] + delimiter.len() + 2;
        let end = pair[1] - 2;
        let section = &body[start..end];

        let split = section
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("part header terminator");
        let head = String::from_utf8_lossy(&section[..split]).into_owned();
        let data = section[split + 4..].to_vec();

        let mut name = String::new();
        let mut filename = None;
        let mut content_type = None;
        for line in head.split("\r\n") {
            if let Some(rest) = line.strip_prefix("Content-Disposition: form-data;") {
                for param in rest.split(';') {
                    let param = param.trim();
                    if let Some(v) = param.strip_prefix("name=") {
                        name = v.trim_matches('"').to_string();
                    } else if let Some(v) = param.strip_prefix("filename=") {
                        filename = Some(v.trim_matches('"').to_string());
                    }
                }
            } else if let Some(v) = line.strip_prefix("Content-Type: ") {
                content_type = Some(v.to_string());
            }
        }

        parts.push(Part {
            name,
            filename,
            content_type,
            data,
        });
    }

    parts
}
