//! Shared test infrastructure.
//!
//! Besides mockito, some tests need a server whose every byte is under the
//! test's control (broken framing, hang-ups, raw request capture).
//! [`serve_once`] accepts a single connection on a loopback port and hands
//! it to a closure.

pub mod multipart_test;
pub mod post_test;

use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Accepts one connection and runs `handler` on it in a background thread.
///
/// Returns the base URL to send to and the handle yielding the handler's
/// result.
pub fn serve_once<T, F>(handler: F) -> (String, JoinHandle<T>)
where
    F: FnOnce(TcpStream) -> T + Send + 'static,
    T: Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("set read timeout");
        handler(stream)
    });

    (format!("http://{}", addr), handle)
}

/// Reads up to and including the blank line ending a request head.
///
/// Returns the head and whatever body bytes arrived in the same reads.
pub fn read_head(stream: &mut TcpStream) -> (String, Vec<u8>) {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        if let Some(end) = find_head_end(&received) {
            let rest = received.split_off(end);
            return (String::from_utf8_lossy(&received).into_owned(), rest);
        }
        let n = stream.read(&mut buf).expect("read request head");
        assert!(n > 0, "client closed before finishing the request head");
        received.extend_from_slice(&buf[..n]);
    }
}

/// Reads body bytes until `len` have arrived in total.
pub fn read_body(stream: &mut TcpStream, mut body: Vec<u8>, len: usize) -> Vec<u8> {
    let mut buf = [0u8; 8192];
    while body.len() < len {
        let n = stream.read(&mut buf).expect("read request body");
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body
}

/// Reads a whole request body framed by Content-Length or chunked coding.
pub fn read_framed_body(stream: &mut TcpStream, head: &str, early: Vec<u8>) -> Vec<u8> {
    let chunked = head.lines().any(|line| {
        line.split_once(':').map_or(false, |(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.to_ascii_lowercase().contains("chunked")
        })
    });
    if !chunked {
        return read_body(stream, early, content_length(head));
    }

    let mut raw = early;
    let mut buf = [0u8; 8192];
    loop {
        if let Some(body) = decode_chunked(&raw) {
            return body;
        }
        let n = stream.read(&mut buf).expect("read chunked body");
        assert!(n > 0, "client closed inside a chunked body");
        raw.extend_from_slice(&buf[..n]);
    }
}

/// Decodes a complete chunked body, or `None` while more bytes are needed.
fn decode_chunked(raw: &[u8]) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    let mut pos = 0;
    loop {
        let line_end = raw[pos..].windows(2).position(|w| w == b"\r\n")? + pos;
        let size_text = String::from_utf8_lossy(&raw[pos..line_end]);
        let size_text = size_text.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_text, 16).expect("chunk size");
        let data_start = line_end + 2;
        if size == 0 {
            return Some(body);
        }
        let data_end = data_start + size;
        if raw.len() < data_end + 2 {
            return None;
        }
        body.extend_from_slice(&raw[data_start..data_end]);
        pos = data_end + 2;
    }
}

/// Reads until the client closes or goes quiet.
pub fn drain(stream: &mut TcpStream, quiet_after: Duration) -> Vec<u8> {
    stream
        .set_read_timeout(Some(quiet_after))
        .expect("set read timeout");
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    while let Ok(n) = stream.read(&mut buf) {
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }
    received
}

/// Value of the Content-Length header in a raw request head.
pub fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn find_head_end(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}
