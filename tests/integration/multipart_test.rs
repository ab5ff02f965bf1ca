//! Multipart uploads of in-memory files.

use super::{read_framed_body, read_head, serve_once};
use http_probe::executor::{execute_request, ExecutionConfig};
use http_probe::multipart::{repeated, VirtualFile};
use http_probe::scenarios::suites::{
    upload, LARGE_FILE_SIZE, NON_ASCII_FILE_NAME, SMALL_FILE_CONTENT,
};
use http_probe::scenarios::{Expectation, Outcome};
use mockito::Matcher;
use std::io::Write;
use std::time::Duration;

fn exec_config() -> ExecutionConfig {
    ExecutionConfig::new(Duration::from_secs(30))
}

fn multipart_content_type() -> Matcher {
    Matcher::Regex("^multipart/form-data; boundary=.+".to_string())
}

#[test]
fn test_small_file_upload() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", multipart_content_type())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file1"; filename="small.txt""#.to_string()),
            Matcher::Regex("Content-Type: application/octet-stream".to_string()),
            Matcher::Regex("Hello, this is a small virtual file.".to_string()),
        ]))
        .with_status(200)
        .with_body("uploaded 1 file")
        .create();

    let request = upload(
        server.url(),
        vec![VirtualFile::new("small.txt", SMALL_FILE_CONTENT)],
    );
    let response = execute_request(&request, &exec_config()).unwrap();

    mock.assert();
    assert_eq!(response.body_text(), "uploaded 1 file");
    assert!(Expectation::Handled
        .evaluate(&Outcome::Response(response))
        .is_pass());
}

#[test]
fn test_multiple_files_get_positional_field_names() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", multipart_content_type())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file1"; filename="file1.bin""#.to_string()),
            Matcher::Regex(r#"name="file2"; filename="file2.bin""#.to_string()),
            Matcher::Regex(r#"name="file3"; filename="file3.bin""#.to_string()),
            Matcher::Regex("B{128}".to_string()),
            Matcher::Regex("D{512}".to_string()),
        ]))
        .with_status(200)
        .create();

    let request = upload(
        server.url(),
        vec![
            VirtualFile::new("file1.bin", repeated(b'B', 128)),
            VirtualFile::new("file2.bin", repeated(b'C', 256)),
            VirtualFile::new("file3.bin", repeated(b'D', 512)),
        ],
    );
    let response = execute_request(&request, &exec_config()).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 200);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[test]
fn test_non_ascii_file_name_is_sent_verbatim() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", multipart_content_type())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file1"; filename="spécial_文件\.txt""#.to_string()),
            Matcher::Regex("Hello, this is a small virtual file.".to_string()),
        ]))
        .with_status(200)
        .create();

    let request = upload(
        server.url(),
        vec![VirtualFile::new(NON_ASCII_FILE_NAME, SMALL_FILE_CONTENT)],
    );
    let response = execute_request(&request, &exec_config()).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 200);
}

#[test]
fn test_large_file_arrives_whole() {
    let (base_url, server) = serve_once(|mut stream| {
        let (head, early) = read_head(&mut stream);
        let body = read_framed_body(&mut stream, &head, early);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .unwrap();
        body
    });

    let request = upload(
        base_url,
        vec![VirtualFile::new("large.bin", repeated(b'A', LARGE_FILE_SIZE))],
    );
    let response = execute_request(&request, &exec_config()).unwrap();
    let body = server.join().unwrap();
    assert_eq!(response.status_code, 200);

    let disposition = find(&body, br#"name="file1"; filename="large.bin""#)
        .expect("large.bin part header");
    let content_start = disposition
        + find(&body[disposition..], b"\r\n\r\n").expect("end of part headers")
        + 4;
    let content_end = content_start + LARGE_FILE_SIZE;

    assert!(body.len() > content_end, "part cut short at {} bytes", body.len());
    assert!(body[content_start..content_end].iter().all(|b| *b == b'A'));
    assert!(body[content_end..].starts_with(b"\r\n--"));
}

#[test]
fn test_empty_file_is_still_a_part() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(r#"filename="empty.txt""#.to_string()))
        .with_status(200)
        .create();

    let request = upload(server.url(), vec![VirtualFile::new("empty.txt", Vec::new())]);
    execute_request(&request, &exec_config()).unwrap();

    mock.assert();
}

#[test]
fn test_request_content_headers_are_replaced_by_the_encoder() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", multipart_content_type())
        .with_status(200)
        .create();

    let request = upload(
        server.url(),
        vec![VirtualFile::new("small.txt", SMALL_FILE_CONTENT)],
    )
    .with_header("Content-Type", "application/json")
    .with_header("Content-Length", "1");
    execute_request(&request, &exec_config()).unwrap();

    mock.assert();
}

#[test]
fn test_server_error_on_upload_fails_handled() {
    let mut server = mockito::Server::new();
    server.mock("POST", "/").with_status(500).create();

    let request = upload(
        server.url(),
        vec![VirtualFile::new("small.txt", SMALL_FILE_CONTENT)],
    );
    let response = execute_request(&request, &exec_config()).unwrap();

    let verdict = Expectation::Handled.evaluate(&Outcome::Response(response));
    assert!(!verdict.is_pass());
    assert!(verdict.to_string().contains("500"));
}
