//! Plain POST requests against a mock server, and a server that hangs up.

use super::{read_head, serve_once};
use http_probe::config::ProbeConfig;
use http_probe::executor::{execute_request, ExecutionConfig, RequestError};
use http_probe::formatter::format_outcome;
use http_probe::scenarios::suites::{json_post, INVALID_JSON, VALID_JSON};
use http_probe::scenarios::{Expectation, Outcome};
use mockito::Matcher;
use std::time::Duration;

fn config_for(base_url: &str) -> ProbeConfig {
    ProbeConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    }
}

fn exec_config() -> ExecutionConfig {
    ExecutionConfig::new(Duration::from_secs(10))
}

#[test]
fn test_valid_json_is_sent_with_all_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users")
        .match_header("content-type", "application/json")
        .match_header("content-length", "20")
        .match_header("authorization", "Bearer valid_token")
        .match_body(VALID_JSON)
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"name":"John Doe"}"#)
        .create();

    let config = config_for(&server.url());
    let request = json_post(config.url_for("/api/users"), VALID_JSON, &config);
    let response = execute_request(&request, &exec_config()).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 201);
    assert_eq!(response.status_text, "Created");
    assert_eq!(response.body_text(), r#"{"id":1,"name":"John Doe"}"#);

    let outcome = Outcome::Response(response);
    assert!(Expectation::Success.evaluate(&outcome).is_pass());

    let printed = format_outcome(&outcome);
    assert!(printed.starts_with("Status Code: 201 Created\n"));
    assert!(printed.contains("\"name\": \"John Doe\""));
}

#[test]
fn test_invalid_json_gets_client_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users")
        .match_body(INVALID_JSON)
        .with_status(400)
        .with_body("invalid json")
        .create();

    let config = config_for(&server.url());
    let request = json_post(config.url_for("/api/users"), INVALID_JSON, &config);
    let response = execute_request(&request, &exec_config()).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 400);
    assert!(Expectation::RejectedOrClosed
        .evaluate(&Outcome::Response(response))
        .is_pass());
}

#[test]
fn test_default_headers_do_not_override_request_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("user-agent", "custom-agent")
        .match_header("x-trace", "1")
        .with_status(204)
        .create();

    let mut config = exec_config();
    config
        .default_headers
        .insert("User-Agent".to_string(), "http-probe/test".to_string());
    config
        .default_headers
        .insert("X-Trace".to_string(), "1".to_string());

    let request = http_probe::models::HttpRequest::post(server.url())
        .with_header("user-agent", "custom-agent")
        .with_body("ping");
    let response = execute_request(&request, &config).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 204);
}

#[test]
fn test_server_error_is_a_response_not_an_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", Matcher::Any)
        .with_status(503)
        .with_body("down")
        .create();

    let config = config_for(&server.url());
    let request = json_post(config.url_for("/api/users"), VALID_JSON, &config);
    let response = execute_request(&request, &exec_config()).unwrap();

    assert!(response.is_server_error());
    let verdict = Expectation::Success.evaluate(&Outcome::Response(response));
    assert!(!verdict.is_pass());
}

#[test]
fn test_hang_up_mid_body_is_connection_closed() {
    let (base_url, server) = serve_once(|mut stream| {
        let (head, _) = read_head(&mut stream);
        // Dropping with most of the body unread makes the kernel reset.
        drop(stream);
        head
    });

    let config = config_for(&base_url);
    let payload = "x".repeat(4 * 1024 * 1024);
    let request = json_post(config.url_for("/"), &payload, &config);
    let err = execute_request(&request, &exec_config()).unwrap_err();

    let head = server.join().unwrap();
    assert!(head.starts_with("POST / HTTP/1.1\r\n"));
    assert!(
        err.is_connection_closed(),
        "expected a closed connection, got {:?}",
        err
    );

    let outcome = Outcome::from(Err::<http_probe::models::HttpResponse, RequestError>(err));
    assert!(Expectation::RejectedOrClosed.evaluate(&outcome).is_pass());
    assert!(format_outcome(&outcome)
        .starts_with("Error: Connection closed by the server. This is expected for 4xx errors."));
}

#[test]
fn test_refused_connection_is_not_closed() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(&format!("http://{}", addr));
    let request = json_post(config.url_for("/"), VALID_JSON, &config);
    let err = execute_request(&request, &exec_config()).unwrap_err();

    assert!(!err.is_connection_closed());
    assert!(matches!(err, RequestError::NetworkError(_)));
}
