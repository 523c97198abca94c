use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn tripdesk() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tripdesk"));
    cmd.env_remove("TRIPDESK_CONFIG");
    cmd
}

#[test]
fn test_country_lookup() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/name/France")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"capital": ["Paris"], "population": 67391582}]"#)
        .create();

    tripdesk()
        .args(["country", "France", "--country-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""capital": "Paris""#))
        .stdout(predicate::str::contains("67391582"));
}

#[test]
fn test_not_found_prints_payload_and_fails() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/name/Atlantis")
        .with_status(404)
        .with_body(r#"{"status": 404, "message": "Not Found"}"#)
        .expect(1)
        .create();

    tripdesk()
        .args(["country", "Atlantis", "--country-url", &server.url()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(r#""kind": "client_error""#));
    mock.assert();
}

#[test]
fn test_unknown_currency_is_malformed() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/USD")
        .with_status(200)
        .with_body(r#"{"result": "success", "rates": {"EUR": 0.92}}"#)
        .create();

    tripdesk()
        .args(["rate", "USD", "FAKE", "--currency-url", &server.url()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not_found_or_malformed"))
        .stderr(predicate::str::contains("FAKE"));
}

#[test]
fn test_flight_search_sends_defaults() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/flights")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("origin".into(), "BEG".into()),
            Matcher::UrlEncoded("destination".into(), "BER".into()),
            Matcher::UrlEncoded("date".into(), "2024-03-01".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"flights": [{"id": "FL001", "airline": "Air Serbia", "airline_code": "JU",
                "price": 250.0, "currency": "EUR", "departure": "2024-03-01T08:00:00",
                "arrival": "2024-03-01T10:30:00", "duration_minutes": 150}]}"#,
        )
        .create();

    tripdesk()
        .args(["flights", "--flights-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Air Serbia"));
    mock.assert();
}

#[test]
fn test_no_retry_sends_single_request() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/Paris")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(1)
        .create();

    tripdesk()
        .args(["weather", "Paris", "--no-retry", "--weather-url", &server.url()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(r#""kind": "server_error""#));
    mock.assert();
}

#[test]
fn test_config_file_sets_endpoint_and_retry() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/coins/bitcoin")
        .with_status(503)
        .expect(3)
        .create();

    let dir = tempdir().unwrap();
    let config = dir.path().join("tripdesk.json");
    fs::write(
        &config,
        format!(
            r#"{{"retry": {{"max_attempts": 3, "initial_backoff_ms": 10}},
                "endpoints": {{"crypto": "{}"}}}}"#,
            server.url()
        ),
    )
    .unwrap();

    tripdesk()
        .args(["crypto", "bitcoin"])
        .env("TRIPDESK_CONFIG", &config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("retries_exhausted"))
        .stderr(predicate::str::contains("3 attempt"));
    mock.assert();
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempdir().unwrap();
    tripdesk()
        .args(["country", "France", "--config"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
