//! Integration tests for the search client against a local canned server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use harvest_source::{ApiCredentials, SearchClient, SearchQuery, SourceError, TextSource};

struct Canned {
    status: u16,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
}

impl Canned {
    fn json(status: u16, body: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// Request line and lower-cased header block of one received request.
struct Received {
    line: String,
    head: String,
}

/// Serves one canned response per accepted connection, in order.
struct CannedServer {
    base_url: String,
    received: Receiver<Received>,
}

impl CannedServer {
    fn start(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let (tx, received) = mpsc::channel();
        thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let Some(request) = read_head(&mut stream) else {
                    return;
                };
                let _ = tx.send(request);
                write_response(&mut stream, &response);
            }
        });
        Self { base_url, received }
    }

    fn requests(&self) -> Vec<Received> {
        self.received.try_iter().collect()
    }
}

fn read_head(stream: &mut TcpStream) -> Option<Received> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let text = String::from_utf8_lossy(&buf).to_string();
    let line = text.lines().next()?.to_string();
    Some(Received {
        line,
        head: text.to_ascii_lowercase(),
    })
}

fn write_response(stream: &mut TcpStream, response: &Canned) {
    let mut out = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(response.body);
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.flush();
}

fn client(server: &CannedServer) -> SearchClient {
    SearchClient::new(ApiCredentials {
        consumer_key: "ck".to_string(),
        consumer_secret: "cs".to_string(),
        access_key: "ak".to_string(),
        access_secret: "as".to_string(),
    })
    .unwrap()
    .with_api_base(server.base_url.clone())
}

fn query() -> SearchQuery {
    SearchQuery::new("CodesClub1909", NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
}

#[test]
fn test_search_sends_signed_query_and_parses_posts() {
    let server = CannedServer::start(vec![Canned::json(
        200,
        r#"{"statuses":[{"text":"Today's codes are: WIN2024"}]}"#,
    )]);

    let units = client(&server).search(&query()).unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "Today's codes are: WIN2024");
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let line = &requests[0].line;
    assert!(line.starts_with("GET /1.1/search/tweets.json?q="), "{line}");
    assert!(line.contains("q=from%3ACodesClub1909%20%27codes%20are%27%20since%3A2024-01-05"));
    assert!(line.contains("count=100"));
    assert!(requests[0].head.contains("authorization: oauth oauth_consumer_key=\"ck\""));
    assert!(requests[0].head.contains("oauth_signature=\""));
}

#[test]
fn test_rejected_credentials_are_unauthorized() {
    let server = CannedServer::start(vec![
        Canned::json(401, r#"{"errors":[{"code":32}]}"#),
        Canned::json(403, r#"{"errors":[{"code":453}]}"#),
    ]);
    let client = client(&server);

    let first = client.search(&query()).unwrap_err();
    assert!(matches!(first, SourceError::Unauthorized { status: 401, .. }), "{first}");
    let second = client.search(&query()).unwrap_err();
    assert!(matches!(second, SourceError::Unauthorized { status: 403, .. }), "{second}");
}

#[test]
fn test_rate_limit_reads_retry_after() {
    let server = CannedServer::start(vec![
        Canned::json(429, "{}").with_header("Retry-After", "60"),
        Canned::json(429, "{}"),
    ]);
    let client = client(&server);

    let err = client.search(&query()).unwrap_err();
    assert!(matches!(err, SourceError::RateLimited { retry_after_secs: 60 }), "{err}");
    let err = client.search(&query()).unwrap_err();
    assert!(matches!(err, SourceError::RateLimited { retry_after_secs: 900 }), "{err}");
}

#[test]
fn test_server_error_and_bad_body() {
    let server = CannedServer::start(vec![
        Canned::json(500, r#"{"errors":"over capacity"}"#),
        Canned::json(200, "not json"),
    ]);
    let client = client(&server);

    let err = client.search(&query()).unwrap_err();
    assert!(matches!(err, SourceError::Api { status: 500, .. }), "{err}");
    let err = client.search(&query()).unwrap_err();
    assert!(matches!(err, SourceError::JsonParse(_)), "{err}");
}

#[test]
fn test_empty_search_is_not_an_error() {
    let server = CannedServer::start(vec![Canned::json(200, r#"{"statuses":[]}"#)]);
    assert!(client(&server).search(&query()).unwrap().is_empty());
}
