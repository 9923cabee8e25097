//! End-to-end tests: real listener, real accept loop, raw HTTP/1.1 over TCP.

use std::net::SocketAddr;
use std::sync::Arc;

use student_registry::config::{AppState, Config};
use student_registry::server::{create_listener, start_server_loop};
use student_registry::store::{Student, StudentStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

struct TestResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl TestResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn test_config() -> Config {
    let mut cfg = Config::defaults().unwrap();
    cfg.logging.access_log = false;
    cfg
}

async fn start_server(store: Arc<StudentStore>) -> SocketAddr {
    let cfg = test_config();
    let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::with_store(&cfg, store).unwrap());
    tokio::spawn(start_server_loop(listener, state));
    addr
}

async fn send(addr: SocketAddr, method: &str, path: &str, body: &str) -> TestResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    parse_response(&String::from_utf8(raw).unwrap())
}

fn parse_response(raw: &str) -> TestResponse {
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let mut lines = head.lines();
    let status = lines
        .next()
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    TestResponse {
        status,
        headers,
        body: body.to_string(),
    }
}

#[tokio::test]
async fn test_seeded_record_not_found_by_id() {
    let addr = start_server(Arc::new(StudentStore::seeded("Data"))).await;
    let resp = send(addr, "GET", "/users/1", "").await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, "user not found");
    assert_eq!(resp.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let addr = start_server(Arc::new(StudentStore::seeded("Data"))).await;
    let body = r#"{"id":42,"name":"alice","age":30}"#;

    let resp = send(addr, "POST", "/users", body).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, body);
    assert_eq!(resp.header("content-type"), Some("application/json"));

    let resp = send(addr, "GET", "/users/42", "").await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, body);
}

#[tokio::test]
async fn test_create_with_invalid_json() {
    let addr = start_server(Arc::new(StudentStore::new())).await;
    let resp = send(addr, "POST", "/users", "not-json").await;
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body, "internal server error");
    assert_eq!(resp.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_overwrite_same_id() {
    let store = Arc::new(StudentStore::new());
    let addr = start_server(Arc::clone(&store)).await;
    send(addr, "POST", "/users", r#"{"id":7,"name":"a","age":1}"#).await;
    send(addr, "POST", "/users/", r#"{"id":7,"name":"b","age":2}"#).await;

    let resp = send(addr, "GET", "/users/7", "").await;
    assert_eq!(resp.body, r#"{"id":7,"name":"b","age":2}"#);
    assert_eq!(store.get("7").await, Some(Student::new(7, "b", 2)));
}

#[tokio::test]
async fn test_unknown_routes() {
    let addr = start_server(Arc::new(StudentStore::seeded("Data"))).await;
    for (method, path) in [
        ("DELETE", "/users/1"),
        ("GET", "/users/abc"),
        ("GET", "/Student"),
        ("POST", "/Student/1"),
    ] {
        let resp = send(addr, method, path, "").await;
        assert_eq!(resp.status, 404, "{method} {path}");
        assert_eq!(resp.body, "not found", "{method} {path}");
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_and_gets() {
    let addr = start_server(Arc::new(StudentStore::new())).await;

    let mut tasks = Vec::new();
    for id in 0..16 {
        tasks.push(tokio::spawn(async move {
            let body = format!(r#"{{"id":{id},"name":"s{id}","age":{}}}"#, id + 20);
            let resp = send(addr, "POST", "/users", &body).await;
            assert_eq!(resp.status, 200);

            let resp = send(addr, "GET", &format!("/users/{id}"), "").await;
            assert_eq!(resp.status, 200);
            assert_eq!(resp.body, body);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}
