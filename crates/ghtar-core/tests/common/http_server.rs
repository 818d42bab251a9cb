//! Minimal HTTP/1.1 server with canned responses for integration tests.
//!
//! Routes are matched on the exact request target. Unknown targets get a
//! GitHub-style JSON 404. Every request head is recorded so tests can assert
//! on what the client sent.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Send only this many body bytes (while advertising the full length), then close.
    pub truncate_to: Option<usize>,
}

impl Canned {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body,
            truncate_to: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.as_bytes().to_vec(),
            truncate_to: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self::status(302, "").header("Location", location)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn truncated(mut self, n: usize) -> Self {
        self.truncate_to = Some(n);
        self
    }
}

/// Running server: base URL (with trailing `/`) and the request log.
pub struct TestServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

/// Starts a server in a background thread. `routes` receives the base URL so
/// responses can point back at the server (e.g. redirect targets). The
/// server runs until the process exits.
pub fn start<F>(routes: F) -> TestServer
where
    F: FnOnce(&str) -> Vec<(&'static str, Canned)>,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}/", port);
    let routes: Arc<Vec<(String, Canned)>> = Arc::new(
        routes(&base)
            .into_iter()
            .map(|(path, canned)| (path.to_string(), canned))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    TestServer { base, requests }
}

fn handle(mut stream: TcpStream, routes: &[(String, Canned)], log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let head = match read_head(&mut stream) {
        Some(h) => h,
        None => return,
    };
    log.lock().unwrap().push(head.clone());

    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let not_found = Canned::status(404, r#"{"message":"Not Found"}"#);
    let canned = routes
        .iter()
        .find(|(path, _)| path == target)
        .map(|(_, c)| c)
        .unwrap_or(&not_found);

    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        canned.status,
        reason(canned.status),
        canned.body.len()
    );
    for (name, value) in &canned.headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");

    let body_len = canned.truncate_to.unwrap_or(canned.body.len()).min(canned.body.len());
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&canned.body[..body_len]);
    let _ = stream.flush();
}

/// Reads up to the blank line ending the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
