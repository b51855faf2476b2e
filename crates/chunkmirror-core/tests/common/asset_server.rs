//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a static route table (path → body). Unknown paths get 404.
//! A route can be made flaky: its first N requests answer 503. Every request
//! path is counted so tests can assert how often a URL was hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub body: Vec<u8>,
    /// Number of initial requests answered with 503.
    pub fail_first: usize,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            fail_first: 0,
        }
    }

    pub fn flaky(body: impl Into<Vec<u8>>, fail_first: usize) -> Self {
        Self {
            body: body.into(),
            fail_first,
        }
    }
}

pub struct AssetServer {
    /// e.g. "http://127.0.0.1:12345"
    pub origin: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl AssetServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> AssetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    AssetServer {
        origin: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    // Keep-alive: serve requests on this connection until the client closes it.
    loop {
        let mut buf = [0u8; 8192];
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let request = match std::str::from_utf8(&buf[..n]) {
            Ok(s) => s,
            Err(_) => return,
        };
        let mut parts = request.lines().next().unwrap_or("").split_whitespace();
        let method = parts.next().unwrap_or("");
        let path = parts.next().unwrap_or("").to_string();

        let seen = {
            let mut hits = hits.lock().unwrap();
            let count = hits.entry(path.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let (status, body): (&str, &[u8]) = match routes.get(&path) {
            _ if !method.eq_ignore_ascii_case("GET") => ("405 Method Not Allowed", &b""[..]),
            Some(route) if seen <= route.fail_first => ("503 Service Unavailable", &b"busy"[..]),
            Some(route) => ("200 OK", route.body.as_slice()),
            None => ("404 Not Found", &b"not found"[..]),
        };
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: keep-alive\r\n\r\n",
            status,
            body.len()
        );
        if stream.write_all(head.as_bytes()).is_err() || stream.write_all(body).is_err() {
            return;
        }
    }
}
