//! Common test utilities for tareas integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/tareas/` or `~/.config/tareas/`, and `StubServer`,
//! a minimal HTTP server standing in for the task API.

#![allow(dead_code)]

use assert_cmd::Command;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
pub use tempfile::TempDir;

/// A test environment with isolated data and config directories.
///
/// The `tareas()` method returns a `Command` that sets `TAREAS_DATA_DIR` and
/// `TAREAS_CONFIG_DIR` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the tareas binary with isolated directories.
    pub fn tareas(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tareas"));
        cmd.env("TAREAS_DATA_DIR", self.data_dir.path());
        cmd.env("TAREAS_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("TAREAS_API_URL");
        cmd.env_remove("TAREAS_PASSWORD");
        cmd.env_remove("TAREAS_LOG");
        cmd
    }

    /// Same, pointed at a stub server.
    pub fn tareas_at(&self, server: &StubServer) -> Command {
        let mut cmd = self.tareas();
        cmd.env("TAREAS_API_URL", server.base_url());
        cmd
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }

    pub fn session_file(&self) -> std::path::PathBuf {
        self.data_dir.path().join("session.kdl")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path including the query string
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

type Routes = Arc<Mutex<HashMap<(String, String), (u16, String)>>>;

/// Answers canned JSON by method and path (query ignored); anything else is 404.
pub struct StubServer {
    port: u16,
    routes: Routes,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let routes: Routes = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let (r, q) = (routes.clone(), requests.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &r, &q);
            }
        });

        Self {
            port,
            routes,
            requests,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    /// Register a response for `method` on `/api{path}`.
    pub fn route(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().unwrap().insert(
            (method.to_string(), format!("/api{}", path)),
            (status, body.to_string()),
        );
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().last().cloned().unwrap()
    }
}

fn handle(stream: TcpStream, routes: &Routes, requests: &Arc<Mutex<Vec<Recorded>>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    let _ = reader.read_exact(&mut body);

    let recorded = Recorded {
        method: method.clone(),
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let key = (method, recorded.path().to_string());
    requests.lock().unwrap().push(recorded);

    let (status, body) = routes
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((404, r#"{"mensaje":"not found"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Login body for bob (id 5).
pub const BOB_LOGIN: &str =
    r#"{"token":"t1","usuario":{"id":5,"username":"bob","email":"bob@example.com"},"message":"Login exitoso"}"#;

/// Log in as bob against `server`.
pub fn login_bob(env: &TestEnv, server: &StubServer) {
    server.route("POST", "/usuarios/login", 200, BOB_LOGIN);
    env.tareas_at(server)
        .args(["login", "bob", "-p", "secret"])
        .assert()
        .success();
}
