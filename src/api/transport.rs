//! Request/response values and the transport seam.
//!
//! Requests are plain values so the authorizer can copy-on-write them and
//! tests can inspect exactly what would have gone over the wire.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("tareas-cli/", env!("CARGO_PKG_VERSION"));

/// Default timeout for a whole request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outbound request, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// A response that reached the client, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            crate::Error::MalformedResponse(format!("{} (body: {})", e, snippet(&self.body)))
        })
    }
}

/// Shorten a body for error messages.
pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

/// The request never produced a response (DNS, refused connection, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Trait for anything that can carry a request to the server.
pub trait Transport: Send + Sync {
    /// Send `request` to the absolute `url`.
    ///
    /// Non-2xx responses are `Ok`; only failures to get any response are `Err`.
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Blocking HTTP transport.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut call = self
            .agent
            .request(request.method.as_str(), url)
            .set("Accept", "application/json");
        for (key, value) in &request.query {
            call = call.query(key, value);
        }
        for (key, value) in &request.headers {
            call = call.set(key, value);
        }

        let result = match &request.body {
            Some(body) => call.send_json(body),
            None => call.call(),
        };

        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;
                Ok(ApiResponse { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Ok(ApiResponse { status, body })
            }
            Err(ureq::Error::Transport(e)) => Err(TransportError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut req = ApiRequest::get("/tareas");
        req.set_header("authorization", "Bearer old");
        req.set_header("Authorization", "Bearer new");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer new"));
    }

    #[test]
    fn test_with_query_keeps_order() {
        let req = ApiRequest::get("/tareas")
            .with_query("page", 0)
            .with_query("size", 10);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_response_json_error_is_malformed_response() {
        let resp = ApiResponse {
            status: 200,
            body: "<html>".to_string(),
        };
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, crate::Error::MalformedResponse(_)));
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = snippet(&long);
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(snippet("  ok  "), "ok");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let transport = UreqTransport::new(Duration::from_secs(2));
        let result = transport.send("http://127.0.0.1:9/api/tareas", &ApiRequest::get("/tareas"));
        assert!(result.is_err());
    }
}
