//! REST client for the task API.
//!
//! Every call goes through [`ApiClient::execute`], which runs the request
//! through the [`RequestAuthorizer`], sends it over the [`Transport`], and
//! maps the outcome onto [`crate::Error`]:
//!
//! - no response at all -> `NetworkUnavailable`
//! - 401 -> `Unauthorized`
//! - any other non-2xx -> `Http { status, message }`
//! - 2xx with an undecodable body -> `MalformedResponse`
//!
//! Endpoint wrappers live in [`users`], [`tasks`], and [`categories`].

pub mod categories;
pub mod listing;
pub mod tasks;
pub mod transport;
pub mod users;

pub use listing::{Listing, Page, PageRequest};
pub use transport::{
    ApiRequest, ApiResponse, DEFAULT_TIMEOUT, Method, Transport, TransportError, UreqTransport,
};

use crate::auth::RequestAuthorizer;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Default API base URL (the backend's development address).
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Client for the task API.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        authorizer: RequestAuthorizer,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            authorizer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorizer(&self) -> &RequestAuthorizer {
        &self.authorizer
    }

    /// Authorize, send, and check the status of a request.
    pub fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let authorized = self.authorizer.authorize(request);
        let url = format!("{}{}", self.base_url, authorized.path);
        tracing::debug!(
            method = %authorized.method,
            url = %url,
            authorized = matches!(authorized, Cow::Owned(_)),
            "sending request"
        );

        let response = self.transport.send(&url, &authorized).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "request did not reach the server");
            Error::NetworkUnavailable(e.0)
        })?;
        tracing::debug!(status = response.status, "response received");

        check_status(response)
    }

    /// Execute and decode a JSON body.
    pub(crate) fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(&request)?.json()
    }

    /// Build a request carrying a serialized JSON body.
    pub(crate) fn json_request<B: Serialize>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiRequest> {
        Ok(ApiRequest::new(method, path).with_json_body(serde_json::to_value(body)?))
    }
}

/// Map a response that reached us onto success or a typed error.
fn check_status(response: ApiResponse) -> Result<ApiResponse> {
    match response.status {
        200..=299 => Ok(response),
        401 => Err(Error::Unauthorized),
        status => Err(Error::Http {
            status,
            message: error_message(&response.body)
                .unwrap_or_else(|| default_message(status, &response.body)),
        }),
    }
}

/// Pull a human message out of an error body.
///
/// The server uses `{"mensaje": ...}` for handled errors and `{"error": ...}`
/// for ad hoc ones; frameworks in between use `message`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["mensaje", "error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn default_message(status: u16, body: &str) -> String {
    let body = transport::snippet(body);
    if body.is_empty() {
        match status {
            403 => "forbidden".to_string(),
            404 => "not found".to_string(),
            500..=599 => "server error".to_string(),
            _ => "request failed".to_string(),
        }
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestStack;

    #[test]
    fn test_network_failure_is_network_unavailable() {
        let stack = TestStack::new();
        stack.transport.fail("connection refused");

        let err = stack.client().execute(&ApiRequest::get("/tareas")).unwrap_err();
        assert!(matches!(err, Error::NetworkUnavailable(ref m) if m == "connection refused"));
    }

    #[test]
    fn test_401_is_unauthorized() {
        let stack = TestStack::new();
        stack.transport.respond(401, "");

        let err = stack.client().execute(&ApiRequest::get("/tareas")).unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[test]
    fn test_error_body_message_is_extracted() {
        let stack = TestStack::new();
        stack
            .transport
            .respond(404, r#"{"codigo":"NOT_FOUND","mensaje":"Tarea no encontrada"}"#)
            .respond(400, r#"{"error": "Credenciales inválidas"}"#)
            .respond(500, "");

        let client = stack.client();
        let err = client.execute(&ApiRequest::get("/tareas/9")).unwrap_err();
        assert!(matches!(err, Error::Http { status: 404, ref message } if message == "Tarea no encontrada"));

        let err = client.execute(&ApiRequest::get("/x")).unwrap_err();
        assert!(matches!(err, Error::Http { status: 400, ref message } if message == "Credenciales inválidas"));

        let err = client.execute(&ApiRequest::get("/x")).unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, ref message } if message == "server error"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let stack = TestStack::new();
        let client = ApiClient::new(
            "http://example.test/api/",
            Box::new(stack.transport.clone()),
            RequestAuthorizer::new(stack.store.clone()),
        );
        assert_eq!(client.base_url(), "http://example.test/api");
    }
}
