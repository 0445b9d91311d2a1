//! Outbound request labelling.

use crate::api::ApiRequest;
use crate::session::SessionStore;
use std::borrow::Cow;
use std::sync::Arc;

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header the server uses to scope task endpoints to a user.
pub const USER_ID_HEADER: &str = "X-Usuario-Id";

/// Attaches the stored credentials to every outbound request.
///
/// Never blocks or rejects a request: without a token it is passed through
/// untouched.
pub struct RequestAuthorizer {
    store: Arc<SessionStore>,
}

impl RequestAuthorizer {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Return the request to send.
    ///
    /// With a stored token this is a copy carrying `Authorization: Bearer` and,
    /// when the identity is also stored, `X-Usuario-Id`. Both come from a
    /// single store read. Without a token the original is borrowed.
    pub fn authorize<'a>(&self, request: &'a ApiRequest) -> Cow<'a, ApiRequest> {
        let (token, identity) = self.store.snapshot();
        let Some(token) = token else {
            return Cow::Borrowed(request);
        };

        let mut authorized = request.clone();
        authorized.set_header(AUTHORIZATION_HEADER, format!("Bearer {}", token));
        if let Some(identity) = identity {
            authorized.set_header(USER_ID_HEADER, identity.id.to_string());
        }
        tracing::trace!(path = %authorized.path, "credentials attached");
        Cow::Owned(authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::session::MemoryKeyValueStore;

    fn store() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(Arc::new(MemoryKeyValueStore::new())))
    }

    #[test]
    fn test_no_token_borrows_request() {
        let authorizer = RequestAuthorizer::new(store());
        let request = ApiRequest::get("/tareas");

        let out = authorizer.authorize(&request);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(out.header(AUTHORIZATION_HEADER).is_none());
        assert!(out.header(USER_ID_HEADER).is_none());
    }

    #[test]
    fn test_token_adds_headers_to_copy() {
        let store = store();
        store.save("t1", &Identity::new(5, "bob")).unwrap();
        let authorizer = RequestAuthorizer::new(store);
        let request = ApiRequest::get("/tareas");

        let out = authorizer.authorize(&request);
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out.header("authorization"), Some("Bearer t1"));
        assert_eq!(out.header(USER_ID_HEADER), Some("5"));
        // The original is untouched
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_existing_authorization_is_replaced() {
        let store = store();
        store.save("fresh", &Identity::new(1, "ann")).unwrap();
        let authorizer = RequestAuthorizer::new(store);
        let mut request = ApiRequest::get("/tareas");
        request.set_header("authorization", "Bearer stale");

        let out = authorizer.authorize(&request);
        assert_eq!(out.header(AUTHORIZATION_HEADER), Some("Bearer fresh"));
        assert_eq!(
            out.headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(AUTHORIZATION_HEADER))
                .count(),
            1
        );
    }

    #[test]
    fn test_after_clear_requests_pass_through() {
        let store = store();
        store.save("t1", &Identity::new(5, "bob")).unwrap();
        store.clear().unwrap();
        let authorizer = RequestAuthorizer::new(store);
        let request = ApiRequest::get("/categorias");
        assert!(matches!(authorizer.authorize(&request), Cow::Borrowed(_)));
    }
}
