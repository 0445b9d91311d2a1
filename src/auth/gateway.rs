//! Login, logout, and registration.
//!
//! The gateway is the only writer of session state. A successful login is
//! committed in a fixed order: the durable store first, then the in-memory
//! publisher, then navigation. Logout runs the same steps with "absent".

use super::{Navigator, View};
use crate::api::ApiClient;
use crate::models::{Identity, LoginRequest, LoginResponse, NewUser, UserRecord};
use crate::session::{SessionPublisher, SessionStore};
use crate::{Error, Result};
use std::sync::Arc;

pub struct AuthGateway {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    publisher: Arc<SessionPublisher>,
    navigator: Arc<dyn Navigator>,
}

impl AuthGateway {
    pub fn new(
        client: Arc<ApiClient>,
        store: Arc<SessionStore>,
        publisher: Arc<SessionPublisher>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            store,
            publisher,
            navigator,
        }
    }

    /// Send credentials to the server. Session state is not touched.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.client.login(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Accept a login response as the new session.
    ///
    /// The response must carry a non-empty token and a user with an id;
    /// otherwise nothing is written and `IncompleteCredentials` is returned.
    pub fn commit_login(&self, response: &LoginResponse) -> Result<Identity> {
        let token = response
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::IncompleteCredentials("response has no token".to_string()))?;
        let user = response.user.as_ref().ok_or_else(|| {
            Error::IncompleteCredentials("response has no user record".to_string())
        })?;
        let identity = Identity::try_from(user)?;

        self.store.save(token, &identity)?;
        self.publisher.publish(Some(identity.clone()));
        tracing::info!(user_id = identity.id, username = %identity.username, "logged in");
        self.navigator.navigate(View::Dashboard);
        Ok(identity)
    }

    /// [`login`](Self::login) followed by [`commit_login`](Self::commit_login).
    pub fn login_and_commit(&self, username: &str, password: &str) -> Result<Identity> {
        let response = self.login(username, password)?;
        self.commit_login(&response)
    }

    /// Create an account. Does not log in.
    pub fn register(&self, new_user: &NewUser) -> Result<UserRecord> {
        self.client.register(new_user)
    }

    /// End the session.
    ///
    /// Clearing storage is best effort: a failure is logged and the publisher
    /// and navigator are still updated. Returns whether a session existed.
    pub fn logout(&self) -> bool {
        let had_session = self.store.is_authenticated() || self.publisher.current().is_some();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, location = %self.store.location(), "could not clear session storage");
        }
        self.publisher.publish(None);
        self.navigator.navigate(View::Login);
        if had_session {
            tracing::info!("logged out");
        }
        had_session
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Id of the stored identity.
    pub fn current_identity_id(&self) -> Option<i64> {
        self.store.read_identity().map(|identity| identity.id)
    }

    /// The identity as last published.
    pub fn current_identity(&self) -> Option<Identity> {
        self.publisher.current()
    }

    /// The logged-in identity, or `NotLoggedIn`.
    pub fn require_identity(&self) -> Result<Identity> {
        self.store
            .session()
            .map(|session| session.identity)
            .ok_or(Error::NotLoggedIn)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn publisher(&self) -> &SessionPublisher {
        &self.publisher
    }
}
