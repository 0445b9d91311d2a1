//! `/usuarios` endpoints.

use super::{ApiClient, Method};
use crate::Result;
use crate::models::{LoginRequest, LoginResponse, NewUser, UserRecord};

impl ApiClient {
    /// `POST /usuarios/login`. Does not touch session state.
    pub fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let request = Self::json_request(Method::Post, "/usuarios/login", credentials)?;
        self.fetch(request)
    }

    /// `POST /usuarios/registro`.
    pub fn register(&self, new_user: &NewUser) -> Result<UserRecord> {
        let request = Self::json_request(Method::Post, "/usuarios/registro", new_user)?;
        self.fetch(request)
    }
}
