//! Session commands: login, register, logout, whoami.

use super::{Context, Output, json};
use crate::Result;
use crate::auth::View;
use crate::models::{Identity, UserRecord};
use crate::session::decode_claims;
use crate::views::forms::{RegistrationForm, validate_login};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub user: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub next: View,
}

impl Output for LoginResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("Logged in as {} (id {})", self.user.username, self.user.id);
        if let Some(ref message) = self.message {
            out.push_str(&format!("\n{}", message));
        }
        out.push_str(&format!("\nNext: {}", self.next.command()));
        out
    }
}

/// Log in and commit the session.
pub fn login(ctx: &Context, username: &str, password: &str) -> Result<LoginResult> {
    validate_login(username, password)?;
    let gateway = ctx.gateway();
    let response = gateway.login(username.trim(), password)?;
    let user = gateway.commit_login(&response)?;
    Ok(LoginResult {
        user,
        message: response.message,
        next: ctx.navigator.last().unwrap_or(View::Dashboard),
    })
}

#[derive(Debug, Serialize)]
pub struct RegisterResult {
    pub user: UserRecord,
    pub next: View,
}

impl Output for RegisterResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let name = self.user.username.as_deref().unwrap_or("(unknown)");
        let mut out = format!("Registered {}", name);
        if let Some(id) = self.user.id {
            out.push_str(&format!(" (id {})", id));
        }
        out.push_str(&format!("\nNext: {}", self.next.command()));
        out
    }
}

/// Validate the form and create the account.
pub fn register(ctx: &Context, form: &RegistrationForm) -> Result<RegisterResult> {
    let new_user = form.validate()?;
    let user = ctx.gateway().register(&new_user)?;
    tracing::info!(username = %new_user.username, "registered");
    Ok(RegisterResult {
        user,
        next: View::Login,
    })
}

#[derive(Debug, Serialize)]
pub struct LogoutResult {
    pub was_logged_in: bool,
    pub next: View,
}

impl Output for LogoutResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.was_logged_in {
            "Logged out".to_string()
        } else {
            "Not logged in (nothing to do)".to_string()
        }
    }
}

pub fn logout(ctx: &Context) -> LogoutResult {
    let was_logged_in = ctx.gateway().logout();
    LogoutResult {
        was_logged_in,
        next: ctx.navigator.last().unwrap_or(View::Login),
    }
}

#[derive(Debug, Serialize)]
pub struct WhoamiResult {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    pub session_file: String,
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expired: Option<bool>,
}

impl Output for WhoamiResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match self.user {
            Some(ref user) if self.logged_in => {
                lines.push(format!("Logged in as {} (id {})", user.username, user.id));
                if let Some(ref email) = user.email {
                    lines.push(format!("  Email: {}", email));
                }
            }
            _ => lines.push("Not logged in".to_string()),
        }
        if let Some(expires) = self.token_expires_at {
            let state = if self.token_expired == Some(true) {
                "expired"
            } else {
                "expires"
            };
            lines.push(format!("  Token {}: {}", state, expires.to_rfc3339()));
        }
        lines.push(format!("  API: {}", self.api_url));
        lines.push(format!("  Session: {}", self.session_file));
        lines.join("\n")
    }
}

/// Report the stored session. Never contacts the server.
pub fn whoami(ctx: &Context) -> WhoamiResult {
    let store = ctx.gateway().store();
    let session = store.session();
    let claims = session.as_ref().and_then(|s| decode_claims(&s.token));
    let now = Utc::now();
    WhoamiResult {
        logged_in: session.is_some(),
        token_expires_at: claims.as_ref().and_then(|c| c.expires_at),
        token_expired: claims
            .as_ref()
            .and_then(|c| c.expires_at.map(|_| c.is_expired(now))),
        user: session.map(|s| s.identity),
        session_file: store.location(),
        api_url: ctx.config.api_url().to_string(),
    }
}
