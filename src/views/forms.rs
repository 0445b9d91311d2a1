//! Input validation for login, registration, and task forms.
//!
//! Every check returns `Error::InvalidInput` naming the offending field.

use crate::models::NewUser;
use crate::{Error, Result};

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed task title, at least [`MIN_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(Error::InvalidInput(format!(
            "title must be at least {} characters",
            MIN_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

/// Both login fields must be non-blank.
pub fn validate_login(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::InvalidInput("username is required".to_string()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("password is required".to_string()));
    }
    Ok(())
}

/// Registration form as entered.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Check every field and produce the request body.
    pub fn validate(&self) -> Result<NewUser> {
        let username = self.username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(Error::InvalidInput(format!(
                "username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        let email = self.email.trim();
        if !is_email(email) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(Error::InvalidInput("passwords do not match".to_string()));
        }
        Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// `local@domain` with no whitespace, a non-empty local part, and a dotted domain.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .all(|label| !label.is_empty())
        && domain.contains('.')
}
