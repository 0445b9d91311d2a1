//! Session state for Tareas.
//!
//! ## Layers
//!
//! - [`backend`] - raw key-value storage (`session.kdl` on disk, or memory)
//! - [`store`] - the token + identity pair, written and cleared as a unit
//! - [`publisher`] - in-memory "current user" with replay-latest observers
//! - [`token`] - read-only peek at JWT claims for display
//!
//! ## Security
//!
//! `session.kdl` holds a bearer token and is written with 0600 permissions.

pub mod backend;
pub mod publisher;
pub mod store;
pub mod token;

pub use backend::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SESSION_FILE};
pub use publisher::{SessionPublisher, SubscriptionId};
pub use store::{IDENTITY_KEY, SessionStore, TOKEN_KEY};
pub use token::{TokenClaims, decode_claims};

use crate::models::Identity;

/// A logged-in user: bearer token plus identity. Never half-populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}
