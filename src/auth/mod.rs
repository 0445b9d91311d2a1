//! Authentication: the gateway that owns login/logout, the authorizer that
//! labels outbound requests, and the navigation seam.

pub mod authorizer;
pub mod gateway;

pub use authorizer::RequestAuthorizer;
pub use gateway::AuthGateway;

use serde::Serialize;
use std::sync::Mutex;

/// Screens the client can be sent to after an auth transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Login,
    Register,
    Dashboard,
    Tasks,
}

impl View {
    /// The command that shows this view.
    pub fn command(&self) -> &'static str {
        match self {
            View::Login => "tareas login <username>",
            View::Register => "tareas register <username>",
            View::Dashboard => "tareas dashboard",
            View::Tasks => "tareas task list",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Register => "register",
            View::Dashboard => "dashboard",
            View::Tasks => "tasks",
        };
        write!(f, "{}", name)
    }
}

/// Where the gateway sends the user after login or logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
}

/// Navigator that only remembers what it was asked to show.
///
/// A one-shot CLI has nothing to switch to; commands read [`last`](Self::last)
/// to suggest the next command instead.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<View>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<View> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<View> {
        self.history().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, view: View) {
        tracing::debug!(view = %view, "navigate");
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(view);
    }
}
