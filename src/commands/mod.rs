//! Command implementations for the Tareas CLI.
//!
//! This module contains the business logic for each CLI command.
//! Commands are organized by area:
//! - `session` - login, register, logout, whoami
//! - `tasks` - task CRUD and listing
//! - `categories` - category CRUD and search
//! - `dashboard` - per-user statistics
//! - `config` - preferences
//!
//! Every command returns a result struct implementing [`Output`]; `main`
//! decides which rendering to print.

pub mod categories;
pub mod config;
pub mod dashboard;
pub mod session;
pub mod tasks;

pub use categories::{
    CategoryCreated, CategoryDeleted, CategoryList, category_create, category_delete,
    category_list, category_search,
};
pub use config::{ConfigSet, ConfigShow, config_set, config_show};
pub use dashboard::{DashboardResult, dashboard};
pub use session::{LoginResult, LogoutResult, RegisterResult, WhoamiResult, login, logout, register, whoami};
pub use tasks::{
    TaskChanges, TaskDeleted, TaskInput, TaskListArgs, TaskListResult, TaskResult, task_complete,
    task_create, task_delete, task_list, task_reopen, task_show, task_update,
};

use crate::Result;
use crate::api::{ApiClient, DEFAULT_TIMEOUT, Transport, UreqTransport};
use crate::auth::{AuthGateway, RecordingNavigator, RequestAuthorizer};
use crate::config::{ConfigOverrides, ResolvedConfig};
use crate::session::{SessionPublisher, SessionStore};
use std::sync::Arc;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Everything a command needs: resolved config and a wired client stack.
pub struct Context {
    pub config: ResolvedConfig,
    pub navigator: Arc<RecordingNavigator>,
    gateway: AuthGateway,
}

impl Context {
    /// Resolve configuration and open the on-disk session.
    pub fn open(overrides: &ConfigOverrides) -> Result<Self> {
        let config = crate::config::resolve_config(overrides)?;
        let data_dir = crate::config::data_dir()?;
        let store = Arc::new(SessionStore::open_in(&data_dir));
        let transport = Box::new(UreqTransport::new(DEFAULT_TIMEOUT));
        Ok(Self::with_parts(config, store, transport))
    }

    /// Wire a context from explicit parts.
    pub fn with_parts(
        config: ResolvedConfig,
        store: Arc<SessionStore>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let publisher = Arc::new(SessionPublisher::seeded_from(&store));
        let navigator = Arc::new(RecordingNavigator::new());
        let client = Arc::new(ApiClient::new(
            config.api_url(),
            transport,
            RequestAuthorizer::new(store.clone()),
        ));
        let gateway = AuthGateway::new(client, store, publisher, navigator.clone());
        Self {
            config,
            navigator,
            gateway,
        }
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn client(&self) -> &ApiClient {
        self.gateway.client()
    }
}

/// Single-line JSON for a result struct.
pub(crate) fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("could not serialize output: {}", e) }).to_string()
    })
}
