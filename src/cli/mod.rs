//! CLI argument definitions for Tareas.

use clap::{Parser, Subcommand};

/// Tareas - a terminal client for the gestion-tareas task API.
///
/// Start with `tareas login <username>`, then `tareas dashboard`.
#[derive(Parser, Debug)]
#[command(name = "tareas")]
#[command(author, version, about = "A terminal client for the gestion-tareas task API", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Base URL of the task API (e.g. http://localhost:8080/api).
    /// Can also be set via TAREAS_API_URL or `tareas config set api-url`.
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Log debug output to stderr (TAREAS_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Username
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long, env = "TAREAS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account (does not log in)
    Register {
        /// Username (at least 3 characters)
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,

        /// Password confirmation (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// End the session (safe to run when logged out)
    Logout,

    /// Show the current session
    Whoami,

    /// Task statistics for the logged-in user
    Dashboard,

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks, one page at a time
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Tasks per page, 1-100 (defaults to config page-size)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=crate::config::MAX_PAGE_SIZE as i64))]
        size: Option<u32>,

        /// Sort property sent to the server
        #[arg(long, default_value = "id")]
        sort: String,

        /// Filter by status
        #[arg(long, value_parser = ["all", "pending", "completed"])]
        status: Option<String>,

        /// Filter by category id
        #[arg(long)]
        category: Option<i64>,

        /// Filter by priority
        #[arg(long, value_parser = ["low", "medium", "high"])]
        priority: Option<String>,

        /// Case-insensitive text search over title and description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one task
    Show {
        /// Task id
        id: i64,
    },

    /// Create a task
    Create {
        /// Task title (at least 3 characters)
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority
        #[arg(short, long, value_parser = ["low", "medium", "high"])]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<i64>,
    },

    /// Update a task
    Update {
        /// Task id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority
        #[arg(short, long, value_parser = ["low", "medium", "high"])]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD, or "none" to clear)
        #[arg(long)]
        due: Option<String>,

        /// New category id
        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<i64>,

        /// Detach the task from its category
        #[arg(long)]
        no_category: bool,
    },

    /// Mark a task completed
    Complete {
        /// Task id
        id: i64,
    },

    /// Mark a completed task pending again
    Reopen {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List,

    /// Create a category
    Create {
        /// Category name
        name: String,

        /// Color: a palette name (red, blue, ...) or #rrggbb
        #[arg(long, default_value = "blue")]
        color: String,

        /// Category description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category id
        id: i64,
    },

    /// Search categories by name
    Search {
        /// Name fragment
        name: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,

    /// Set a configuration value (api-url, page-size, output-format)
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // This will panic if the CLI is misconfigured
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tareas", "task", "list", "-H", "--api-url", "http://x/api"])
            .unwrap();
        assert!(cli.human_readable);
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));
        assert!(matches!(
            cli.command,
            Commands::Task {
                command: TaskCommands::List { page: 1, .. }
            }
        ));
    }

    #[test]
    fn test_category_flags_conflict() {
        assert!(
            Cli::try_parse_from(["tareas", "task", "update", "3", "-c", "2", "--no-category"])
                .is_err()
        );
    }

    #[test]
    fn test_priority_values_are_checked() {
        assert!(Cli::try_parse_from(["tareas", "task", "create", "Buy milk", "-p", "urgent"]).is_err());
    }

    #[test]
    fn test_page_size_is_bounded() {
        for size in ["0", "101"] {
            assert!(Cli::try_parse_from(["tareas", "task", "list", "--size", size]).is_err());
        }
        let cli = Cli::try_parse_from(["tareas", "task", "list", "--size", "100"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Task {
                command: TaskCommands::List {
                    size: Some(100),
                    ..
                }
            }
        ));
    }
}
