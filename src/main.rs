//! Tareas CLI - a terminal client for the gestion-tareas task API.

use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process;
use tareas::cli::{CategoryCommands, Cli, Commands, ConfigCommands, TaskCommands};
use tareas::commands::{self, Context, Output, TaskChanges, TaskInput, TaskListArgs};
use tareas::config::{ConfigOverrides, OutputFormat};
use tareas::views::forms::RegistrationForm;
use tareas::views::{StatusFilter, TaskFilter};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter (e.g. `tareas=debug`).
const LOG_ENV: &str = "TAREAS_LOG";

/// Set to `json` for structured log lines.
const LOG_FORMAT_ENV: &str = "TAREAS_LOG_FORMAT";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = cli.api_url {
        overrides = overrides.with_api_url(url);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    // The config file can also ask for human output; an unreadable config is
    // reported by the command itself.
    let human = cli.human_readable
        || tareas::config::resolve_config(&overrides)
            .map(|c| c.output_format() == OutputFormat::Human)
            .unwrap_or(false);

    if let Err(e) = run_command(cli.command, &overrides, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr. `TAREAS_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "tareas=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run_command(
    command: Commands,
    overrides: &ConfigOverrides,
    human: bool,
) -> Result<(), tareas::Error> {
    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => output(&commands::config_show(overrides)?, human),
            ConfigCommands::Set { key, value } => {
                output(&commands::config_set(&key, &value)?, human)
            }
        },

        Commands::Login { username, password } => {
            let ctx = Context::open(overrides)?;
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            output(&commands::login(&ctx, &username, &password)?, human);
        }

        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let ctx = Context::open(overrides)?;
            let form = RegistrationForm {
                username,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            output(&commands::register(&ctx, &form)?, human);
        }

        Commands::Logout => {
            let ctx = Context::open(overrides)?;
            output(&commands::logout(&ctx), human);
        }

        Commands::Whoami => {
            let ctx = Context::open(overrides)?;
            output(&commands::whoami(&ctx), human);
        }

        Commands::Dashboard => {
            let ctx = Context::open(overrides)?;
            output(&commands::dashboard(&ctx)?, human);
        }

        Commands::Task { command } => {
            let ctx = Context::open(overrides)?;
            run_task_command(&ctx, command, human)?;
        }

        Commands::Category { command } => {
            let ctx = Context::open(overrides)?;
            match command {
                CategoryCommands::List => output(&commands::category_list(&ctx)?, human),
                CategoryCommands::Create {
                    name,
                    color,
                    description,
                } => output(
                    &commands::category_create(&ctx, &name, &color, description)?,
                    human,
                ),
                CategoryCommands::Delete { id } => {
                    output(&commands::category_delete(&ctx, id)?, human)
                }
                CategoryCommands::Search { name } => {
                    output(&commands::category_search(&ctx, &name)?, human)
                }
            }
        }
    }

    Ok(())
}

fn run_task_command(ctx: &Context, command: TaskCommands, human: bool) -> Result<(), tareas::Error> {
    match command {
        TaskCommands::List {
            page,
            size,
            sort,
            status,
            category,
            priority,
            search,
        } => {
            let priority = priority
                .as_deref()
                .map(commands::tasks::parse_priority)
                .transpose()?;
            let filter = TaskFilter::new()
                .status(
                    status
                        .as_deref()
                        .and_then(StatusFilter::parse)
                        .unwrap_or_default(),
                )
                .category(category)
                .priority(priority)
                .search(search.as_deref());
            let args = TaskListArgs {
                page,
                size,
                sort: Some(sort).filter(|s| !s.trim().is_empty()),
                filter,
            };
            output(&commands::task_list(ctx, &args)?, human);
        }

        TaskCommands::Show { id } => output(&commands::task_show(ctx, id)?, human),

        TaskCommands::Create {
            title,
            description,
            priority,
            due,
            category,
        } => {
            let input = TaskInput {
                title,
                description,
                priority,
                due,
                category,
            };
            output(&commands::task_create(ctx, &input)?, human);
        }

        TaskCommands::Update {
            id,
            title,
            description,
            priority,
            due,
            category,
            no_category,
        } => {
            let changes = TaskChanges {
                title,
                description,
                priority,
                due,
                category,
                no_category,
            };
            output(&commands::task_update(ctx, id, &changes)?, human);
        }

        TaskCommands::Complete { id } => output(&commands::task_complete(ctx, id)?, human),
        TaskCommands::Reopen { id } => output(&commands::task_reopen(ctx, id)?, human),
        TaskCommands::Delete { id } => output(&commands::task_delete(ctx, id)?, human),
    }
    Ok(())
}

/// Read a password from stdin, prompting when attached to a terminal.
fn read_password() -> Result<String, tareas::Error> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
