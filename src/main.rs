//! bizprofile CLI entry point.
//!
//! One subcommand per operation: record answers, build the report, chat with
//! persona consultants and manage goals. `shell` runs an interactive chat
//! loop with file logging; everything else is one-shot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use bizprofile::answers::AnswerValue;
use bizprofile::app::App;
use bizprofile::config::{load_effective_config, Config};
use bizprofile::credentials::load_optional_credentials;
use bizprofile::logging;
use bizprofile::report::{generate_business_report, get_report};
use bizprofile::store::ChatMessage;

/// bizprofile: business profile questionnaire and persona consultants.
#[derive(Parser)]
#[command(name = "bizprofile", version, about)]
struct Cli {
    /// Config file (default: `$BIZPROFILE_CONFIG_PATH` or `~/.bizprofile/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Print the current session id, creating one if needed.
    Session,
    /// Record an answer (`value` is JSON; bare text is taken as a string).
    Answer {
        /// Questionnaire section id.
        section: String,
        /// Question id (e.g. `has_debt`).
        question: String,
        /// Answer value.
        value: String,
    },
    /// List recorded answers.
    Answers,
    /// Print the business report as JSON.
    Report {
        /// Rebuild from the current answers instead of using the stored report.
        #[arg(long)]
        refresh: bool,
    },
    /// Ask a persona one question and store the exchange.
    Chat {
        /// Persona (`sales`, `finance`, `hr`, `strategy`, `business`, ...).
        profile: String,
        /// Question text.
        message: String,
    },
    /// Show a persona's conversation.
    History {
        /// Persona.
        profile: String,
    },
    /// Manage business goals.
    Goals {
        /// Goal operation.
        #[command(subcommand)]
        action: GoalsCommand,
    },
    /// Interactive chat with a persona on stdin.
    Shell {
        /// Persona.
        profile: String,
    },
}

/// Goal subcommands.
#[derive(Subcommand)]
enum GoalsCommand {
    /// List goals in creation order.
    List,
    /// Add a goal.
    Add {
        /// Goal text.
        text: String,
    },
    /// Flip a goal between done and not done.
    Toggle {
        /// Goal id.
        id: String,
    },
    /// Delete a goal.
    Remove {
        /// Goal id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Shell { profile } = &cli.command {
        let config = load_effective_config(cli.config.as_deref())?;
        let _logging_guard = logging::init_session(&config.paths.logs_dir)?;
        return handle_shell(&config, profile).await;
    }

    logging::init_cli();
    let config = load_effective_config(cli.config.as_deref())?;
    let app = open_app(&config).await?;
    let store = &app.store;

    match cli.command {
        Command::Session => {
            println!("{}", store.session_id().await);
        }
        Command::Answer {
            section,
            question,
            value,
        } => {
            let json = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            let answer = AnswerValue::from_json(&question, json)?;
            let session_id = store.session_id().await;
            store
                .save_answer(&session_id, &section, &question, &answer)
                .await;
        }
        Command::Answers => {
            let session_id = store.session_id().await;
            for (question, value) in store.load_answers(&session_id).await.iter() {
                println!("{question}: {}", value.to_json());
            }
        }
        Command::Report { refresh } => {
            let session_id = store.session_id().await;
            let report = if refresh {
                generate_business_report(store, &session_id).await
            } else {
                get_report(store, &session_id).await
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Chat { profile, message } => {
            let reply = app.dispatcher.converse(&profile, &message).await?;
            println!("{}", reply.content);
        }
        Command::History { profile } => {
            for message in app.dispatcher.history(&profile).await {
                print_message(&message);
            }
        }
        Command::Goals { action } => handle_goals(&app, action).await,
        Command::Shell { .. } => {}
    }

    store.cache().close().await;
    Ok(())
}

/// Load credentials and open the app for `config`.
async fn open_app(config: &Config) -> anyhow::Result<App> {
    let credentials = load_optional_credentials(&config.paths.env_file).with_context(|| {
        format!(
            "failed to load credentials from {}",
            config.paths.env_file.display()
        )
    })?;
    App::open(config, &credentials).await
}

/// Run a goal subcommand.
async fn handle_goals(app: &App, action: GoalsCommand) {
    let store = &app.store;
    let session_id = store.session_id().await;
    match action {
        GoalsCommand::List => {
            for goal in store.fetch_goals(&session_id).await {
                let mark = if goal.completed { "x" } else { " " };
                println!("[{mark}] {}  {}", goal.id, goal.text);
            }
        }
        GoalsCommand::Add { text } => {
            let goal = store.add_goal(&session_id, &text).await;
            println!("{}", goal.id);
        }
        GoalsCommand::Toggle { id } => match store.toggle_goal(&session_id, &id).await {
            Some(goal) => println!(
                "{} is now {}",
                goal.id,
                if goal.completed { "done" } else { "open" }
            ),
            None => eprintln!("no goal with id {id}"),
        },
        GoalsCommand::Remove { id } => {
            store.remove_goal(&session_id, &id).await;
        }
    }
}

/// Interactive chat loop: one line in, one reply out, until EOF or `exit`.
async fn handle_shell(config: &Config, profile: &str) -> anyhow::Result<()> {
    let app = open_app(config).await?;
    info!(profile, "chat shell started");

    for message in app.dispatcher.history(profile).await {
        print_message(&message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        match app.dispatcher.converse(profile, line).await {
            Ok(reply) => println!("{}\n", reply.content),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    info!(profile, "chat shell finished");
    app.store.cache().close().await;
    Ok(())
}

fn print_message(message: &ChatMessage) {
    println!("[{}] {}\n", message.role.as_str(), message.content);
}
