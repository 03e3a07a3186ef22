use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tagdo_core::{AppError, Config};
use tagdo_services::{Label, LabelId, TodoApiClient, TodoId};
use tagdo_ui::{render, Outcome, TodoController};

#[derive(Parser, Debug)]
#[command(name = "tagdo")]
#[command(about = "Todo list with labels, synced against a todo server")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Server base URL, overriding config and environment
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show labels and todos, optionally filtered by one label
    List {
        #[arg(long, value_name = "NAME")]
        label: Option<String>,
    },
    /// Fetch a single todo from the server
    Show { id: TodoId },
    /// Create a todo
    Add {
        text: String,
        /// Attach a label (repeatable)
        #[arg(long = "label", value_name = "NAME")]
        labels: Vec<String>,
    },
    /// Flip a todo between open and completed
    Done { id: TodoId },
    /// Edit a todo's text or labels
    Edit {
        id: TodoId,
        #[arg(long)]
        text: Option<String>,
        /// Add or remove a label (repeatable)
        #[arg(long = "toggle-label", value_name = "NAME")]
        toggle_labels: Vec<String>,
    },
    /// Delete a todo
    Rm { id: TodoId },
    /// List labels
    Labels,
    /// Create a label
    LabelAdd { name: String },
    /// Delete a label by name or id
    LabelRm { label: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.inspect_err(report)?;
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.filter.clone()
    };
    tagdo_core::init(&filter)?;

    if let Some(url) = cli.api_url {
        config.services.api_url = url;
    }
    let (config, _) = config.into_validated().inspect_err(report)?;

    let timeout = config.services.request_timeout_secs.map(Duration::from_secs);
    let client = TodoApiClient::new(&config.services.api_url, timeout)?;
    tracing::info!("Using todo server at {}", client.base_url());

    let mut controller = TodoController::new(Arc::new(client));
    if controller.mount().await == Outcome::Failed {
        print!("{}", render(&controller.view()));
        return Ok(ExitCode::FAILURE);
    }

    match cli.command.unwrap_or(Command::List { label: None }) {
        Command::List { label } => {
            if let Some(name) = label {
                let label = label_named(&controller, &name)?;
                controller.click_label(&label);
            }
        }
        Command::Show { id } => {
            let todo = controller.fetch_todo(id).await?;
            let mark = if todo.completed { "x" } else { " " };
            println!("[{}] {} (#{})", mark, todo.text, todo.id);
            for label in &todo.labels {
                println!("  {}", label.name);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add { text, labels } => {
            controller.draft_mut().set_text(text);
            for name in &labels {
                let label = label_named(&controller, name)?;
                controller.draft_mut().toggle_label(&label);
            }
            if controller.submit_draft().await == Outcome::Skipped {
                bail!("Todo text must not be empty");
            }
        }
        Command::Done { id } => {
            if controller.toggle_completed(id).await == Outcome::Skipped {
                bail!("No todo with id {}", id);
            }
        }
        Command::Edit {
            id,
            text,
            toggle_labels,
        } => {
            let mut toggles = Vec::with_capacity(toggle_labels.len());
            for name in &toggle_labels {
                toggles.push(label_named(&controller, name)?);
            }
            if !controller.begin_edit(id) {
                bail!("No todo with id {}", id);
            }
            if text.is_none() && toggles.is_empty() {
                controller.cancel_edit();
                bail!("Nothing to change; pass --text or --toggle-label");
            }
            if let Some(session) = controller.edit_mut() {
                if let Some(text) = text {
                    session.set_text(text);
                }
                for label in &toggles {
                    session.toggle_label(label);
                }
            }
            controller.commit_edit().await;
        }
        Command::Rm { id } => {
            controller.delete_todo(id).await;
        }
        Command::Labels => {}
        Command::LabelAdd { name } => {
            if name.trim().is_empty() {
                bail!("Label name must not be empty");
            }
            if controller.add_label(&name).await == Outcome::Skipped {
                println!("Label {:?} already exists", name.trim());
            }
        }
        Command::LabelRm { label } => {
            let id = label_id(&controller, &label)?;
            controller.delete_label(id).await;
        }
    }

    print!("{}", render(&controller.view()));
    if controller.last_failure().is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the user-facing message for errors the app knows how to describe.
fn report(err: &anyhow::Error) {
    if let Some(app) = err.downcast_ref::<AppError>() {
        eprintln!("{}", app.user_message());
    }
}

fn label_named(controller: &TodoController, name: &str) -> Result<Label> {
    match controller.find_label(name.trim()) {
        Some(label) => Ok(label),
        None => bail!("No label named {:?}", name),
    }
}

fn label_id(controller: &TodoController, name_or_id: &str) -> Result<LabelId> {
    if let Some(label) = controller.find_label(name_or_id.trim()) {
        return Ok(label.id);
    }
    match name_or_id.trim().parse::<LabelId>() {
        Ok(id) => Ok(id),
        Err(_) => bail!("No label named {:?}", name_or_id),
    }
}
