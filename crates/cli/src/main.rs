//! Mission CLI - Workspace shell for the content creation suite
//!
//! Provides a terminal front end for the studio backend: workspace
//! navigation across the six creative modes, model selection and
//! resolution, the tool palette, dashboard widgets, and generation jobs.

mod auth;
mod commands;
mod config;
mod dashboard;
mod output;
mod repl;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_client::StudioClient;

/// Mission Control CLI
#[derive(Parser)]
#[command(name = "mission")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive workspace shell for the content creation suite")]
#[command(long_about = r#"
Mission CLI is the terminal front end for the content creation studio.

Features:
  - Workspace navigation across six creative modes, each with its own pipeline
  - Per-stage and per-tool model selection with a global fallback
  - A tool palette filtered to the current mode and stage
  - Live dashboard: system metrics, costs, active workflows
  - Comic, podcast and video generation jobs with progress polling

Examples:
  mission                      # Start the interactive shell
  mission status               # Show backend and system status
  mission models               # List the model registry
  mission tools -m podcast     # List tools for podcast mode
"#)]
struct Cli {
    /// Studio backend URL
    #[arg(long, env = "MISSION_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend status and system metrics
    Status,

    /// List the model registry with key status
    Models,

    /// Show the current cost breakdown
    Costs,

    /// List workflows
    Workflows,

    /// Execute a workflow
    Run {
        /// Workflow id
        workflow_id: String,
    },

    /// List tools for a workspace position
    Tools {
        /// Workspace mode
        #[arg(short, long, default_value = "storytelling")]
        mode: String,

        /// Pipeline stage (defaults to the mode's first stage)
        #[arg(short, long)]
        stage: Option<String>,

        /// Search query
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category filter
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mission_cli={},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = config::Config::load()?;
    let server_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.server.url.clone());

    let client = StudioClient::new(&server_url);

    match cli.command {
        Some(Commands::Status) => {
            commands::status(&client).await?;
        }
        Some(Commands::Models) => {
            commands::models(&client).await?;
        }
        Some(Commands::Costs) => {
            commands::costs(&client).await?;
        }
        Some(Commands::Workflows) => {
            commands::workflows(&client).await?;
        }
        Some(Commands::Run { workflow_id }) => {
            commands::run_workflow(&client, &workflow_id).await?;
        }
        Some(Commands::Tools {
            mode,
            stage,
            query,
            category,
        }) => {
            commands::tools(&mode, stage.as_deref(), &query, &category)?;
        }
        Some(Commands::Config { show, set }) => {
            if show {
                commands::show_config(&config)?;
            } else if let Some(kv) = set {
                commands::set_config(&kv)?;
            } else {
                commands::show_config(&config)?;
            }
        }
        None => {
            // The access gate guards the interactive shell only.
            let output = output::OutputHandler::new(false);
            if !auth::unlock(&mut config, &output)? {
                return Ok(());
            }

            let session = session::WorkspaceSession::new(client);
            let mut repl = repl::MissionRepl::new(session, config)?;
            repl.run().await?;
        }
    }

    Ok(())
}
