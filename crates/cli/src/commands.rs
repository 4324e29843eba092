//! CLI subcommand handlers
//!
//! Handles non-interactive commands like status, models, costs, etc.

use anyhow::Result;
use colored::Colorize;

use mission_core::{builtin_tools, filter_tools, first_stage, stages, WorkspaceMode};
use studio_client::StudioClient;

use crate::config::Config;
use crate::output::OutputHandler;

/// Show backend status and system metrics
pub async fn status(client: &StudioClient) -> Result<()> {
    let output = OutputHandler::new(false);

    output.print_header("Mission Control Status");

    match client.health().await {
        Ok(health) => {
            output.print_success(&format!(
                "Backend: {} (v{})",
                health.status,
                if health.version.is_empty() {
                    "unknown"
                } else {
                    &health.version
                }
            ));
        }
        Err(e) => {
            output.print_error(&format!("Backend: not reachable ({})", e));
        }
    }

    if let Ok(status) = client.system_status().await {
        output.print_metrics(&status.metrics);

        if !status.services.is_empty() {
            for (name, service) in &status.services {
                let state = if service.status == "running" {
                    service.status.bright_green()
                } else {
                    service.status.bright_red()
                };
                println!("    {} {} (port {})", state, name, service.port);
            }
            println!();
        }
    }

    println!("  {} {}", "Version:".dimmed(), env!("CARGO_PKG_VERSION"));
    println!(
        "  {} {}",
        "Config:".dimmed(),
        Config::config_path().display()
    );

    Ok(())
}

/// List the model registry with key status
pub async fn models(client: &StudioClient) -> Result<()> {
    let output = OutputHandler::new(false);

    output.print_header("Model Registry");

    let models = match client.model_registry().await {
        Ok(models) => models,
        Err(e) => {
            output.print_error(&format!("Could not fetch registry: {}", e));
            return Ok(());
        }
    };

    if models.is_empty() {
        output.print_info("Registry is empty.");
        return Ok(());
    }

    // Key validation is a separate call and may fail on its own.
    let key_status = client.validate_keys().await.unwrap_or_default();

    output.print_models_table(&models, |m| {
        m.is_available
            || key_status
                .get(&m.provider.to_lowercase())
                .copied()
                .unwrap_or(false)
    });

    Ok(())
}

/// Show the current cost breakdown
pub async fn costs(client: &StudioClient) -> Result<()> {
    let output = OutputHandler::new(false);

    output.print_header("Cost Summary");

    match client.current_costs().await {
        Ok(report) => output.print_costs(&report),
        Err(e) => output.print_error(&format!("Could not fetch costs: {}", e)),
    }

    Ok(())
}

/// List workflows, both known and active
pub async fn workflows(client: &StudioClient) -> Result<()> {
    let output = OutputHandler::new(false);

    output.print_header("Workflows");
    match client.list_workflows().await {
        Ok(workflows) => output.print_workflows_table(&workflows),
        Err(e) => output.print_error(&format!("Could not list workflows: {}", e)),
    }

    output.print_header("Active");
    match client.active_workflows().await {
        Ok(active) => output.print_workflows_table(&active),
        Err(e) => output.print_error(&format!("Could not list active workflows: {}", e)),
    }

    Ok(())
}

/// Execute a workflow by id
pub async fn run_workflow(client: &StudioClient, workflow_id: &str) -> Result<()> {
    let output = OutputHandler::new(false);

    match client.execute_workflow(workflow_id).await {
        Ok(result) => {
            output.print_success(&format!("Workflow started: {}", workflow_id));
            if let Some(message) = result.get("message").and_then(|m| m.as_str()) {
                output.print_info(message);
            }
        }
        Err(e) => {
            output.print_error(&format!("Failed to execute workflow: {}", e));
        }
    }

    Ok(())
}

/// List tools for a workspace position. Fully offline; the catalog is
/// built in.
pub fn tools(mode: &str, stage: Option<&str>, query: &str, category: &str) -> Result<()> {
    let output = OutputHandler::new(false);

    let mode = match WorkspaceMode::parse(mode) {
        Some(m) => m,
        None => {
            output.print_error(&format!(
                "Unknown mode: {}. Modes: {}",
                mode,
                WorkspaceMode::ALL
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            return Ok(());
        }
    };

    let stage_id = match stage {
        Some(s) => {
            if !stages(mode).iter().any(|st| st.id == s) {
                output.print_error(&format!("Unknown stage '{}' for mode {}", s, mode));
                return Ok(());
            }
            s.to_string()
        }
        None => first_stage(mode).id.to_string(),
    };

    output.print_header(&format!("Tools for {}/{}", mode, stage_id));

    let catalog = builtin_tools();
    let matches = filter_tools(&catalog, mode, &stage_id, query, category);
    output.print_tools_table(&matches);

    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let output = OutputHandler::new(false);

    output.print_header("Configuration");

    println!();
    println!("  {}", "[server]".bright_cyan());
    println!("    {} = \"{}\"", "url".dimmed(), config.server.url);

    println!();
    println!("  {}", "[auth]".bright_cyan());
    println!(
        "    {} = {}",
        "access_code".dimmed(),
        if config.auth.access_code.is_some() {
            "\"***\"".to_string()
        } else {
            "not set".dimmed().to_string()
        }
    );
    println!(
        "    {} = {}",
        "authenticated".dimmed(),
        config.auth.authenticated
    );

    println!();
    println!("  {}", "[session]".bright_cyan());
    println!(
        "    {} = \"{}\"",
        "default_mode".dimmed(),
        config.session.default_mode
    );
    println!(
        "    {} = {}",
        "auto_connect_events".dimmed(),
        config.session.auto_connect_events
    );

    println!();
    println!("  {}", "[display]".bright_cyan());
    println!("    {} = \"{}\"", "theme".dimmed(), config.display.theme);
    println!(
        "    {} = {}",
        "show_status_bar".dimmed(),
        config.display.show_status_bar
    );

    println!();
    println!(
        "  {} {}",
        "Config file:".dimmed(),
        Config::config_path().display()
    );

    Ok(())
}

/// Set a configuration value
pub fn set_config(kv: &str) -> Result<()> {
    let output = OutputHandler::new(false);

    let parts: Vec<&str> = kv.splitn(2, '=').collect();
    if parts.len() != 2 {
        output.print_error("Invalid format. Use: key=value");
        return Ok(());
    }

    let key = parts[0].trim();
    let value = parts[1].trim().trim_matches('"');

    let mut config = Config::load()?;
    match config.set(key, value) {
        Ok(()) => {
            output.print_success(&format!("Set {} = \"{}\"", key, value));
        }
        Err(e) => {
            output.print_error(&format!("Failed to set config: {}", e));
        }
    }

    Ok(())
}
