//! Output formatting and terminal rendering
//!
//! Handles rich terminal output with colors, tables, and the status bar.

use colored::Colorize;

use mission_core::{AiModel, PipelineStage, Tool, WorkspaceMode};
use studio_client::{CostReport, SystemMetrics, VideoEntry, Workflow};

/// Output handler for terminal display
pub struct OutputHandler {
    pub show_status_bar: bool,
}

impl OutputHandler {
    pub fn new(show_status_bar: bool) -> Self {
        Self { show_status_bar }
    }

    /// Print the welcome banner
    pub fn print_banner(&self, server_url: &str, connected: bool) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗"
                .bright_cyan()
        );
        println!(
            "{}",
            "║                    MISSION CONTROL                            ║"
                .bright_cyan()
        );
        println!(
            "{}",
            "╠═══════════════════════════════════════════════════════════════╣"
                .bright_cyan()
        );
        println!(
            "{}  Backend: {:<51}{}",
            "║".bright_cyan(),
            if connected {
                server_url.bright_green().to_string()
            } else {
                format!("{} (offline)", server_url).dimmed().to_string()
            },
            "║".bright_cyan()
        );
        println!(
            "{}  {}                               {}",
            "║".bright_cyan(),
            "Type your request or use /help for commands".dimmed(),
            "║".bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝"
                .bright_cyan()
        );
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print an info message
    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Print the pipeline for the current mode, marking the active stage
    pub fn print_pipeline(&self, mode: WorkspaceMode, stages: &[PipelineStage], current: &str) {
        self.print_header(&format!("{} pipeline", mode));

        for stage in stages {
            let marker = if stage.id == current {
                "●".bright_green()
            } else {
                "○".dimmed()
            };
            let name = if stage.id == current {
                stage.name.bright_white().bold().to_string()
            } else {
                stage.name.normal().to_string()
            };
            println!(
                "  {} {} {} {}",
                marker,
                stage.icon,
                name,
                format!("({})", stage.id).dimmed()
            );
        }
        println!();
    }

    /// Print the model registry table
    pub fn print_models_table(&self, models: &[AiModel], key_known: impl Fn(&AiModel) -> bool) {
        println!();
        println!(
            "{}",
            format!(
                "{:<24} {:<14} {:<10} {:>12} {:>10}",
                "ID", "Provider", "Category", "Context", "Keys"
            )
            .bright_white()
            .bold()
        );
        println!("{}", "─".repeat(76).dimmed());

        for model in models {
            let keys = if key_known(model) {
                "ready".bright_green()
            } else {
                "missing".bright_red()
            };

            println!(
                "{:<24} {:<14} {:<10} {:>12} {:>10}",
                model.id.bright_white(),
                model.provider,
                model.category.to_string().bright_cyan(),
                model.context_window.dimmed(),
                keys
            );
        }
        println!();
    }

    /// Print a filtered tool listing
    pub fn print_tools_table(&self, tools: &[&Tool]) {
        if tools.is_empty() {
            self.print_info("No tools match the current mode and stage.");
            return;
        }

        println!();
        println!(
            "{}",
            format!("{:<26} {:<14} {}", "ID", "Category", "Description")
                .bright_white()
                .bold()
        );
        println!("{}", "─".repeat(90).dimmed());

        for tool in tools {
            let desc = truncate(&tool.description, 46);

            println!(
                "{} {:<26} {:<14} {}",
                tool.icon,
                tool.id.bright_white(),
                tool.category.bright_cyan(),
                desc.dimmed()
            );
        }
        println!();
    }

    /// Print workflows table
    pub fn print_workflows_table(&self, workflows: &[Workflow]) {
        if workflows.is_empty() {
            self.print_info("No workflows found.");
            return;
        }

        println!();
        println!(
            "{}",
            format!("{:<20} {:<30} {:>8}", "ID", "Name", "Steps")
                .bright_white()
                .bold()
        );
        println!("{}", "─".repeat(62).dimmed());

        for wf in workflows {
            println!(
                "{:<20} {:<30} {:>8}",
                wf.id.dimmed(),
                wf.name.bright_white(),
                wf.steps
            );
        }
        println!();
    }

    /// Print the cost breakdown
    pub fn print_costs(&self, report: &CostReport) {
        println!();
        println!(
            "  {} {}",
            "Total:".dimmed(),
            format!("${:.2} {}", report.total_cost, report.currency).bright_cyan()
        );
        if let Some(period) = &report.period {
            println!("  {} {}", "Period:".dimmed(), period);
        }

        let mut categories: Vec<_> = report.breakdown.iter().collect();
        categories.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (category, amount) in categories {
            println!(
                "    {} {:>10}",
                format!("{}:", category).dimmed(),
                format!("${:.2}", amount)
            );
        }
        println!();
    }

    /// Print live system metrics
    pub fn print_metrics(&self, metrics: &SystemMetrics) {
        println!();
        println!(
            "  {} {:>5.1}%   {} {:>5.1}% ({:.1} GB)   {} {:>5.1}% ({:.1} GB)",
            "CPU:".dimmed(),
            metrics.cpu_load,
            "Memory:".dimmed(),
            metrics.memory_percent,
            metrics.memory_used_gb,
            "Disk:".dimmed(),
            metrics.disk_percent,
            metrics.disk_used_gb
        );
        println!(
            "  {} {}   {} {:.0}%",
            "Processes:".dimmed(),
            metrics.active_processes,
            "Optimization:".dimmed(),
            metrics.optimization_level
        );
        println!();
    }

    /// Print recent videos
    pub fn print_videos_table(&self, videos: &[VideoEntry]) {
        if videos.is_empty() {
            self.print_info("No videos generated yet.");
            return;
        }

        println!();
        println!(
            "{}",
            format!("{:<36} {:>10} {:>10}", "Title", "Duration", "Cost")
                .bright_white()
                .bold()
        );
        println!("{}", "─".repeat(60).dimmed());

        for video in videos {
            println!(
                "{:<36} {:>10} {:>10}",
                video.title.bright_white(),
                video.duration.as_deref().unwrap_or("-").dimmed(),
                format!("${:.2}", video.cost)
            );
        }
        println!();
    }

    /// Print the workspace status bar under a response
    pub fn print_status_bar(&self, mode: WorkspaceMode, stage: &str, model: Option<&str>) {
        if !self.show_status_bar {
            return;
        }

        println!();
        println!(
            "{}",
            "───────────────────────────────────────────────────────────────".dimmed()
        );
        println!(
            "  {} {} | {} {} | {} {}",
            "Mode:".dimmed(),
            mode.to_string().bright_cyan(),
            "Stage:".dimmed(),
            stage.bright_white(),
            "Model:".dimmed(),
            model
                .map(|m| m.bright_yellow().to_string())
                .unwrap_or_else(|| "none".dimmed().to_string())
        );
    }
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
/// Counts chars, not bytes, so multi-byte text never splits mid-character.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 46), "short");
    }

    #[test]
    fn truncate_handles_multibyte_text() {
        let text = "délibérément écrit avec des caractères accentués partout";
        let cut = truncate(text, 46);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 46);
    }
}
