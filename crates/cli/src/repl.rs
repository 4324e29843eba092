//! Interactive REPL for Mission CLI
//!
//! The workspace shell: slash commands drive the navigator, model
//! selection and generation jobs, plain input goes to content generation
//! with the currently resolved model.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tokio::sync::RwLock;
use tracing::debug;

use mission_core::{PageRoute, WorkspaceMode};
use studio_client::{
    ComicRequest, EventsClient, EventsConfig, PodcastRequest, PollConfig, StudioEvent,
    VideoRequest, WsMessage,
};

use crate::{
    config::Config,
    dashboard::Dashboard,
    output::OutputHandler,
    session::WorkspaceSession,
};

const EVENT_BUFFER: usize = 50;

/// Interactive REPL for Mission CLI
pub struct MissionRepl {
    session: WorkspaceSession,
    config: Config,
    output: OutputHandler,
    editor: Editor<(), DefaultHistory>,
    dashboard: Dashboard,
    events: Option<EventsClient>,
    recent_messages: Arc<RwLock<Vec<WsMessage>>>,
    last_response: Option<String>,
}

impl MissionRepl {
    pub fn new(session: WorkspaceSession, config: Config) -> Result<Self> {
        let output = OutputHandler::new(config.display.show_status_bar);
        let editor = Editor::new()?;
        let dashboard = Dashboard::start(session.client().clone());

        Ok(Self {
            session,
            config,
            output,
            editor,
            dashboard,
            events: None,
            recent_messages: Arc::new(RwLock::new(Vec::new())),
            last_response: None,
        })
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> Result<()> {
        let connected = self.session.client().is_running().await;
        self.output
            .print_banner(self.session.client().base_url(), connected);

        if connected {
            self.session.refresh_registry().await;
        } else {
            self.output
                .print_warning("Backend offline. Navigation and tools work; generation does not.");
        }

        if let Some(mode) = WorkspaceMode::parse(&self.config.session.default_mode) {
            self.session.set_mode(mode);
        }

        if connected && self.config.session.auto_connect_events {
            self.connect_events().await;
        }

        loop {
            let prompt = self.build_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();

                    if input.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_command(input).await {
                            Ok(should_exit) => {
                                if should_exit {
                                    break;
                                }
                            }
                            Err(e) => {
                                self.output.print_error(&format!("Command error: {}", e));
                            }
                        }
                    } else if let Err(e) = self.process_input(input).await {
                        self.output.print_error(&format!("Error: {}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.output.print_info("Use /exit to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Connect the event stream and drain it into the message buffer.
    async fn connect_events(&mut self) {
        let mut client = EventsClient::new(EventsConfig::from_base_url(
            self.session.client().base_url(),
        ));

        match client.connect_with_retry().await {
            Ok(mut rx) => {
                let buffer = self.recent_messages.clone();
                tokio::spawn(async move {
                    while let Some(event) = rx.recv().await {
                        match event {
                            StudioEvent::Message(msg) => {
                                let mut buf = buffer.write().await;
                                buf.push(msg);
                                let excess = buf.len().saturating_sub(EVENT_BUFFER);
                                if excess > 0 {
                                    buf.drain(..excess);
                                }
                            }
                            StudioEvent::SystemUpdate { metrics } => {
                                debug!(cpu = metrics.cpu_load, "system update");
                            }
                        }
                    }
                });
                self.events = Some(client);
            }
            Err(e) => {
                self.output
                    .print_warning(&format!("Event stream unavailable: {}", e));
            }
        }
    }

    /// Build the prompt string: mode/stage plus the resolved model.
    fn build_prompt(&self) -> String {
        let mode = self.session.navigator.mode();
        let stage = self.session.navigator.stage();

        let model_part = self
            .session
            .resolved_model()
            .map(|m| format!(" {}", m.id.bright_yellow()))
            .unwrap_or_default();

        let tool_part = self
            .session
            .navigator
            .selected_tool()
            .map(|t| format!(" {}", t.icon))
            .unwrap_or_default();

        format!(
            "\n{} [{}/{}{}{}] {} ",
            "mission".bright_green().bold(),
            mode.to_string().bright_cyan(),
            stage.bright_white(),
            model_part,
            tool_part,
            ">".bright_green()
        )
    }

    /// Handle slash commands. Returns true to exit.
    async fn handle_command(&mut self, input: &str) -> Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().unwrap_or(&"");

        match *command {
            "/exit" | "/quit" | "/q" => return Ok(true),

            "/help" | "/h" | "/?" => self.print_help(),

            "/mode" => self.handle_mode(&parts[1..]),

            "/stage" => self.handle_stage(&parts[1..]),

            "/next" => match self.session.navigator.next_stage() {
                Some(stage) => self
                    .output
                    .print_success(&format!("Now at {} {}", stage.icon, stage.name)),
                None => self.output.print_info("Already at the last stage."),
            },

            "/prev" => match self.session.navigator.previous_stage() {
                Some(stage) => self
                    .output
                    .print_success(&format!("Back to {} {}", stage.icon, stage.name)),
                None => self.output.print_info("Already at the first stage."),
            },

            "/pipeline" => {
                let mode = self.session.navigator.mode();
                let stage = self.session.navigator.stage().to_string();
                self.output
                    .print_pipeline(mode, self.session.navigator.pipeline(), &stage);
            }

            "/tool" => self.handle_tool(&parts[1..]),

            "/tools" => self.handle_tools(&parts[1..]),

            "/model" => self.handle_model(&parts[1..]),

            "/models" => {
                self.session.refresh_registry().await;
                let snapshot = self.session.snapshot();
                if snapshot.is_empty() {
                    self.output.print_info("Registry is empty.");
                } else {
                    self.output
                        .print_models_table(&snapshot.models, |m| snapshot.is_configured(m));
                }
            }

            "/status" => self.handle_status().await,

            "/costs" => {
                let cached = self.dashboard.read().await.costs.clone();
                match cached {
                    Some(report) => self.output.print_costs(&report),
                    None => match self.session.client().current_costs().await {
                        Ok(report) => self.output.print_costs(&report),
                        Err(e) => self.output.print_error(&format!("Costs unavailable: {}", e)),
                    },
                }
            }

            "/workflows" => match self.session.client().list_workflows().await {
                Ok(workflows) => self.output.print_workflows_table(&workflows),
                Err(e) => self
                    .output
                    .print_error(&format!("Workflows unavailable: {}", e)),
            },

            "/run" => {
                if parts.len() < 2 {
                    self.output.print_error("Usage: /run <workflow-id>");
                } else {
                    crate::commands::run_workflow(self.session.client(), parts[1]).await?;
                }
            }

            "/comic" => self.handle_comic(&parts[1..]).await,

            "/podcast" => self.handle_podcast(&parts[1..]).await,

            "/video" => self.handle_video(&parts[1..]).await,

            "/videos" => match self.session.client().recent_videos().await {
                Ok(videos) => self.output.print_videos_table(&videos),
                Err(e) => self.output.print_error(&format!("Videos unavailable: {}", e)),
            },

            "/save" => match &self.last_response {
                Some(content) => {
                    match self.session.client().save_draft(content, None).await {
                        Ok(()) => self.output.print_success("Draft saved."),
                        Err(e) => self.output.print_error(&format!("Save failed: {}", e)),
                    }
                }
                None => self.output.print_info("Nothing to save yet."),
            },

            "/drafts" => match self.session.client().drafts().await {
                Ok(drafts) => {
                    if drafts.is_empty() {
                        self.output.print_info("No drafts saved.");
                    }
                    for draft in drafts {
                        println!(
                            "  {} {} {}",
                            format!("#{}", draft.id).dimmed(),
                            draft.content.chars().take(60).collect::<String>(),
                            format!("({} words)", draft.word_count).dimmed()
                        );
                    }
                }
                Err(e) => self.output.print_error(&format!("Drafts unavailable: {}", e)),
            },

            "/send" => self.handle_send(&parts[1..]),

            "/messages" => {
                let messages = self.recent_messages.read().await;
                if messages.is_empty() {
                    self.output.print_info("No messages received.");
                }
                for msg in messages.iter() {
                    println!(
                        "  {} {} {}",
                        msg.timestamp.dimmed(),
                        format!("[{}]", msg.source).bright_cyan(),
                        msg.message
                    );
                }
            }

            "/page" => self.handle_page(&parts[1..]),

            "/clear" => print!("\x1B[2J\x1B[1;1H"),

            _ => {
                self.output.print_error(&format!(
                    "Unknown command: {}. Use /help for available commands.",
                    command
                ));
            }
        }

        Ok(false)
    }

    fn handle_mode(&mut self, args: &[&str]) {
        let Some(name) = args.first() else {
            self.output.print_info(&format!(
                "Current mode: {}. Modes: {}",
                self.session.navigator.mode(),
                WorkspaceMode::ALL
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            return;
        };

        match WorkspaceMode::parse(name) {
            Some(mode) => {
                self.session.set_mode(mode);
                let stage = self.session.navigator.stage().to_string();
                self.output
                    .print_success(&format!("Mode: {} (stage reset to {})", mode, stage));
            }
            None => self.output.print_error(&format!("Unknown mode: {}", name)),
        }
    }

    fn handle_stage(&mut self, args: &[&str]) {
        let Some(stage_id) = args.first() else {
            let mode = self.session.navigator.mode();
            let stage = self.session.navigator.stage().to_string();
            self.output
                .print_pipeline(mode, self.session.navigator.pipeline(), &stage);
            return;
        };

        match self.session.navigator.set_stage(stage_id) {
            Ok(()) => self.output.print_success(&format!("Stage: {}", stage_id)),
            Err(e) => self.output.print_error(&e.to_string()),
        }
    }

    fn handle_tool(&mut self, args: &[&str]) {
        match args {
            [] => match self.session.navigator.selected_tool() {
                Some(tool) => {
                    println!();
                    println!("  {} {} {}", tool.icon, tool.name.bright_white(), format!("({})", tool.id).dimmed());
                    println!("  {}", tool.description.dimmed());
                    if let Some(model) = self.session.tool_model_override() {
                        println!("  {} {}", "Model override:".dimmed(), model.bright_yellow());
                    }
                    println!();
                }
                None => self.output.print_info("No tool open. Usage: /tool <id>"),
            },
            ["close"] => {
                self.session.close_tool();
                self.output.print_success("Tool panel closed.");
            }
            ["model", model_id] => match self.session.set_tool_model(model_id) {
                Ok(()) => self
                    .output
                    .print_success(&format!("Tool model override: {}", model_id)),
                Err(e) => self.output.print_error(&e),
            },
            [tool_id] => match self.session.open_tool(tool_id) {
                Ok(()) => self.output.print_success(&format!("Opened tool: {}", tool_id)),
                Err(e) => self.output.print_error(&e),
            },
            _ => self.output.print_error("Usage: /tool [<id>|close|model <id>]"),
        }
    }

    fn handle_tools(&mut self, args: &[&str]) {
        // First arg can be a category filter; the rest is a query.
        let (category, query) = match args {
            [] => ("all".to_string(), String::new()),
            [first, rest @ ..]
                if mission_core::TOOL_CATEGORIES.iter().any(|(id, _)| id == first) =>
            {
                (first.to_string(), rest.join(" "))
            }
            _ => ("all".to_string(), args.join(" ")),
        };

        let matches = self.session.filtered_tools(&query, &category);
        self.output.print_tools_table(&matches);
    }

    fn handle_model(&mut self, args: &[&str]) {
        match args {
            [] => {
                println!();
                println!(
                    "  {} {}",
                    "Global:".dimmed(),
                    self.session
                        .selection()
                        .global()
                        .unwrap_or("none")
                        .bright_yellow()
                );
                for stage in self.session.navigator.pipeline() {
                    if let Some(model) = self.session.selection().stage_override(stage.id) {
                        println!("  {} {}", format!("{}:", stage.id).dimmed(), model);
                    }
                }
                if let Some(resolved) = self.session.resolved_model() {
                    println!(
                        "  {} {} ({})",
                        "Resolved:".dimmed(),
                        resolved.id.bright_green(),
                        resolved.provider
                    );
                }
                println!();
            }
            [model_id] => match self.session.select_global_model(model_id) {
                Ok(()) => self
                    .output
                    .print_success(&format!("Global model: {}", model_id)),
                Err(e) => self.output.print_error(&e),
            },
            [stage_id, "clear"] => match self.session.set_stage_model(stage_id, None) {
                Ok(()) => self
                    .output
                    .print_success(&format!("Cleared override for {}", stage_id)),
                Err(e) => self.output.print_error(&e),
            },
            [stage_id, model_id] => {
                match self
                    .session
                    .set_stage_model(stage_id, Some(model_id.to_string()))
                {
                    Ok(()) => self
                        .output
                        .print_success(&format!("{} -> {}", stage_id, model_id)),
                    Err(e) => self.output.print_error(&e),
                }
            }
            _ => self
                .output
                .print_error("Usage: /model [<id>|<stage> <id>|<stage> clear]"),
        }
    }

    async fn handle_status(&self) {
        let state = self.dashboard.read().await;
        match &state.metrics {
            Some(metrics) => self.output.print_metrics(metrics),
            None => {
                drop(state);
                match self.session.client().system_status().await {
                    Ok(status) => self.output.print_metrics(&status.metrics),
                    Err(e) => self
                        .output
                        .print_error(&format!("Status unavailable: {}", e)),
                }
                return;
            }
        }

        if !state.active_workflows.is_empty() {
            println!(
                "  {} {}",
                "Active workflows:".dimmed(),
                state.active_workflows.len()
            );
        }
    }

    async fn handle_comic(&mut self, args: &[&str]) {
        if args.is_empty() {
            self.output.print_error("Usage: /comic <panel description>");
            return;
        }

        let description = args.join(" ");
        let request = ComicRequest {
            title: "Untitled".to_string(),
            style: "manga".to_string(),
            panels: vec![description],
        };

        match self.session.client().create_comic(request).await {
            Ok(submitted) => {
                self.output
                    .print_info(&format!("Comic job submitted: {}", submitted.job_id));
                self.await_job(&submitted.job_id).await;
            }
            Err(e) => self.output.print_error(&format!("Comic submit failed: {}", e)),
        }
    }

    async fn handle_podcast(&mut self, args: &[&str]) {
        if args.is_empty() {
            self.output.print_error("Usage: /podcast <text>");
            return;
        }

        let request = PodcastRequest {
            text: args.join(" "),
            hosts: "default".to_string(),
        };

        match self.session.client().convert_podcast(request).await {
            Ok(submitted) => {
                self.output
                    .print_info(&format!("Podcast job submitted: {}", submitted.job_id));
                self.await_job(&submitted.job_id).await;
            }
            Err(e) => self
                .output
                .print_error(&format!("Podcast submit failed: {}", e)),
        }
    }

    async fn handle_video(&mut self, args: &[&str]) {
        if args.is_empty() {
            self.output.print_error("Usage: /video <description>");
            return;
        }

        let request = VideoRequest {
            description: args.join(" "),
            style: None,
        };

        match self.session.client().generate_video(request).await {
            Ok(submitted) => {
                self.output
                    .print_info(&format!("Video job submitted: {}", submitted.job_id));
                self.await_job(&submitted.job_id).await;
            }
            Err(e) => self.output.print_error(&format!("Video submit failed: {}", e)),
        }
    }

    async fn await_job(&self, job_id: &str) {
        match self
            .session
            .client()
            .wait_for_job(job_id, PollConfig::default())
            .await
        {
            Ok(status) => {
                self.output.print_success("Job completed.");
                if let Some(result) = status.result {
                    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
                }
            }
            Err(e) => self.output.print_error(&e.to_string()),
        }
    }

    fn handle_send(&mut self, args: &[&str]) {
        if args.is_empty() {
            self.output.print_error("Usage: /send <message>");
            return;
        }

        let Some(events) = &self.events else {
            self.output.print_error("Event stream not connected.");
            return;
        };

        let msg = WsMessage {
            id: String::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "mission-cli".to_string(),
            message: args.join(" "),
            level: "info".to_string(),
            metrics: None,
        };

        match events.send(msg) {
            Ok(()) => self.output.print_success("Sent."),
            Err(e) => self.output.print_error(&e.to_string()),
        }
    }

    fn handle_page(&mut self, args: &[&str]) {
        let Some(name) = args.first() else {
            self.output
                .print_info("Pages: home, dashboard, workflows, models, settings");
            return;
        };

        let page = match *name {
            "home" => PageRoute::Home,
            "dashboard" => PageRoute::Dashboard,
            "workflows" => PageRoute::Workflows,
            "models" => PageRoute::Models,
            "settings" => PageRoute::Settings,
            _ => {
                self.output.print_error(&format!("Unknown page: {}", name));
                return;
            }
        };

        self.session.navigator.set_page(page);
        self.output.print_success(&format!("Page: {}", name));
    }

    /// Print help information
    fn print_help(&self) {
        println!();
        println!("{}", "Mission CLI Commands".bright_white().bold());
        println!("{}", "─".repeat(50).dimmed());
        println!();

        println!("{}", "Workspace:".bright_cyan());
        println!("  {}        Switch workspace mode", "/mode <mode>".bright_yellow());
        println!("  {}        Jump to a pipeline stage", "/stage <id>".bright_yellow());
        println!("  {}  Walk the pipeline", "/next, /prev".bright_yellow());
        println!("  {}           Show the current pipeline", "/pipeline".bright_yellow());
        println!("  {}            Go to a page", "/page <name>".bright_yellow());
        println!();

        println!("{}", "Tools:".bright_cyan());
        println!("  {}            List tools for this position", "/tools [query]".bright_yellow());
        println!("  {}          Open a tool panel", "/tool <id>".bright_yellow());
        println!("  {}        Close the tool panel", "/tool close".bright_yellow());
        println!("  {}  Override the panel's model", "/tool model <id>".bright_yellow());
        println!();

        println!("{}", "Models:".bright_cyan());
        println!("  {}            Show the registry", "/models".bright_yellow());
        println!("  {}        Show/set selections", "/model [args]".bright_yellow());
        println!();

        println!("{}", "Studio:".bright_cyan());
        println!("  {}  System metrics", "/status".bright_yellow());
        println!("  {}   Cost breakdown", "/costs".bright_yellow());
        println!("  {}  List workflows", "/workflows".bright_yellow());
        println!("  {}  Execute a workflow", "/run <id>".bright_yellow());
        println!("  {}  Generate a comic", "/comic <desc>".bright_yellow());
        println!("  {}  Convert text to podcast", "/podcast <text>".bright_yellow());
        println!("  {}  Generate a video", "/video <desc>".bright_yellow());
        println!("  {}  Recent videos / drafts", "/videos, /drafts".bright_yellow());
        println!("  {}  Save the last response as a draft", "/save".bright_yellow());
        println!("  {}  Event stream", "/send, /messages".bright_yellow());
        println!();

        println!("{}", "Other:".bright_cyan());
        println!("  {}            Clear screen", "/clear".bright_yellow());
        println!("  {}             Show this help", "/help".bright_yellow());
        println!("  {}             Exit the CLI", "/exit".bright_yellow());
        println!();
    }

    /// Plain input goes to content generation with the resolved model.
    async fn process_input(&mut self, input: &str) -> Result<()> {
        let model = self.session.resolved_model();

        self.output.print_info("Generating...");
        println!();

        match self
            .session
            .client()
            .generate_content(input, None, model.as_ref().map(|m| m.id.as_str()))
            .await
        {
            Ok(content) => {
                println!("{}", content.content);
                self.last_response = Some(content.content);

                self.output.print_status_bar(
                    self.session.navigator.mode(),
                    self.session.navigator.stage(),
                    model.as_ref().map(|m| m.id.as_str()),
                );
            }
            Err(e) => {
                self.output.print_error(&format!("Generation failed: {}", e));
                self.output
                    .print_info("Make sure the studio backend is running on the configured URL.");
            }
        }

        Ok(())
    }
}
