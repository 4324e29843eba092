//! Workspace session state
//!
//! Owns the navigator, the model selections and the registry cache for
//! one shell session. The per-tool model override lives here, scoped to
//! the open tool panel and discarded when the panel closes.

use std::sync::Arc;

use tracing::{debug, warn};

use mission_core::{
    builtin_tools, filter_tools, AiModel, ModelRegistry, ModelSelection, Navigator,
    NavigatorError, RegistrySnapshot, Tool, WorkspaceMode,
};
use studio_client::StudioClient;

pub struct WorkspaceSession {
    pub navigator: Navigator,
    selection: ModelSelection,
    registry: ModelRegistry,
    tools: Vec<Tool>,
    /// Override for the open tool panel. Cleared whenever the panel
    /// closes or the mode switches; it never outlives the panel.
    tool_model_override: Option<String>,
    client: StudioClient,
}

impl WorkspaceSession {
    pub fn new(client: StudioClient) -> Self {
        Self {
            navigator: Navigator::new(),
            selection: ModelSelection::new(),
            registry: ModelRegistry::new(),
            tools: builtin_tools(),
            tool_model_override: None,
            client,
        }
    }

    pub fn client(&self) -> &StudioClient {
        &self.client
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.registry.snapshot()
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Refresh the registry from the backend. The model list and the key
    /// status are fetched concurrently and land independently; either
    /// call failing or stalling leaves the other half intact and is not
    /// fatal.
    pub async fn refresh_registry(&mut self) {
        let (models, keys) = tokio::join!(self.client.model_registry(), self.client.validate_keys());

        match models {
            Ok(models) => self.registry.apply_models(models),
            Err(e) => warn!("model registry fetch failed: {}", e),
        }

        match keys {
            Ok(status) => self.registry.apply_key_status(status),
            Err(e) => warn!("key validation fetch failed: {}", e),
        }

        self.selection.ensure_global(&self.registry.snapshot());
    }

    /// Pick the global model. The local selection is the source of truth
    /// and updates immediately; the backend notification is advisory and
    /// fired in the background.
    pub fn select_global_model(&mut self, model_id: &str) -> Result<(), String> {
        let snapshot = self.registry.snapshot();
        if snapshot.get(model_id).is_none() {
            return Err(format!("unknown model: {}", model_id));
        }

        self.selection.set_global(model_id);

        let client = self.client.clone();
        let id = model_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = client.switch_model(&id).await {
                debug!("advisory model switch failed: {}", e);
            }
        });

        Ok(())
    }

    /// Set or clear the model override for a stage of the current mode.
    pub fn set_stage_model(&mut self, stage_id: &str, model_id: Option<String>) -> Result<(), String> {
        if let Some(id) = &model_id {
            if self.registry.snapshot().get(id).is_none() {
                return Err(format!("unknown model: {}", id));
            }
        }
        self.selection.set_stage_model(stage_id, model_id);
        Ok(())
    }

    /// Switch workspace mode. Stage resets, the tool panel closes and
    /// the panel's model override goes with it.
    pub fn set_mode(&mut self, mode: WorkspaceMode) {
        self.navigator.set_mode(mode);
        self.tool_model_override = None;
    }

    /// Open a tool panel by catalog id.
    pub fn open_tool(&mut self, tool_id: &str) -> Result<(), String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.id == tool_id)
            .cloned()
            .ok_or_else(|| format!("unknown tool: {}", tool_id))?;

        self.navigator
            .select_tool(Some(tool))
            .map_err(|e: NavigatorError| e.to_string())?;
        self.tool_model_override = None;
        Ok(())
    }

    /// Close the tool panel, discarding its model override.
    pub fn close_tool(&mut self) {
        // Clearing never fails.
        let _ = self.navigator.select_tool(None);
        self.tool_model_override = None;
    }

    /// Override the model for the open tool panel.
    pub fn set_tool_model(&mut self, model_id: &str) -> Result<(), String> {
        if !self.navigator.is_tool_panel_open() {
            return Err("no tool panel open".to_string());
        }
        if self.registry.snapshot().get(model_id).is_none() {
            return Err(format!("unknown model: {}", model_id));
        }
        self.tool_model_override = Some(model_id.to_string());
        Ok(())
    }

    pub fn tool_model_override(&self) -> Option<&str> {
        self.tool_model_override.as_deref()
    }

    /// Resolve the model for the current workspace position, honoring an
    /// open tool panel's override.
    pub fn resolved_model(&self) -> Option<AiModel> {
        let snapshot = self.registry.snapshot();
        self.selection
            .resolve(
                &snapshot,
                self.navigator.stage(),
                self.tool_model_override.as_deref(),
            )
            .cloned()
    }

    /// Resolve for an arbitrary stage, ignoring the tool panel.
    pub fn resolved_for_stage(&self, stage_id: &str) -> Option<AiModel> {
        let snapshot = self.registry.snapshot();
        self.selection.resolve(&snapshot, stage_id, None).cloned()
    }

    /// The tool palette for the current workspace position.
    pub fn filtered_tools(&self, query: &str, category: &str) -> Vec<&Tool> {
        filter_tools(
            &self.tools,
            self.navigator.mode(),
            self.navigator.stage(),
            query,
            category,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_core::ModelCategory;

    fn session_with_models() -> WorkspaceSession {
        let mut session = WorkspaceSession::new(StudioClient::new("http://localhost:9"));
        // Seed the registry without the network.
        let registry = ModelRegistry::new();
        registry.apply_models(vec![
            model("gpt4", ModelCategory::Text),
            model("dalle", ModelCategory::Image),
        ]);
        session.registry = registry;
        session.selection.ensure_global(&session.registry.snapshot());
        session
    }

    fn model(id: &str, category: ModelCategory) -> AiModel {
        AiModel {
            id: id.to_string(),
            name: id.to_uppercase(),
            provider: "Test".to_string(),
            icon: String::new(),
            context_window: String::new(),
            category,
            is_available: true,
        }
    }

    #[test]
    fn global_defaults_to_first_text_model() {
        let session = session_with_models();
        assert_eq!(session.resolved_model().unwrap().id, "gpt4");
    }

    #[test]
    fn closing_tool_discards_its_override() {
        let mut session = session_with_models();
        session.open_tool("premise-builder").unwrap();
        session.set_tool_model("dalle").unwrap();
        assert_eq!(session.resolved_model().unwrap().id, "dalle");

        session.close_tool();
        assert!(session.tool_model_override().is_none());
        assert_eq!(session.resolved_model().unwrap().id, "gpt4");
    }

    #[test]
    fn mode_switch_discards_tool_override() {
        let mut session = session_with_models();
        session.open_tool("premise-builder").unwrap();
        session.set_tool_model("dalle").unwrap();

        session.set_mode(WorkspaceMode::Podcast);
        assert!(session.tool_model_override().is_none());
        assert!(!session.navigator.is_tool_panel_open());
    }

    #[test]
    fn tool_override_requires_open_panel() {
        let mut session = session_with_models();
        assert!(session.set_tool_model("dalle").is_err());
    }

    #[test]
    fn stage_override_rejects_unknown_models() {
        let mut session = session_with_models();
        assert!(session.set_stage_model("draft", Some("gone".to_string())).is_err());
        assert!(session.set_stage_model("draft", Some("dalle".to_string())).is_ok());
        assert_eq!(session.resolved_for_stage("draft").unwrap().id, "dalle");
    }

    #[test]
    fn inapplicable_tool_is_rejected() {
        let mut session = session_with_models();
        // storyboard-generator is not an ideate-stage tool.
        assert!(session.open_tool("storyboard-generator").is_err());
        assert!(!session.navigator.is_tool_panel_open());
    }

    #[tokio::test]
    async fn registry_and_key_fetches_run_concurrently() {
        use std::sync::Mutex;
        use std::time::{Duration, Instant};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let arrivals = Arc::new(Mutex::new(Vec::<(&'static str, Instant)>::new()));

        // Stub backend: the registry endpoint stalls before answering,
        // key validation answers immediately. Arrival times tell us
        // whether the client issued both requests up front.
        let log = arrivals.clone();
        let server = tokio::spawn(async move {
            for _ in 0..2 {
                let (mut socket, _) = listener.accept().await.unwrap();
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap();
                    let head = String::from_utf8_lossy(&buf[..n]).to_string();
                    let is_registry = head.contains("/api/models/registry");
                    log.lock().unwrap().push((
                        if is_registry { "registry" } else { "keys" },
                        Instant::now(),
                    ));
                    if is_registry {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                    let body = if is_registry {
                        r#"{"models":[]}"#
                    } else {
                        r#"{"providers":{"openai":true}}"#
                    };
                    let resp = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    socket.write_all(resp.as_bytes()).await.unwrap();
                });
            }
        });

        let mut session = WorkspaceSession::new(StudioClient::new(&format!("http://{}", addr)));
        session.refresh_registry().await;
        server.await.unwrap();

        let arrivals = arrivals.lock().unwrap();
        assert_eq!(arrivals.len(), 2, "expected both endpoints to be hit");
        let registry_at = arrivals.iter().find(|(p, _)| *p == "registry").unwrap().1;
        let keys_at = arrivals.iter().find(|(p, _)| *p == "keys").unwrap().1;
        let gap = if keys_at > registry_at {
            keys_at - registry_at
        } else {
            registry_at - keys_at
        };
        // Serialized fetches would put the key request behind the full
        // registry stall; concurrent fetches arrive within milliseconds.
        assert!(gap < Duration::from_millis(400), "fetches were serialized: {:?}", gap);

        assert!(session.snapshot().key_status.get("openai").copied().unwrap_or(false));
    }

    #[test]
    fn filtered_tools_track_workspace_position() {
        let mut session = session_with_models();
        let at_ideate: Vec<String> = session
            .filtered_tools("", "all")
            .iter()
            .map(|t| t.id.clone())
            .collect();
        for id in &at_ideate {
            let tool = session.tools().iter().find(|t| &t.id == id).unwrap();
            assert!(tool.applies_to(WorkspaceMode::Storytelling, "ideate"));
        }

        session.set_mode(WorkspaceMode::Podcast);
        let at_topic: Vec<String> = session
            .filtered_tools("", "all")
            .iter()
            .map(|t| t.id.clone())
            .collect();
        for id in &at_topic {
            let tool = session.tools().iter().find(|t| &t.id == id).unwrap();
            assert!(tool.applies_to(WorkspaceMode::Podcast, "topic"));
        }
    }
}
