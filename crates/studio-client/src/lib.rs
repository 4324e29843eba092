//! Studio Client - HTTP/WebSocket client for the Mission Control backend
//!
//! Used by the CLI shell to:
//! - Check health and pull system status for the dashboard
//! - Fetch the model registry and provider key status
//! - Track costs and list workflows
//! - Submit comic/podcast/video generation jobs and poll them
//! - Stream live events over WebSocket

use reqwest::Client;
use tracing::{info, warn};

pub mod error;
pub mod events;
pub mod jobs;
pub mod normalize;
pub mod types;

pub use error::StudioError;
pub use events::{EventsClient, EventsConfig, StudioEvent};
pub use jobs::{poll_job, JobState, JobStatus, PollConfig};
pub use types::*;

use mission_core::AiModel;

/// Client for the Mission Control studio API
#[derive(Clone)]
pub struct StudioClient {
    base_url: String,
    client: Client,
}

impl StudioClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from `MISSION_API_URL`, defaulting to localhost
    pub fn from_env() -> Self {
        let url = std::env::var("MISSION_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        Self::new(&url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the backend is reachable
    pub async fn is_running(&self) -> bool {
        self.health().await.is_ok()
    }

    /// Health check
    pub async fn health(&self) -> Result<HealthResponse, StudioError> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|_| StudioError::NotReachable(self.base_url.clone()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        normalize::parse_health(&value)
    }

    // ─── System & Dashboard ───────────────────────────────────────────────

    /// Current system metrics and service statuses
    pub async fn system_status(&self) -> Result<SystemStatus, StudioError> {
        let url = format!("{}/api/system/status", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))
    }

    // ─── Models ───────────────────────────────────────────────────────────

    /// Fetch the model registry, tolerating both wire shapes
    pub async fn model_registry(&self) -> Result<Vec<AiModel>, StudioError> {
        let url = format!("{}/api/models/registry", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        normalize::parse_registry(&value)
    }

    /// Fetch provider key status, lowercased provider names
    pub async fn validate_keys(
        &self,
    ) -> Result<std::collections::HashMap<String, bool>, StudioError> {
        let url = format!("{}/api/models/validate-keys", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        Ok(normalize::parse_key_status(&value))
    }

    /// Advisory model switch. The caller's local selection is already
    /// updated before this is sent; failures are reported, not fatal.
    pub async fn switch_model(&self, model_id: &str) -> Result<(), StudioError> {
        let url = format!("{}/api/models/switch", self.base_url);
        let payload = serde_json::json!({ "model": model_id });

        let resp = self.client.post(&url).json(&payload).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await
                .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
            return Err(StudioError::Api(
                err["error"].as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        Ok(())
    }

    // ─── Costs ────────────────────────────────────────────────────────────

    /// Current cost breakdown
    pub async fn current_costs(&self) -> Result<CostReport, StudioError> {
        let url = format!("{}/api/costs/current", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        Ok(normalize::parse_costs(&value))
    }

    /// Record a cost entry
    pub async fn track_cost(&self, category: &str, amount: f64) -> Result<(), StudioError> {
        let url = format!("{}/api/costs/track", self.base_url);
        let payload = serde_json::json!({ "category": category, "amount": amount });

        let resp = self.client.post(&url).json(&payload).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StudioError::Api(format!(
                "cost tracking failed: {}",
                resp.status()
            )));
        }

        Ok(())
    }

    // ─── Workflows ────────────────────────────────────────────────────────

    /// List all known workflows
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, StudioError> {
        let url = format!("{}/api/workflows/list", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        normalize::parse_workflows(&value)
    }

    /// List currently running workflows
    pub async fn active_workflows(&self) -> Result<Vec<Workflow>, StudioError> {
        let url = format!("{}/api/workflows/active", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;
        normalize::parse_workflows(&value)
    }

    /// Start a workflow by id
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
    ) -> Result<serde_json::Value, StudioError> {
        let url = format!("{}/api/workflows/execute", self.base_url);
        let payload = serde_json::json!({ "workflow_id": workflow_id });

        let resp = self.client.post(&url).json(&payload).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await
                .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
            return Err(StudioError::Api(
                err["error"].as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))
    }

    // ─── Content ──────────────────────────────────────────────────────────

    /// Generate text content; the model is advisory and may be None
    pub async fn generate_content(
        &self,
        prompt: &str,
        tone: Option<&str>,
        model: Option<&str>,
    ) -> Result<GeneratedContent, StudioError> {
        let url = format!("{}/api/content/generate", self.base_url);
        let payload = serde_json::json!({ "prompt": prompt, "tone": tone, "model": model });

        let resp = self.client.post(&url).json(&payload).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;

        // Some deployments emit generated_content instead of content.
        serde_json::from_value(normalize::normalize_content(value))
            .map_err(|e| StudioError::Parse(e.to_string()))
    }

    /// Save a content draft
    pub async fn save_draft(&self, content: &str, persona: Option<&str>) -> Result<(), StudioError> {
        let url = format!("{}/api/content/save", self.base_url);
        let payload = serde_json::json!({ "content": content, "persona": persona });

        let resp = self.client.post(&url).json(&payload).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StudioError::Api(format!(
                "draft save failed: {}",
                resp.status()
            )));
        }

        Ok(())
    }

    /// List saved drafts
    pub async fn drafts(&self) -> Result<Vec<ContentDraft>, StudioError> {
        let url = format!("{}/api/content/drafts", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;

        let entries = value
            .get("drafts")
            .cloned()
            .unwrap_or(value);
        serde_json::from_value(entries).map_err(|e| StudioError::Parse(e.to_string()))
    }

    /// List recently generated videos
    pub async fn recent_videos(&self) -> Result<Vec<VideoEntry>, StudioError> {
        let url = format!("{}/api/videos/recent", self.base_url);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        let value: serde_json::Value = resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))?;

        let entries = value
            .get("videos")
            .cloned()
            .unwrap_or(value);
        serde_json::from_value(entries).map_err(|e| StudioError::Parse(e.to_string()))
    }

    // ─── Generation Jobs ──────────────────────────────────────────────────

    /// Submit a comic generation job
    pub async fn create_comic(&self, req: ComicRequest) -> Result<JobSubmitResponse, StudioError> {
        self.submit_job("/api/comic/create", &req).await
    }

    /// Submit a podcast conversion job
    pub async fn convert_podcast(
        &self,
        req: PodcastRequest,
    ) -> Result<JobSubmitResponse, StudioError> {
        self.submit_job("/api/podcast/convert", &req).await
    }

    /// Submit a video generation job
    pub async fn generate_video(
        &self,
        req: VideoRequest,
    ) -> Result<JobSubmitResponse, StudioError> {
        self.submit_job("/api/video/generate", &req).await
    }

    async fn submit_job<T: serde::Serialize>(
        &self,
        path: &str,
        req: &T,
    ) -> Result<JobSubmitResponse, StudioError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(req).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await
                .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
            return Err(StudioError::Api(
                err["error"].as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))
    }

    /// Get the current status of a job
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, StudioError> {
        let url = format!("{}/api/job/{}/status", self.base_url, job_id);
        let resp = self.client.get(&url).send().await
            .map_err(|e| StudioError::Api(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StudioError::Api(format!("job {} not found", job_id)));
        }

        resp.json().await
            .map_err(|e| StudioError::Parse(e.to_string()))
    }

    /// Poll a job to completion under the given budget
    pub async fn wait_for_job(
        &self,
        job_id: &str,
        config: PollConfig,
    ) -> Result<JobStatus, StudioError> {
        poll_job(job_id, config, || self.job_status(job_id)).await
    }
}

/// Try to connect to the studio backend, returning a client if reachable
pub async fn try_connect() -> Option<StudioClient> {
    let client = StudioClient::from_env();

    match client.health().await {
        Ok(health) => {
            info!(
                "Connected to studio backend v{} at {}",
                health.version,
                client.base_url()
            );
            Some(client)
        }
        Err(e) => {
            warn!("Studio backend not available at {}: {}", client.base_url(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = StudioClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
