//! Wire types for the studio backend.
//!
//! Shapes the backend is known to emit today. Anything that drifts
//! between deployments goes through `normalize` first; these structs are
//! the canonical post-normalization form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub cpu_load: f64,
    #[serde(default)]
    pub memory_used_gb: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disk_used_gb: f64,
    #[serde(default)]
    pub disk_percent: f64,
    #[serde(default)]
    pub optimization_level: f64,
    #[serde(default)]
    pub active_processes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub port: u16,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    pub metrics: SystemMetrics,
    #[serde(default)]
    pub services: HashMap<String, ServiceStatus>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Current cost breakdown, `/api/costs/current`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostReport {
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub breakdown: HashMap<String, f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub period: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComicRequest {
    pub title: String,
    pub style: String,
    pub panels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodcastRequest {
    pub text: String,
    pub hosts: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoRequest {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSubmitResponse {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDraft {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub word_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub title: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cost: f64,
}

/// Free-form message pushed over the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SystemMetrics>,
}

fn default_level() -> String {
    "info".to_string()
}
