//! Model registry cache
//!
//! Holds the backend-sourced catalog of AI models plus the per-provider
//! key-validation map. The two are fetched by independent backend calls
//! and may land (or fail) independently; each merge publishes a complete
//! new snapshot so readers never observe a half-applied registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
    Voice,
    Video,
    Audio,
}

impl ModelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Text => "text",
            ModelCategory::Image => "image",
            ModelCategory::Voice => "voice",
            ModelCategory::Video => "video",
            ModelCategory::Audio => "audio",
        }
    }
}

impl std::fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model record from the registry. Replaced wholesale on refresh,
/// never mutated in place; only the *selection* of a model changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub context_window: String,
    pub category: ModelCategory,
    #[serde(default)]
    pub is_available: bool,
}

/// An immutable published view of the registry.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub models: Vec<AiModel>,
    /// Provider name (lowercased) -> whether an API key is configured.
    pub key_status: HashMap<String, bool>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AiModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn list_by_category(&self, category: ModelCategory) -> Vec<&AiModel> {
        self.models.iter().filter(|m| m.category == category).collect()
    }

    /// A model counts as configured when the registry call reported it
    /// available OR the key-validation call vouched for its provider.
    /// The two endpoints can disagree transiently; the OR keeps the view
    /// eventually consistent once either call lands.
    pub fn is_configured(&self, model: &AiModel) -> bool {
        model.is_available
            || self
                .key_status
                .get(&model.provider.to_lowercase())
                .copied()
                .unwrap_or(false)
    }

    /// The fallback of last resort: the first text-category model.
    pub fn default_global_model(&self) -> Option<&AiModel> {
        self.models.iter().find(|m| m.category == ModelCategory::Text)
    }
}

/// Atomically swappable registry cache.
///
/// Readers take an `Arc` snapshot and keep reading it even while a
/// refresh publishes a replacement; they see the old list fully or the
/// new list fully, never a mix.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    inner: RwLock<Arc<RegistrySnapshot>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.read_guard().clone()
    }

    /// Replace both halves of the cache at once.
    pub fn publish(&self, models: Vec<AiModel>, key_status: HashMap<String, bool>) {
        let next = RegistrySnapshot {
            models,
            key_status,
            fetched_at: Some(Utc::now()),
        };
        self.swap(next);
    }

    /// Merge a fresh model list, keeping the current key-status map.
    pub fn apply_models(&self, models: Vec<AiModel>) {
        let current = self.snapshot();
        debug!(count = models.len(), "applying model registry");
        self.swap(RegistrySnapshot {
            models,
            key_status: current.key_status.clone(),
            fetched_at: Some(Utc::now()),
        });
    }

    /// Merge a fresh key-validation map, keeping the current model list.
    pub fn apply_key_status(&self, key_status: HashMap<String, bool>) {
        let current = self.snapshot();
        self.swap(RegistrySnapshot {
            models: current.models.clone(),
            key_status,
            fetched_at: current.fetched_at,
        });
    }

    fn swap(&self, next: RegistrySnapshot) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(next);
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Arc<RegistrySnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn model(id: &str, provider: &str, category: ModelCategory, available: bool) -> AiModel {
        AiModel {
            id: id.to_string(),
            name: id.to_uppercase(),
            provider: provider.to_string(),
            icon: String::new(),
            context_window: "128k".to_string(),
            category,
            is_available: available,
        }
    }

    #[test]
    fn snapshot_starts_empty() {
        let registry = ModelRegistry::new();
        assert!(registry.snapshot().is_empty());
        assert!(registry.snapshot().fetched_at.is_none());
    }

    #[test]
    fn apply_models_keeps_key_status() {
        let registry = ModelRegistry::new();
        registry.apply_key_status(HashMap::from([("openai".to_string(), true)]));
        registry.apply_models(vec![model("gpt4", "OpenAI", ModelCategory::Text, false)]);

        let snap = registry.snapshot();
        assert_eq!(snap.models.len(), 1);
        assert!(snap.is_configured(snap.get("gpt4").unwrap()));
    }

    #[test]
    fn apply_key_status_keeps_models() {
        let registry = ModelRegistry::new();
        registry.apply_models(vec![model("dalle", "OpenAI", ModelCategory::Image, true)]);
        registry.apply_key_status(HashMap::new());

        let snap = registry.snapshot();
        assert!(snap.get("dalle").is_some());
        // Registry said available; empty key map must not revoke that.
        assert!(snap.is_configured(snap.get("dalle").unwrap()));
    }

    #[test]
    fn is_configured_honors_either_source() {
        let registry = ModelRegistry::new();
        registry.publish(
            vec![
                model("a", "Anthropic", ModelCategory::Text, true),
                model("b", "Google", ModelCategory::Text, false),
                model("c", "Mistral", ModelCategory::Text, false),
            ],
            HashMap::from([("google".to_string(), true), ("mistral".to_string(), false)]),
        );

        let snap = registry.snapshot();
        assert!(snap.is_configured(snap.get("a").unwrap()));
        assert!(snap.is_configured(snap.get("b").unwrap()));
        assert!(!snap.is_configured(snap.get("c").unwrap()));
    }

    #[test]
    fn readers_keep_old_snapshot_across_publish() {
        let registry = ModelRegistry::new();
        registry.apply_models(vec![model("old", "X", ModelCategory::Text, true)]);

        let held = registry.snapshot();
        registry.apply_models(vec![model("new", "X", ModelCategory::Text, true)]);

        // The held snapshot is untouched; a fresh one sees the new list.
        assert!(held.get("old").is_some());
        assert!(held.get("new").is_none());
        let fresh = registry.snapshot();
        assert!(fresh.get("old").is_none());
        assert!(fresh.get("new").is_some());
    }

    #[test]
    fn default_global_is_first_text_model() {
        let registry = ModelRegistry::new();
        registry.apply_models(vec![
            model("dalle", "OpenAI", ModelCategory::Image, true),
            model("gpt4", "OpenAI", ModelCategory::Text, true),
            model("claude", "Anthropic", ModelCategory::Text, true),
        ]);
        assert_eq!(registry.snapshot().default_global_model().unwrap().id, "gpt4");
    }

    #[test]
    fn list_by_category_is_a_pure_filter() {
        let registry = ModelRegistry::new();
        registry.apply_models(vec![
            model("gpt4", "OpenAI", ModelCategory::Text, true),
            model("dalle", "OpenAI", ModelCategory::Image, true),
            model("eleven", "ElevenLabs", ModelCategory::Voice, true),
        ]);
        let snap = registry.snapshot();
        let images = snap.list_by_category(ModelCategory::Image);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "dalle");
    }
}
