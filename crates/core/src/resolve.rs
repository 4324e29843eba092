//! Model resolution engine
//!
//! Resolves the concrete model for an action from three layers of
//! selection state. Precedence, highest first: the open tool panel's
//! override, the current stage's override, the global model. A model only
//! wins if it is actually present in the registry snapshot; a stale
//! override for a model that disappeared on refresh falls through to the
//! next layer. Category is a picker convenience, never a resolution
//! constraint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::registry::{AiModel, RegistrySnapshot};

/// User model selections: one global fallback plus per-stage overrides.
///
/// Per-tool overrides are scoped to an open tool panel and passed into
/// [`ModelSelection::resolve`] by the caller that owns the panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSelection {
    global: Option<String>,
    stage_overrides: HashMap<String, String>,
}

impl ModelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> Option<&str> {
        self.global.as_deref()
    }

    /// Set the global fallback model. The caller is the source of truth
    /// for what the user picked; notifying the backend is advisory and
    /// happens elsewhere.
    pub fn set_global(&mut self, model_id: impl Into<String>) {
        self.global = Some(model_id.into());
    }

    /// Initialize the global model from the registry if nothing has been
    /// picked yet. Keeps an explicit user choice.
    pub fn ensure_global(&mut self, snapshot: &RegistrySnapshot) {
        if self.global.is_none() {
            self.global = snapshot.default_global_model().map(|m| m.id.clone());
        }
    }

    pub fn stage_override(&self, stage_id: &str) -> Option<&str> {
        self.stage_overrides.get(stage_id).map(String::as_str)
    }

    /// Set or clear the override for a stage. `None` means "use the
    /// global default" and removes the entry outright; no null sentinel
    /// is ever stored, so clearing twice is a no-op.
    pub fn set_stage_model(&mut self, stage_id: &str, model_id: Option<String>) {
        match model_id {
            Some(id) => {
                self.stage_overrides.insert(stage_id.to_string(), id);
            }
            None => {
                self.stage_overrides.remove(stage_id);
            }
        }
    }

    /// Stage ids that currently carry an override.
    pub fn overridden_stages(&self) -> impl Iterator<Item = &str> {
        self.stage_overrides.keys().map(String::as_str)
    }

    /// Resolve the model for `stage_id`, with an optional tool-panel
    /// override taking top precedence. Returns `None` only when nothing
    /// in the chain is present in the registry (empty or not yet loaded).
    pub fn resolve<'a>(
        &self,
        snapshot: &'a RegistrySnapshot,
        stage_id: &str,
        tool_override: Option<&str>,
    ) -> Option<&'a AiModel> {
        if let Some(model) = tool_override.and_then(|id| snapshot.get(id)) {
            return Some(model);
        }
        if let Some(model) = self.stage_override(stage_id).and_then(|id| snapshot.get(id)) {
            return Some(model);
        }
        self.global.as_deref().and_then(|id| snapshot.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModelCategory, ModelRegistry};

    fn registry_abc() -> ModelRegistry {
        let registry = ModelRegistry::new();
        registry.apply_models(vec![
            model("a", ModelCategory::Text),
            model("b", ModelCategory::Text),
            model("c", ModelCategory::Image),
        ]);
        registry
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
    fn precedence_tool_then_stage_then_global() {
        let registry = registry_abc();
        let snap = registry.snapshot();

        let mut selection = ModelSelection::new();
        selection.set_global("a");
        selection.set_stage_model("ideate", Some("b".to_string()));

        assert_eq!(selection.resolve(&snap, "ideate", None).unwrap().id, "b");
        assert_eq!(selection.resolve(&snap, "ideate", Some("c")).unwrap().id, "c");

        selection.set_stage_model("ideate", None);
        assert_eq!(selection.resolve(&snap, "ideate", None).unwrap().id, "a");
    }

    #[test]
    fn category_does_not_constrain_resolution() {
        let registry = registry_abc();
        let snap = registry.snapshot();

        let mut selection = ModelSelection::new();
        selection.set_global("a");
        selection.set_stage_model("ideate", Some("c".to_string()));

        // "c" is an image model; the engine returns it regardless.
        assert_eq!(selection.resolve(&snap, "ideate", None).unwrap().id, "c");
    }

    #[test]
    fn unknown_ids_fall_through() {
        let registry = registry_abc();
        let snap = registry.snapshot();

        let mut selection = ModelSelection::new();
        selection.set_global("a");
        selection.set_stage_model("ideate", Some("gone".to_string()));

        // Stale stage override falls through to global; a stale tool
        // override falls through to the stage layer.
        assert_eq!(selection.resolve(&snap, "ideate", None).unwrap().id, "a");
        assert_eq!(selection.resolve(&snap, "ideate", Some("also-gone")).unwrap().id, "a");
    }

    #[test]
    fn empty_registry_resolves_to_none() {
        let registry = ModelRegistry::new();
        let snap = registry.snapshot();

        let mut selection = ModelSelection::new();
        selection.set_global("a");
        assert!(selection.resolve(&snap, "ideate", Some("b")).is_none());
    }

    #[test]
    fn clearing_override_is_idempotent() {
        let mut selection = ModelSelection::new();
        selection.set_stage_model("draft", Some("b".to_string()));
        selection.set_stage_model("draft", None);
        selection.set_stage_model("draft", None);

        assert_eq!(selection.overridden_stages().count(), 0);
        assert!(selection.stage_override("draft").is_none());
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut selection = ModelSelection::new();
        selection.set_stage_model("draft", Some("a".to_string()));
        selection.set_stage_model("draft", Some("b".to_string()));

        assert_eq!(selection.stage_override("draft"), Some("b"));
        assert_eq!(selection.overridden_stages().count(), 1);
    }

    #[test]
    fn ensure_global_respects_user_choice() {
        let registry = registry_abc();
        let snap = registry.snapshot();

        let mut selection = ModelSelection::new();
        selection.ensure_global(&snap);
        assert_eq!(selection.global(), Some("a"));

        selection.set_global("b");
        selection.ensure_global(&snap);
        assert_eq!(selection.global(), Some("b"));
    }
}
