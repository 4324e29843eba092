//! Response normalization
//!
//! The studio backend's response shapes drift between deployments: the
//! model registry is sometimes a bare array and sometimes wrapped in
//! `{"models": [...]}`, field names flip between snake and camel case,
//! and generated text arrives as either `content` or `generated_content`.
//! Everything is mapped into one canonical shape here, at the network
//! boundary, so the state model never branches on wire variants.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use mission_core::{AiModel, ModelCategory};

use crate::error::StudioError;
use crate::types::{CostReport, HealthResponse, Workflow};

/// Parse a registry payload: bare array or `{"models": [...]}`.
pub fn parse_registry(value: &Value) -> Result<Vec<AiModel>, StudioError> {
    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => map
            .get("models")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| StudioError::Parse("registry object without 'models' array".into()))?,
        _ => return Err(StudioError::Parse("registry is neither array nor object".into())),
    };

    let mut models = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_model(entry) {
            Some(model) => models.push(model),
            None => debug!(?entry, "skipping registry entry without id"),
        }
    }
    Ok(models)
}

fn parse_model(entry: &Value) -> Option<AiModel> {
    let id = str_field(entry, &["id"])?.to_string();
    let name = str_field(entry, &["name"]).unwrap_or(&id).to_string();
    let provider = str_field(entry, &["provider"]).unwrap_or("Unknown").to_string();
    let icon = str_field(entry, &["icon"]).unwrap_or_default().to_string();
    let context_window = str_field(entry, &["contextWindow", "context_window"])
        .map(str::to_string)
        .or_else(|| {
            entry
                .get("context_window")
                .and_then(Value::as_u64)
                .map(|n| n.to_string())
        })
        .unwrap_or_default();
    let category = str_field(entry, &["category", "type"])
        .map(parse_category)
        .unwrap_or(ModelCategory::Text);
    let is_available = bool_field(entry, &["isAvailable", "is_available", "api_key_configured"]);

    Some(AiModel {
        id,
        name,
        provider,
        icon,
        context_window,
        category,
        is_available,
    })
}

fn parse_category(s: &str) -> ModelCategory {
    match s.to_lowercase().as_str() {
        "image" => ModelCategory::Image,
        "voice" => ModelCategory::Voice,
        "video" => ModelCategory::Video,
        "audio" => ModelCategory::Audio,
        // Unknown categories degrade to text rather than dropping the model.
        _ => ModelCategory::Text,
    }
}

/// Parse the key-validation payload into provider (lowercased) -> bool.
/// Accepts a bare map or one nested under `providers` / `keys`.
pub fn parse_key_status(value: &Value) -> HashMap<String, bool> {
    let map = ["providers", "keys"]
        .iter()
        .find_map(|k| value.get(k).and_then(Value::as_object))
        .or_else(|| value.as_object());

    let mut status = HashMap::new();
    if let Some(map) = map {
        for (provider, v) in map {
            let configured = match v {
                Value::Bool(b) => *b,
                // Some deployments report {"configured": true} per provider.
                Value::Object(o) => o.get("configured").and_then(Value::as_bool).unwrap_or(false),
                _ => false,
            };
            status.insert(provider.to_lowercase(), configured);
        }
    }
    status
}

/// Parse a health payload; the version field has drifted names.
pub fn parse_health(value: &Value) -> Result<HealthResponse, StudioError> {
    let status = str_field(value, &["status"])
        .ok_or_else(|| StudioError::Parse("health payload without status".into()))?
        .to_string();
    let version = str_field(value, &["version", "app_version"])
        .unwrap_or_default()
        .to_string();

    Ok(HealthResponse {
        status,
        version,
        backend: str_field(value, &["backend"]).map(str::to_string),
        timestamp: str_field(value, &["timestamp"]).map(str::to_string),
    })
}

/// Alias `generated_content` to `content` when only the former is set.
pub fn normalize_content(mut value: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        if !map.contains_key("content") {
            if let Some(generated) = map.get("generated_content").cloned() {
                map.insert("content".to_string(), generated);
            }
        }
    }
    value
}

/// Parse the cost payload; missing fields default to zero/empty.
pub fn parse_costs(value: &Value) -> CostReport {
    let total_cost = ["total_cost", "total"]
        .iter()
        .find_map(|k| value.get(k).and_then(Value::as_f64))
        .unwrap_or(0.0);

    let mut breakdown = HashMap::new();
    if let Some(map) = value.get("breakdown").and_then(Value::as_object) {
        for (category, amount) in map {
            breakdown.insert(category.clone(), amount.as_f64().unwrap_or(0.0));
        }
    }

    CostReport {
        total_cost,
        breakdown,
        currency: str_field(value, &["currency"]).unwrap_or("USD").to_string(),
        period: str_field(value, &["period"]).map(str::to_string),
    }
}

/// Parse a workflow listing: bare array or `{"workflows": [...]}`.
pub fn parse_workflows(value: &Value) -> Result<Vec<Workflow>, StudioError> {
    let entries = match value {
        Value::Array(_) => value.clone(),
        Value::Object(map) => map
            .get("workflows")
            .cloned()
            .ok_or_else(|| StudioError::Parse("workflow object without 'workflows' array".into()))?,
        _ => return Err(StudioError::Parse("workflows is neither array nor object".into())),
    };

    serde_json::from_value(entries).map_err(|e| StudioError::Parse(e.to_string()))
}

fn str_field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|n| value.get(n).and_then(Value::as_str))
}

fn bool_field(value: &Value, names: &[&str]) -> bool {
    names
        .iter()
        .find_map(|n| value.get(n).and_then(Value::as_bool))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_accepts_bare_array_and_wrapper() {
        let bare = json!([
            {"id": "claude", "name": "Claude Sonnet", "provider": "Anthropic", "contextWindow": "200k", "type": "text"}
        ]);
        let wrapped = json!({"models": [
            {"id": "claude", "name": "Claude Sonnet", "provider": "Anthropic", "context_window": "200k", "category": "text", "is_available": true}
        ], "count": 1});

        let a = parse_registry(&bare).unwrap();
        let b = parse_registry(&wrapped).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].id, "claude");
        assert_eq!(a[0].context_window, "200k");
        assert_eq!(b[0].context_window, "200k");
        assert!(!a[0].is_available);
        assert!(b[0].is_available);
    }

    #[test]
    fn registry_honors_api_key_configured_alias() {
        let value = json!([{"id": "gpt4", "provider": "OpenAI", "type": "text", "api_key_configured": true}]);
        let models = parse_registry(&value).unwrap();
        assert!(models[0].is_available);
    }

    #[test]
    fn registry_skips_entries_without_id() {
        let value = json!([{"name": "nameless"}, {"id": "ok", "type": "image"}]);
        let models = parse_registry(&value).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].category, ModelCategory::Image);
    }

    #[test]
    fn unknown_category_degrades_to_text() {
        let value = json!([{"id": "x", "type": "hologram"}]);
        assert_eq!(parse_registry(&value).unwrap()[0].category, ModelCategory::Text);
    }

    #[test]
    fn key_status_lowercases_providers() {
        let flat = json!({"OpenAI": true, "Anthropic": false});
        let nested = json!({"providers": {"Google": {"configured": true}}});

        let a = parse_key_status(&flat);
        assert_eq!(a.get("openai"), Some(&true));
        assert_eq!(a.get("anthropic"), Some(&false));

        let b = parse_key_status(&nested);
        assert_eq!(b.get("google"), Some(&true));
    }

    #[test]
    fn health_version_field_drift() {
        let old = json!({"status": "ok", "app_version": "0.9.0"});
        let new = json!({"status": "ok", "version": "1.0.0", "backend": "unified"});

        assert_eq!(parse_health(&old).unwrap().version, "0.9.0");
        let parsed = parse_health(&new).unwrap();
        assert_eq!(parsed.version, "1.0.0");
        assert_eq!(parsed.backend.as_deref(), Some("unified"));
    }

    #[test]
    fn generated_content_is_aliased() {
        let value = json!({"generated_content": "once upon a time", "model": "gpt4"});
        let normalized = normalize_content(value);
        assert_eq!(normalized["content"], "once upon a time");

        // An explicit content field is never overwritten.
        let value = json!({"content": "keep", "generated_content": "discard"});
        assert_eq!(normalize_content(value)["content"], "keep");
    }

    #[test]
    fn costs_tolerate_missing_fields() {
        let report = parse_costs(&json!({}));
        assert_eq!(report.total_cost, 0.0);
        assert!(report.breakdown.is_empty());
        assert_eq!(report.currency, "USD");

        let report = parse_costs(&json!({
            "total_cost": 1.25,
            "breakdown": {"ai_apis": 1.0, "storage": 0.25},
            "currency": "USD",
            "period": "current_month"
        }));
        assert_eq!(report.total_cost, 1.25);
        assert_eq!(report.breakdown["ai_apis"], 1.0);
    }

    #[test]
    fn workflows_accept_both_shapes() {
        let wrapped = json!({"workflows": [{"id": "w1", "name": "Publish", "steps": 3}], "count": 1});
        let bare = json!([{"id": "w1", "name": "Publish"}]);

        assert_eq!(parse_workflows(&wrapped).unwrap().len(), 1);
        assert_eq!(parse_workflows(&bare).unwrap()[0].id, "w1");
    }
}
