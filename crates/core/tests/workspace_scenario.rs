//! End-to-end walk through the workspace state model: registry load,
//! tool selection, stage overrides and the fall-through after a mode
//! switch.

use mission_core::{
    builtin_tools, AiModel, ModelCategory, ModelRegistry, ModelSelection, Navigator, WorkspaceMode,
};

fn model(id: &str, category: ModelCategory) -> AiModel {
    AiModel {
        id: id.to_string(),
        name: id.to_uppercase(),
        provider: "Test".to_string(),
        icon: String::new(),
        context_window: "128k".to_string(),
        category,
        is_available: true,
    }
}

#[test]
fn storytelling_session_with_overrides() {
    let registry = ModelRegistry::new();
    registry.apply_models(vec![
        model("gpt4", ModelCategory::Text),
        model("dalle", ModelCategory::Image),
    ]);
    let snap = registry.snapshot();

    let mut nav = Navigator::new();
    let mut selection = ModelSelection::new();
    selection.ensure_global(&snap);
    assert_eq!(selection.global(), Some("gpt4"));

    assert_eq!(nav.mode(), WorkspaceMode::Storytelling);
    assert_eq!(nav.stage(), "ideate");

    // Open the storyboard generator; it applies to storytelling but not
    // at the ideate stage, so navigate to outline first.
    let tools = builtin_tools();
    let storyboard = tools
        .iter()
        .find(|t| t.id == "storyboard-generator")
        .unwrap()
        .clone();
    assert!(nav.select_tool(Some(storyboard.clone())).is_err());
    nav.set_stage("outline").unwrap();
    nav.select_tool(Some(storyboard)).unwrap();
    assert!(nav.is_tool_panel_open());

    // An image model as a stage override still resolves: category is a
    // picker convenience, not a resolution constraint.
    selection.set_stage_model("ideate", Some("dalle".to_string()));
    assert_eq!(selection.resolve(&snap, "ideate", None).unwrap().id, "dalle");

    // Mode switch resets stage, closes the panel, and topic has no
    // override so resolution falls through to the global model.
    nav.set_mode(WorkspaceMode::Podcast);
    assert_eq!(nav.stage(), "topic");
    assert!(nav.selected_tool().is_none());
    assert_eq!(selection.resolve(&snap, "topic", None).unwrap().id, "gpt4");
}
