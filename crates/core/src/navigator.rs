//! Workspace navigator
//!
//! The single owner of "where the user is": current mode, stage, page and
//! selected tool. All transitions are synchronous and atomic; a rejected
//! transition leaves the state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pipeline::{first_stage, is_valid_stage, stages, PipelineStage, WorkspaceMode};
use crate::tools::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageRoute {
    Home,
    Dashboard,
    Workflows,
    Models,
    Settings,
}

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("unknown stage '{stage}' for mode {mode}")]
    UnknownStage { mode: WorkspaceMode, stage: String },

    #[error("tool '{tool}' does not apply to {mode}/{stage}")]
    ToolNotApplicable {
        tool: String,
        mode: WorkspaceMode,
        stage: String,
    },
}

/// Workspace navigation state machine.
///
/// Invariant: `stage` is always a stage of `mode`. Switching modes
/// re-derives the stage as the new pipeline's first stage and clears the
/// selected tool, since a stage or tool valid in the old mode may be
/// meaningless in the new one.
#[derive(Debug, Clone)]
pub struct Navigator {
    mode: WorkspaceMode,
    stage: String,
    page: PageRoute,
    selected_tool: Option<Tool>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let mode = WorkspaceMode::Storytelling;
        Self {
            mode,
            stage: first_stage(mode).id.to_string(),
            page: PageRoute::Home,
            selected_tool: None,
        }
    }

    pub fn mode(&self) -> WorkspaceMode {
        self.mode
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn page(&self) -> PageRoute {
        self.page
    }

    pub fn selected_tool(&self) -> Option<&Tool> {
        self.selected_tool.as_ref()
    }

    /// The tool panel is open exactly while a tool is selected.
    pub fn is_tool_panel_open(&self) -> bool {
        self.selected_tool.is_some()
    }

    /// The current mode's pipeline.
    pub fn pipeline(&self) -> &'static [PipelineStage] {
        stages(self.mode)
    }

    /// Switch workspace mode. Resets the stage to the new mode's first
    /// stage and clears the tool selection.
    pub fn set_mode(&mut self, mode: WorkspaceMode) {
        self.mode = mode;
        self.stage = first_stage(mode).id.to_string();
        self.selected_tool = None;
        debug!(%mode, stage = %self.stage, "workspace mode switched");
    }

    /// Move to a stage of the current mode. A stage id from another
    /// mode's pipeline is a hard error and changes nothing.
    pub fn set_stage(&mut self, stage_id: &str) -> Result<(), NavigatorError> {
        if !is_valid_stage(self.mode, stage_id) {
            return Err(NavigatorError::UnknownStage {
                mode: self.mode,
                stage: stage_id.to_string(),
            });
        }
        self.stage = stage_id.to_string();
        Ok(())
    }

    /// Advance to the next stage of the pipeline, if there is one.
    pub fn next_stage(&mut self) -> Option<&PipelineStage> {
        let pipeline = stages(self.mode);
        let idx = pipeline.iter().position(|s| s.id == self.stage)?;
        let next = pipeline.get(idx + 1)?;
        self.stage = next.id.to_string();
        Some(next)
    }

    /// Step back to the previous stage of the pipeline, if there is one.
    pub fn previous_stage(&mut self) -> Option<&PipelineStage> {
        let pipeline = stages(self.mode);
        let idx = pipeline.iter().position(|s| s.id == self.stage)?;
        let prev = pipeline.get(idx.checked_sub(1)?)?;
        self.stage = prev.id.to_string();
        Some(prev)
    }

    /// Select a tool (opening its panel) or clear the selection (closing
    /// it). Selecting a tool that does not apply to the current mode and
    /// stage is rejected and the panel stays closed.
    pub fn select_tool(&mut self, tool: Option<Tool>) -> Result<(), NavigatorError> {
        match tool {
            Some(tool) => {
                if !tool.applies_to(self.mode, &self.stage) {
                    return Err(NavigatorError::ToolNotApplicable {
                        tool: tool.id,
                        mode: self.mode,
                        stage: self.stage.clone(),
                    });
                }
                debug!(tool = %tool.id, "tool panel opened");
                self.selected_tool = Some(tool);
            }
            None => {
                self.selected_tool = None;
            }
        }
        Ok(())
    }

    /// Pure navigation; independent of mode, stage and tool.
    pub fn set_page(&mut self, page: PageRoute) {
        self.page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ideate_tool() -> Tool {
        Tool {
            id: "premise-builder".to_string(),
            name: "Premise Builder".to_string(),
            description: String::new(),
            category: "story".to_string(),
            icon: String::new(),
            modes: vec![WorkspaceMode::Storytelling],
            stages: vec!["ideate".to_string()],
        }
    }

    #[test]
    fn starts_at_storytelling_ideate() {
        let nav = Navigator::new();
        assert_eq!(nav.mode(), WorkspaceMode::Storytelling);
        assert_eq!(nav.stage(), "ideate");
        assert_eq!(nav.page(), PageRoute::Home);
        assert!(!nav.is_tool_panel_open());
    }

    #[test]
    fn mode_switch_resets_stage_and_clears_tool() {
        let mut nav = Navigator::new();
        nav.set_stage("draft").unwrap();
        nav.select_tool(Some(tool_for("draft"))).unwrap();

        nav.set_mode(WorkspaceMode::Podcast);
        assert_eq!(nav.stage(), "topic");
        assert!(nav.selected_tool().is_none());
        assert!(!nav.is_tool_panel_open());
    }

    fn tool_for(stage: &str) -> Tool {
        let mut t = ideate_tool();
        t.stages = vec![stage.to_string()];
        t
    }

    #[test]
    fn invalid_stage_is_rejected_without_state_change() {
        let mut nav = Navigator::new();
        let err = nav.set_stage("production").unwrap_err();
        assert!(matches!(err, NavigatorError::UnknownStage { .. }));
        assert_eq!(nav.stage(), "ideate");
    }

    #[test]
    fn stage_always_belongs_to_mode() {
        let mut nav = Navigator::new();
        for mode in WorkspaceMode::ALL {
            nav.set_mode(mode);
            assert!(is_valid_stage(mode, nav.stage()));
            for stage in stages(mode) {
                nav.set_stage(stage.id).unwrap();
                assert!(is_valid_stage(mode, nav.stage()));
            }
        }
    }

    #[test]
    fn selecting_inapplicable_tool_keeps_panel_closed() {
        let mut nav = Navigator::new();
        nav.set_stage("draft").unwrap();

        let err = nav.select_tool(Some(ideate_tool())).unwrap_err();
        assert!(matches!(err, NavigatorError::ToolNotApplicable { .. }));
        assert!(!nav.is_tool_panel_open());
    }

    #[test]
    fn clearing_tool_closes_panel() {
        let mut nav = Navigator::new();
        nav.select_tool(Some(ideate_tool())).unwrap();
        assert!(nav.is_tool_panel_open());

        nav.select_tool(None).unwrap();
        assert!(!nav.is_tool_panel_open());
    }

    #[test]
    fn page_is_independent_of_workspace() {
        let mut nav = Navigator::new();
        nav.set_stage("outline").unwrap();
        nav.set_page(PageRoute::Models);

        assert_eq!(nav.page(), PageRoute::Models);
        assert_eq!(nav.stage(), "outline");
        assert_eq!(nav.mode(), WorkspaceMode::Storytelling);
    }

    #[test]
    fn next_and_previous_walk_the_pipeline() {
        let mut nav = Navigator::new();
        assert_eq!(nav.next_stage().unwrap().id, "outline");
        assert_eq!(nav.next_stage().unwrap().id, "draft");
        assert_eq!(nav.previous_stage().unwrap().id, "outline");

        nav.set_stage("publish").unwrap();
        assert!(nav.next_stage().is_none());
        assert_eq!(nav.stage(), "publish");
    }
}
