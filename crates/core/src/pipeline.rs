//! Pipeline catalog
//!
//! Static mapping from workspace mode to its ordered pipeline stages.
//! The table is exhaustive over every mode; lookups cannot fail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level creative domain selecting which pipeline applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceMode {
    Storytelling,
    Filmmaking,
    Podcast,
    Soundscape,
    Audiobook,
    Multi,
}

impl WorkspaceMode {
    pub const ALL: [WorkspaceMode; 6] = [
        WorkspaceMode::Storytelling,
        WorkspaceMode::Filmmaking,
        WorkspaceMode::Podcast,
        WorkspaceMode::Soundscape,
        WorkspaceMode::Audiobook,
        WorkspaceMode::Multi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceMode::Storytelling => "storytelling",
            WorkspaceMode::Filmmaking => "filmmaking",
            WorkspaceMode::Podcast => "podcast",
            WorkspaceMode::Soundscape => "soundscape",
            WorkspaceMode::Audiobook => "audiobook",
            WorkspaceMode::Multi => "multi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for WorkspaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named step within a mode's ordered workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStage {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Position in the pipeline, contiguous starting at 1.
    pub order: u8,
}

const fn stage(id: &'static str, name: &'static str, icon: &'static str, order: u8) -> PipelineStage {
    PipelineStage { id, name, icon, order }
}

const STORYTELLING: [PipelineStage; 5] = [
    stage("ideate", "Ideate", "💡", 1),
    stage("outline", "Outline", "📋", 2),
    stage("draft", "Draft", "✏️", 3),
    stage("edit", "Edit", "🔧", 4),
    stage("publish", "Publish", "🚀", 5),
];

const FILMMAKING: [PipelineStage; 5] = [
    stage("concept", "Concept", "🎬", 1),
    stage("script", "Script", "📝", 2),
    stage("preprod", "Pre-Prod", "📐", 3),
    stage("production", "Production", "🎥", 4),
    stage("post", "Post", "🎞️", 5),
];

const PODCAST: [PipelineStage; 5] = [
    stage("topic", "Topic", "🎯", 1),
    stage("script", "Script", "📝", 2),
    stage("record", "Record", "🎙️", 3),
    stage("edit", "Edit", "🔧", 4),
    stage("publish", "Publish", "📡", 5),
];

const SOUNDSCAPE: [PipelineStage; 5] = [
    stage("concept", "Concept", "🎨", 1),
    stage("compose", "Compose", "🎵", 2),
    stage("layer", "Layer", "📚", 3),
    stage("mix", "Mix", "🎚️", 4),
    stage("master", "Master", "💎", 5),
];

const AUDIOBOOK: [PipelineStage; 5] = [
    stage("select", "Select", "📖", 1),
    stage("prepare", "Prepare", "📋", 2),
    stage("record", "Record", "🎙️", 3),
    stage("edit", "Edit", "🔧", 4),
    stage("publish", "Publish", "📚", 5),
];

const MULTI: [PipelineStage; 5] = [
    stage("plan", "Plan", "📊", 1),
    stage("create", "Create", "🎨", 2),
    stage("integrate", "Integrate", "🔗", 3),
    stage("review", "Review", "👁️", 4),
    stage("deploy", "Deploy", "🚀", 5),
];

/// Ordered pipeline stages for a mode.
pub fn stages(mode: WorkspaceMode) -> &'static [PipelineStage] {
    match mode {
        WorkspaceMode::Storytelling => &STORYTELLING,
        WorkspaceMode::Filmmaking => &FILMMAKING,
        WorkspaceMode::Podcast => &PODCAST,
        WorkspaceMode::Soundscape => &SOUNDSCAPE,
        WorkspaceMode::Audiobook => &AUDIOBOOK,
        WorkspaceMode::Multi => &MULTI,
    }
}

/// First stage of a mode's pipeline, the landing point after a mode switch.
pub fn first_stage(mode: WorkspaceMode) -> &'static PipelineStage {
    &stages(mode)[0]
}

/// Whether `stage_id` names a stage of `mode`.
pub fn is_valid_stage(mode: WorkspaceMode, stage_id: &str) -> bool {
    stages(mode).iter().any(|s| s.id == stage_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_mode_has_stages() {
        for mode in WorkspaceMode::ALL {
            assert!(!stages(mode).is_empty(), "{mode} has no stages");
        }
    }

    #[test]
    fn orders_are_contiguous_from_one() {
        for mode in WorkspaceMode::ALL {
            for (i, stage) in stages(mode).iter().enumerate() {
                assert_eq!(stage.order as usize, i + 1, "{mode}/{}", stage.id);
            }
        }
    }

    #[test]
    fn stage_ids_unique_within_mode() {
        for mode in WorkspaceMode::ALL {
            let ids: HashSet<&str> = stages(mode).iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), stages(mode).len(), "{mode}");
        }
    }

    #[test]
    fn first_stage_matches_table() {
        assert_eq!(first_stage(WorkspaceMode::Storytelling).id, "ideate");
        assert_eq!(first_stage(WorkspaceMode::Podcast).id, "topic");
        assert_eq!(first_stage(WorkspaceMode::Multi).id, "plan");
    }

    #[test]
    fn mode_round_trips_through_str() {
        for mode in WorkspaceMode::ALL {
            assert_eq!(WorkspaceMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(WorkspaceMode::parse("gardening"), None);
    }

    #[test]
    fn mode_serde_uses_lowercase() {
        let json = serde_json::to_string(&WorkspaceMode::Filmmaking).unwrap();
        assert_eq!(json, "\"filmmaking\"");
        let back: WorkspaceMode = serde_json::from_str("\"audiobook\"").unwrap();
        assert_eq!(back, WorkspaceMode::Audiobook);
    }
}
