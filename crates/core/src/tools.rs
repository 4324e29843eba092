//! Tool catalog
//!
//! Every tool is tagged with the workspace modes and pipeline stages it
//! applies to; the palette for the current workspace is a pure filter
//! over this catalog. Insertion order is preserved, never re-sorted.

use serde::{Deserialize, Serialize};

use crate::pipeline::WorkspaceMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    pub modes: Vec<WorkspaceMode>,
    pub stages: Vec<String>,
}

impl Tool {
    /// Whether this tool applies to the given workspace position.
    pub fn applies_to(&self, mode: WorkspaceMode, stage_id: &str) -> bool {
        self.modes.contains(&mode) && self.stages.iter().any(|s| s == stage_id)
    }
}

/// Category ids shown in the palette picker. "all" disables the filter.
pub const TOOL_CATEGORIES: &[(&str, &str)] = &[
    ("all", "All Tools"),
    ("story", "Story"),
    ("visual", "Visual"),
    ("image", "Image Gen"),
    ("audio", "Audio"),
    ("voice", "Voice"),
    ("video", "Video"),
    ("production", "Production"),
    ("distribution", "Distribution"),
    ("enhancement", "Enhancement"),
    ("integration", "Integration"),
];

/// Filter the catalog for the current workspace position.
///
/// A tool passes when its mode and stage tags cover the current
/// position, the query (if any) matches name, description or category
/// case-insensitively, and the category filter (if not "all") matches
/// exactly. Stable: catalog order is kept.
pub fn filter_tools<'a>(
    tools: &'a [Tool],
    mode: WorkspaceMode,
    stage_id: &str,
    query: &str,
    category: &str,
) -> Vec<&'a Tool> {
    let query = query.to_lowercase();
    tools
        .iter()
        .filter(|t| t.applies_to(mode, stage_id))
        .filter(|t| {
            query.is_empty()
                || t.name.to_lowercase().contains(&query)
                || t.description.to_lowercase().contains(&query)
                || t.category.to_lowercase().contains(&query)
        })
        .filter(|t| category == "all" || t.category == category)
        .collect()
}

fn tool(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    icon: &str,
    modes: &[WorkspaceMode],
    stages: &[&str],
) -> Tool {
    Tool {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        icon: icon.to_string(),
        modes: modes.to_vec(),
        stages: stages.iter().map(|s| s.to_string()).collect(),
    }
}

/// The built-in tool catalog, grouped by pillar.
pub fn builtin_tools() -> Vec<Tool> {
    use WorkspaceMode::*;

    let mut tools = Vec::new();

    // Story pillar
    tools.extend([
        tool(
            "premise-builder",
            "Premise Builder",
            "Create compelling story premises with genre, theme, and hook elements",
            "story",
            "💡",
            &[Storytelling, Filmmaking],
            &["ideate", "concept"],
        ),
        tool(
            "character-arc-designer",
            "Character Arc Designer",
            "Map character journeys from flaw to transformation",
            "story",
            "👤",
            &[Storytelling, Filmmaking, Audiobook],
            &["ideate", "outline", "concept", "script"],
        ),
        tool(
            "theme-weaver",
            "Theme Weaver",
            "Integrate thematic elements throughout your narrative",
            "story",
            "🎭",
            &[Storytelling, Filmmaking],
            &["ideate", "outline", "draft", "script"],
        ),
        tool(
            "plot-structure-generator",
            "Plot Structure Generator",
            "Generate plot frameworks using classic story structures",
            "story",
            "📐",
            &[Storytelling, Filmmaking],
            &["outline", "script"],
        ),
        tool(
            "dialogue-enhancer",
            "Dialogue Enhancer",
            "Polish and improve dialogue for natural conversation",
            "story",
            "💬",
            &[Storytelling, Filmmaking, Podcast, Audiobook],
            &["draft", "edit", "script"],
        ),
        tool(
            "world-builder",
            "World Builder",
            "Create rich, detailed story worlds and settings",
            "story",
            "🌍",
            &[Storytelling, Filmmaking],
            &["ideate", "concept", "preprod"],
        ),
        tool(
            "conflict-escalator",
            "Conflict Escalator",
            "Build and escalate tension throughout your story",
            "story",
            "⚔️",
            &[Storytelling, Filmmaking],
            &["outline", "draft", "script"],
        ),
        tool(
            "resolution-crafter",
            "Resolution Crafter",
            "Write satisfying story endings and resolutions",
            "story",
            "🏆",
            &[Storytelling, Filmmaking],
            &["draft", "edit", "script", "post"],
        ),
    ]);

    // Visual pillar
    tools.extend([
        tool(
            "storyboard-generator",
            "Storyboard Generator",
            "Create visual storyboards with scene descriptions and shot compositions",
            "visual",
            "🎬",
            &[Filmmaking, Storytelling],
            &["preprod", "concept", "outline"],
        ),
        tool(
            "shot-composer",
            "Shot Composer",
            "Plan and compose camera shots with framing suggestions",
            "visual",
            "📷",
            &[Filmmaking],
            &["preprod", "production"],
        ),
        tool(
            "color-palette-designer",
            "Color Palette Designer",
            "Design cohesive color schemes for visual projects",
            "visual",
            "🎨",
            &[Filmmaking, Multi],
            &["preprod", "concept", "create"],
        ),
        tool(
            "lighting-planner",
            "Lighting Planner",
            "Plan lighting setups for different moods and scenes",
            "visual",
            "💡",
            &[Filmmaking],
            &["preprod", "production"],
        ),
        tool(
            "vfx-designer",
            "Visual Effects Designer",
            "Plan and describe VFX sequences and requirements",
            "visual",
            "✨",
            &[Filmmaking],
            &["preprod", "post"],
        ),
        tool(
            "midjourney-prompter",
            "Midjourney Prompter",
            "Generate optimized Midjourney prompts for stunning visuals",
            "image",
            "🖼️",
            &[Filmmaking, Storytelling, Multi],
            &["concept", "preprod", "ideate", "create"],
        ),
        tool(
            "leonardo-styler",
            "Leonardo Styler",
            "Create styled prompts for Leonardo AI image generation",
            "image",
            "🎭",
            &[Filmmaking, Storytelling, Multi],
            &["concept", "preprod", "create"],
        ),
        tool(
            "flux-enhancer",
            "Flux Enhancer",
            "Optimize prompts for Flux model via Replicate",
            "image",
            "🌀",
            &[Filmmaking, Storytelling, Multi],
            &["concept", "preprod", "create"],
        ),
        tool(
            "dalle-creator",
            "DALL-E Creator",
            "Generate images with DALL-E 3 using optimized prompts",
            "image",
            "🤖",
            &[Filmmaking, Storytelling, Multi],
            &["concept", "preprod", "create"],
        ),
        tool(
            "stable-diffusion",
            "Stable Diffusion",
            "Generate images using Stable Diffusion models",
            "image",
            "🎨",
            &[Filmmaking, Storytelling, Multi],
            &["concept", "preprod", "create"],
        ),
    ]);

    // Audio pillar
    tools.extend([
        tool(
            "voice-cloner",
            "Voice Cloner",
            "Clone and customize voice profiles using ElevenLabs",
            "voice",
            "🎤",
            &[Podcast, Audiobook, Filmmaking],
            &["record", "production", "prepare"],
        ),
        tool(
            "sound-designer",
            "Sound Designer",
            "Create immersive soundscapes and ambient audio",
            "audio",
            "🔊",
            &[Soundscape, Filmmaking, Podcast],
            &["compose", "layer", "production", "edit"],
        ),
        tool(
            "music-composer",
            "Music Composer",
            "Generate original music and scores for your projects",
            "audio",
            "🎵",
            &[Soundscape, Filmmaking, Podcast],
            &["compose", "layer", "production"],
        ),
        tool(
            "sfx-generator",
            "SFX Generator",
            "Create and find sound effects for your projects",
            "audio",
            "💥",
            &[Soundscape, Filmmaking, Podcast],
            &["compose", "layer", "edit", "post"],
        ),
        tool(
            "audio-mixer",
            "Audio Mixer",
            "Mix and balance multiple audio tracks",
            "audio",
            "🎚️",
            &[Soundscape, Podcast, Audiobook, Filmmaking],
            &["mix", "edit", "post"],
        ),
        tool(
            "podcast-editor",
            "Podcast Editor",
            "Edit and enhance podcast audio with AI assistance",
            "audio",
            "🎙️",
            &[Podcast],
            &["edit", "publish"],
        ),
        tool(
            "audiobook-narrator",
            "Audiobook Narrator",
            "Generate narration for audiobooks using AI voices",
            "voice",
            "📖",
            &[Audiobook],
            &["record", "edit"],
        ),
        tool(
            "whisper-transcriber",
            "Whisper Transcriber",
            "Transcribe audio to text using OpenAI Whisper",
            "voice",
            "👂",
            &[Podcast, Audiobook, Filmmaking],
            &["edit", "post", "record"],
        ),
        tool(
            "elevenlabs-tts",
            "ElevenLabs TTS",
            "Generate high-quality voice synthesis with ElevenLabs",
            "voice",
            "🔊",
            &[Podcast, Audiobook, Filmmaking, Multi],
            &["record", "production", "create"],
        ),
    ]);

    // Production pillar
    tools.extend([
        tool(
            "script-formatter",
            "Script Formatter",
            "Format scripts to industry-standard screenplay format",
            "production",
            "📄",
            &[Filmmaking],
            &["script", "preprod"],
        ),
        tool(
            "shot-list-generator",
            "Shot List Generator",
            "Generate detailed shot lists from scripts",
            "production",
            "📋",
            &[Filmmaking],
            &["preprod"],
        ),
        tool(
            "call-sheet-creator",
            "Call Sheet Creator",
            "Generate production call sheets automatically",
            "production",
            "📅",
            &[Filmmaking],
            &["preprod", "production"],
        ),
        tool(
            "budget-calculator",
            "Budget Calculator",
            "Estimate project costs and create budgets",
            "production",
            "💰",
            &[Filmmaking, Podcast, Multi],
            &["concept", "plan", "preprod"],
        ),
        tool(
            "schedule-builder",
            "Schedule Builder",
            "Plan and optimize production schedules",
            "production",
            "📆",
            &[Filmmaking, Podcast, Multi],
            &["preprod", "plan"],
        ),
        tool(
            "location-scout",
            "Location Scout",
            "Find and document potential filming locations",
            "production",
            "📍",
            &[Filmmaking],
            &["preprod"],
        ),
        tool(
            "casting-assistant",
            "Casting Assistant",
            "Get casting suggestions and manage auditions",
            "production",
            "🎭",
            &[Filmmaking],
            &["preprod"],
        ),
    ]);

    // Distribution pillar
    tools.extend([
        tool(
            "platform-optimizer",
            "Platform Optimizer",
            "Optimize content for different distribution platforms",
            "distribution",
            "📱",
            &[Filmmaking, Podcast, Audiobook, Multi],
            &["publish", "deploy"],
        ),
        tool(
            "thumbnail-generator",
            "Thumbnail Generator",
            "Create eye-catching thumbnails for videos and content",
            "distribution",
            "🖼️",
            &[Filmmaking, Podcast, Multi],
            &["publish", "post", "deploy"],
        ),
        tool(
            "description-writer",
            "Description Writer",
            "Write SEO-optimized descriptions for content",
            "distribution",
            "✍️",
            &[Filmmaking, Podcast, Audiobook, Multi],
            &["publish", "deploy"],
        ),
        tool(
            "tag-generator",
            "Tag Generator",
            "Generate relevant tags and keywords for discoverability",
            "distribution",
            "🏷️",
            &[Filmmaking, Podcast, Multi],
            &["publish", "deploy"],
        ),
        tool(
            "schedule-publisher",
            "Schedule Publisher",
            "Schedule and automate content publishing",
            "distribution",
            "⏰",
            &[Filmmaking, Podcast, Multi],
            &["publish", "deploy"],
        ),
        tool(
            "analytics-tracker",
            "Analytics Tracker",
            "Track and analyze content performance",
            "distribution",
            "📊",
            &[Filmmaking, Podcast, Multi],
            &["publish", "deploy", "review"],
        ),
    ]);

    // Enhancement pillar
    tools.extend([
        tool(
            "mythic-structure",
            "Mythic Structure",
            "Apply Joseph Campbell's mythic framework to your story",
            "enhancement",
            "🏛️",
            &[Storytelling, Filmmaking],
            &["outline", "script", "ideate"],
        ),
        tool(
            "heros-journey",
            "Hero's Journey",
            "Map your story to the classic Hero's Journey stages",
            "enhancement",
            "🦸",
            &[Storytelling, Filmmaking],
            &["outline", "script", "ideate"],
        ),
        tool(
            "save-the-cat",
            "Save the Cat",
            "Generate beat sheets using Blake Snyder's method",
            "enhancement",
            "🐱",
            &[Storytelling, Filmmaking],
            &["outline", "script"],
        ),
        tool(
            "three-act-structure",
            "Three Act Structure",
            "Structure your story in classic three-act format",
            "enhancement",
            "3️⃣",
            &[Storytelling, Filmmaking],
            &["outline", "script"],
        ),
        tool(
            "condenser",
            "Condenser",
            "Condense and summarize text while preserving key points",
            "enhancement",
            "🗜️",
            &[Storytelling, Podcast, Audiobook, Multi],
            &["edit", "draft", "review"],
        ),
        tool(
            "expander",
            "Expander",
            "Expand concepts and ideas into fuller narratives",
            "enhancement",
            "📈",
            &[Storytelling, Podcast, Audiobook, Multi],
            &["draft", "create"],
        ),
        tool(
            "style-transfer",
            "Style Transfer",
            "Apply different writing styles to your content",
            "enhancement",
            "🎨",
            &[Storytelling, Podcast, Multi],
            &["edit", "draft", "review"],
        ),
    ]);

    // Integration pillar
    tools.extend([
        tool(
            "api-connector",
            "API Connector",
            "Connect to external APIs and services",
            "integration",
            "🔌",
            &[Multi],
            &["integrate", "create"],
        ),
        tool(
            "workflow-builder",
            "Workflow Builder",
            "Build and manage automated workflows",
            "integration",
            "⚙️",
            &[Multi],
            &["plan", "integrate"],
        ),
        tool(
            "data-transformer",
            "Data Transformer",
            "Transform and convert data between formats",
            "integration",
            "🔄",
            &[Multi],
            &["integrate", "create"],
        ),
        tool(
            "export-manager",
            "Export Manager",
            "Manage and configure exports to different formats",
            "integration",
            "📤",
            &[Filmmaking, Podcast, Audiobook, Multi],
            &["publish", "deploy", "post"],
        ),
        tool(
            "import-handler",
            "Import Handler",
            "Handle imports from various sources and formats",
            "integration",
            "📥",
            &[Multi],
            &["integrate", "create"],
        ),
        tool(
            "sync-manager",
            "Sync Manager",
            "Sync data and settings across tools and platforms",
            "integration",
            "🔁",
            &[Multi],
            &["integrate", "plan"],
        ),
    ]);

    // Video generation
    tools.extend([
        tool(
            "runway-gen2",
            "Runway Gen-2",
            "Generate videos using RunwayML Gen-2 model",
            "video",
            "🎬",
            &[Filmmaking, Multi],
            &["production", "post", "create"],
        ),
        tool(
            "video-essay-creator",
            "Video Essay Creator",
            "Create complete video essays from text content",
            "video",
            "📹",
            &[Filmmaking, Multi],
            &["production", "post", "create"],
        ),
    ]);

    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn podcast_record_tool() -> Tool {
        tool(
            "take-recorder",
            "Take Recorder",
            "Capture takes",
            "audio",
            "🎙️",
            &[WorkspaceMode::Podcast],
            &["record"],
        )
    }

    #[test]
    fn filter_requires_mode_and_stage() {
        let tools = vec![podcast_record_tool()];

        assert_eq!(
            filter_tools(&tools, WorkspaceMode::Podcast, "record", "", "all").len(),
            1
        );
        assert!(filter_tools(&tools, WorkspaceMode::Storytelling, "record", "", "all").is_empty());
        assert!(filter_tools(&tools, WorkspaceMode::Podcast, "edit", "", "all").is_empty());
    }

    #[test]
    fn query_matches_case_insensitively() {
        let tools = vec![podcast_record_tool()];

        assert_eq!(
            filter_tools(&tools, WorkspaceMode::Podcast, "record", "TAKE", "all").len(),
            1
        );
        assert_eq!(
            filter_tools(&tools, WorkspaceMode::Podcast, "record", "capture", "all").len(),
            1
        );
        assert!(filter_tools(&tools, WorkspaceMode::Podcast, "record", "storyboard", "all").is_empty());
    }

    #[test]
    fn category_filter_is_exact() {
        let tools = vec![podcast_record_tool()];

        assert_eq!(
            filter_tools(&tools, WorkspaceMode::Podcast, "record", "", "audio").len(),
            1
        );
        assert!(filter_tools(&tools, WorkspaceMode::Podcast, "record", "", "voice").is_empty());
    }

    #[test]
    fn filter_keeps_catalog_order() {
        let tools = builtin_tools();
        let filtered = filter_tools(&tools, WorkspaceMode::Storytelling, "ideate", "", "all");
        assert!(filtered.len() > 1);

        let positions: Vec<usize> = filtered
            .iter()
            .map(|f| tools.iter().position(|t| t.id == f.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn builtin_catalog_stages_exist_in_some_mode() {
        use crate::pipeline::{is_valid_stage, WorkspaceMode};

        for tool in builtin_tools() {
            for stage in &tool.stages {
                let known = WorkspaceMode::ALL
                    .iter()
                    .any(|m| is_valid_stage(*m, stage));
                assert!(known, "tool {} references unknown stage {}", tool.id, stage);
            }
            assert!(!tool.modes.is_empty(), "tool {} has no modes", tool.id);
        }
    }

    #[test]
    fn builtin_catalog_ids_are_unique() {
        let tools = builtin_tools();
        let ids: std::collections::HashSet<&str> = tools.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), tools.len());
    }
}
