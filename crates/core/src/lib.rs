//! Mission Control core state model
//!
//! The pieces every surface of the suite reads and writes: the pipeline
//! catalog, the model registry cache, the model resolution engine, the
//! workspace navigator and the tool catalog. No I/O lives here; fetching
//! and rendering belong to `studio-client` and the CLI.

pub mod navigator;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod tools;

pub use navigator::{Navigator, NavigatorError, PageRoute};
pub use pipeline::{first_stage, stages, PipelineStage, WorkspaceMode};
pub use registry::{AiModel, ModelCategory, ModelRegistry, RegistrySnapshot};
pub use resolve::ModelSelection;
pub use tools::{builtin_tools, filter_tools, Tool, TOOL_CATEGORIES};
