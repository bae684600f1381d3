pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod folder;
pub mod hierarchy;
pub mod identity;
pub mod normalize;
pub mod parser;
pub mod project;
pub mod resource;
pub mod source;
pub mod summary;
pub mod task;
pub mod validation;

#[cfg(feature = "http_api")]
pub mod http_api;

pub use config::NormalizerConfig;
pub use error::{Error, Result};
pub use folder::{FolderBuilder, FolderWarning};
pub use parser::{FailureResponse, ParsedSchedule, ScheduleParser};
pub use project::ProjectInfo;
pub use resource::ResourceAssignment;
pub use source::{
    JsonProject, JsonScheduleReader, JsonTask, ScheduleAnalyzer, SourceError, SourceProject,
    SourceTask,
};
pub use summary::SummaryStats;
pub use task::{HierarchyType, PredecessorLink, RelationType, SuccessorLink, TaskRecord};
pub use validation::{RecordValidationError, validate_records};
