//! End-to-end normalization of a source project.
//!
//! Collection and normalization work per task; classification, folders and
//! statistics need the complete record set, so they only start once every
//! task has been normalized.

use crate::collector::{CollectedTask, collect_tasks};
use crate::config::NormalizerConfig;
use crate::error::{Error, Result};
use crate::folder::assign_folders;
use crate::hierarchy::classify;
use crate::normalize::normalize_task;
use crate::project::ProjectInfo;
use crate::source::{ScheduleAnalyzer, SourceProject, SourceTask};
use crate::summary::{CollectionStats, SummaryStats, summarize};
use crate::task::TaskRecord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Successful result of one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub success: bool,
    pub project: ProjectInfo,
    pub tasks: Vec<TaskRecord>,
    pub summary: SummaryStats,
}

impl ParsedSchedule {
    pub fn task(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Failure shape handed to transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl From<&Error> for FailureResponse {
    fn from(err: &Error) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleParser {
    config: NormalizerConfig,
}

impl ScheduleParser {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn parse<P>(&self, project: &P) -> Result<ParsedSchedule>
    where
        P: SourceProject,
        P::Task: Send + Sync,
    {
        let properties = project
            .properties()
            .map_err(|err| Error::fatal_read(format!("project properties unavailable: {err}")))?;
        let project_info = ProjectInfo::from_properties(&properties);

        let collection = collect_tasks(project);
        let mut tasks = self.normalize_all(&collection.tasks);

        let range = classify(&mut tasks);
        let cycles = assign_folders(&mut tasks);
        if !cycles.is_empty() {
            warn!(count = cycles.len(), "hierarchy cycles left folders empty");
        }

        let summary = summarize(
            &tasks,
            CollectionStats {
                collected_task_count: collection.len(),
                parsed_task_count: tasks.len(),
                candidate_count: collection.candidate_count,
            },
        );
        info!(
            project = %project_info.name,
            tasks = tasks.len(),
            min_outline = range.min,
            max_outline = range.max,
            coverage = summary.dependencies.coverage_percent,
            "schedule normalized"
        );

        Ok(ParsedSchedule {
            success: true,
            project: project_info,
            tasks,
            summary,
        })
    }

    /// Runs `analyzer` over the project first. A failing analyzer is logged
    /// and the raw project data is parsed instead.
    pub fn parse_with_analyzer<P, A>(&self, project: &mut P, analyzer: &A) -> Result<ParsedSchedule>
    where
        P: SourceProject,
        P::Task: Send + Sync,
        A: ScheduleAnalyzer<P> + ?Sized,
    {
        if let Err(err) = analyzer.schedule(project) {
            warn!(error = %err, "schedule analysis failed; using unanalyzed dates");
        }
        self.parse(project)
    }

    fn normalize_all<T>(&self, collected: &[CollectedTask<T>]) -> Vec<TaskRecord>
    where
        T: SourceTask + Send + Sync,
    {
        let config = &self.config;
        if config.parallel {
            collected
                .par_iter()
                .map(|entry| normalize_task(&entry.task, &entry.id, config))
                .collect()
        } else {
            collected
                .iter()
                .map(|entry| normalize_task(&entry.task, &entry.id, config))
                .collect()
        }
    }
}
