//! Gathers every task of a project from all retrieval paths the source offers.
//!
//! Sources expose overlapping views (a flat list and the outline tree), and
//! no single one is complete across file formats, so all of them are walked
//! and the result is deduplicated by stable identifier in first-seen order.

use crate::identity::{resolve_id, row_fallback};
use crate::source::{SourceError, SourceProject, SourceTask};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Descent stops below this depth even if the source keeps yielding children.
pub const MAX_DESCENT_DEPTH: usize = 512;

/// A task handle together with the identifier it was deduplicated under.
#[derive(Debug, Clone)]
pub struct CollectedTask<T> {
    pub id: String,
    pub task: T,
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub tasks: Vec<CollectedTask<T>>,
    /// Candidates gathered before deduplication.
    pub candidate_count: usize,
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub fn collect_tasks<P: SourceProject>(project: &P) -> Collection<P::Task> {
    let mut candidates: Vec<P::Task> = Vec::new();

    gather("all_tasks", project.all_tasks(), &mut candidates);
    gather("top_level_tasks", project.top_level_tasks(), &mut candidates);

    let snapshot = candidates.clone();
    for task in &snapshot {
        let mut path = Vec::new();
        add_descendants(task, &mut path, &mut candidates);
    }

    let candidate_count = candidates.len();
    let tasks = dedup(candidates);
    debug!(
        candidates = candidate_count,
        collected = tasks.len(),
        "task collection finished"
    );
    Collection {
        tasks,
        candidate_count,
    }
}

fn gather<T>(strategy: &str, result: Result<Vec<T>, SourceError>, into: &mut Vec<T>) {
    match result {
        Ok(tasks) => {
            debug!(strategy, count = tasks.len(), "retrieval strategy returned tasks");
            into.extend(tasks);
        }
        Err(SourceError::Unsupported(_)) => {
            debug!(strategy, "retrieval strategy not offered by source");
        }
        Err(err) => {
            warn!(strategy, error = %err, "retrieval strategy failed; using remaining strategies");
        }
    }
}

fn add_descendants<T: SourceTask>(task: &T, path: &mut Vec<String>, into: &mut Vec<T>) {
    if path.len() >= MAX_DESCENT_DEPTH {
        warn!(depth = path.len(), "child descent depth limit reached");
        return;
    }
    let children = match task.children() {
        Ok(children) => children,
        Err(err) => {
            debug!(error = %err, "children unavailable; stopping descent");
            return;
        }
    };
    if children.is_empty() {
        return;
    }

    let own_id = resolve_id(task, "");
    path.push(own_id);
    for child in children {
        let child_id = resolve_id(&child, "");
        if !child_id.is_empty() && path.contains(&child_id) {
            warn!(task_id = %child_id, "task is its own ancestor; not descending again");
            continue;
        }
        into.push(child.clone());
        add_descendants(&child, path, into);
    }
    path.pop();
}

fn dedup<T: SourceTask>(candidates: Vec<T>) -> Vec<CollectedTask<T>> {
    let mut seen = HashSet::with_capacity(candidates.len());
    let mut tasks = Vec::with_capacity(candidates.len());
    for (index, task) in candidates.into_iter().enumerate() {
        let id = resolve_id(&task, &row_fallback(index));
        if seen.insert(id.clone()) {
            tasks.push(CollectedTask { id, task });
        }
    }
    tasks
}
