//! Assigns a semantic tier to every record from its outline depth.
//!
//! Depth 0-1 is the project, 2 a unit, 3 a phase, anything deeper a task. The
//! deepest level becomes `sub_task` only when the outline is at least five
//! levels deep, otherwise it would just rename ordinary tasks.

use crate::task::{HierarchyType, TaskRecord};
use tracing::debug;

/// Outline depth at which the unit tier starts.
pub const UNIT_ANCHOR: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlineRange {
    pub min: u32,
    pub max: u32,
}

impl OutlineRange {
    pub fn of(records: &[TaskRecord]) -> Self {
        let mut levels = records.iter().map(|r| r.outline_level);
        let Some(first) = levels.next() else {
            return Self::default();
        };
        levels.fold(Self { min: first, max: first }, |range, level| Self {
            min: range.min.min(level),
            max: range.max.max(level),
        })
    }
}

/// Tier for a single depth given the deepest depth of the schedule.
pub fn tier_for_depth(depth: u32, max_outline: u32) -> HierarchyType {
    if depth <= 1 {
        HierarchyType::Project
    } else if depth == UNIT_ANCHOR {
        HierarchyType::Unit
    } else if depth == UNIT_ANCHOR + 1 {
        HierarchyType::Phase
    } else if depth == max_outline && max_outline >= UNIT_ANCHOR + 3 {
        HierarchyType::SubTask
    } else {
        HierarchyType::Task
    }
}

pub fn classify(records: &mut [TaskRecord]) -> OutlineRange {
    let range = OutlineRange::of(records);
    debug!(min = range.min, max = range.max, "classifying outline");

    for record in records.iter_mut() {
        record.hierarchy_type = tier_for_depth(record.outline_level, range.max);
        let is_root = record.is_summary || record.parent_id.is_none();
        if record.outline_level <= 1 && is_root {
            record.hierarchy_type = HierarchyType::Project;
        }
    }
    range
}
