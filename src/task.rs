use crate::resource::ResourceAssignment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic tier of a record in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyType {
    Project,
    Unit,
    Phase,
    #[default]
    Task,
    SubTask,
}

impl HierarchyType {
    pub const ALL: [HierarchyType; 5] = [
        HierarchyType::Project,
        HierarchyType::Unit,
        HierarchyType::Phase,
        HierarchyType::Task,
        HierarchyType::SubTask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyType::Project => "project",
            HierarchyType::Unit => "unit",
            HierarchyType::Phase => "phase",
            HierarchyType::Task => "task",
            HierarchyType::SubTask => "sub_task",
        }
    }
}

impl fmt::Display for HierarchyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationType {
    #[default]
    #[serde(rename = "FS")]
    FinishStart,
    #[serde(rename = "SS")]
    StartStart,
    #[serde(rename = "FF")]
    FinishFinish,
    #[serde(rename = "SF")]
    StartFinish,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::FinishStart => "FS",
            RelationType::StartStart => "SS",
            RelationType::FinishFinish => "FF",
            RelationType::StartFinish => "SF",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredecessorLink {
    pub predecessor_task_id: String,
    pub predecessor_name: String,
    pub relationship: RelationType,
    /// Negative values are leads.
    pub lag_days: f64,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessorLink {
    pub successor_task_id: String,
    pub successor_name: String,
    pub relationship: RelationType,
    pub lag_days: f64,
    pub is_external: bool,
}

/// One normalized row per schedule task.
///
/// Parents are referenced by id only. Effort is in hours; `None` on the
/// remaining-work and remaining-cost fields means the source did not expose
/// them, which is different from a reported zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub outline_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,
    pub is_summary: bool,
    pub parent_id: Option<String>,
    pub hierarchy_type: HierarchyType,
    pub folder: String,

    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub baseline_start_date: Option<String>,
    pub baseline_end_date: Option<String>,
    pub actual_start_date: Option<String>,
    pub actual_end_date: Option<String>,
    pub constraint_date: Option<String>,
    pub deadline: Option<String>,
    pub early_start: Option<String>,
    pub early_finish: Option<String>,
    pub late_start: Option<String>,
    pub late_finish: Option<String>,

    pub percent_complete: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    pub baseline_hours: f64,
    pub actual_hours: f64,
    pub projected_hours: f64,
    pub remaining_hours: Option<f64>,

    pub baseline_cost: f64,
    pub actual_cost: f64,
    pub remaining_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_variance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_variance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_variance: Option<f64>,
    /// Total slack in days.
    pub total_slack: f64,

    pub is_critical: bool,
    pub is_milestone: bool,
    pub is_estimated: bool,
    pub is_recurring: bool,
    pub is_external: bool,

    pub assigned_resource: String,
    pub resource_assignments: Vec<ResourceAssignment>,
    pub comments: String,
    pub predecessors: Vec<PredecessorLink>,
    pub successors: Vec<SuccessorLink>,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, outline_level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            outline_level,
            outline_number: None,
            wbs: None,
            is_summary: false,
            parent_id: None,
            hierarchy_type: HierarchyType::default(),
            folder: String::new(),
            start_date: None,
            end_date: None,
            baseline_start_date: None,
            baseline_end_date: None,
            actual_start_date: None,
            actual_end_date: None,
            constraint_date: None,
            deadline: None,
            early_start: None,
            early_finish: None,
            late_start: None,
            late_finish: None,
            percent_complete: 0.0,
            duration_hours: None,
            baseline_hours: 0.0,
            actual_hours: 0.0,
            projected_hours: 0.0,
            remaining_hours: None,
            baseline_cost: 0.0,
            actual_cost: 0.0,
            remaining_cost: None,
            cost: None,
            fixed_cost: None,
            cost_variance: None,
            work_variance: None,
            duration_variance: None,
            total_slack: 0.0,
            is_critical: false,
            is_milestone: false,
            is_estimated: false,
            is_recurring: false,
            is_external: false,
            assigned_resource: String::new(),
            resource_assignments: Vec::new(),
            comments: String::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_summary
    }

    pub fn has_links(&self) -> bool {
        !self.predecessors.is_empty() || !self.successors.is_empty()
    }
}
