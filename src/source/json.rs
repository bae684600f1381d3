//! Reader for schedule trees exported as JSON documents.
//!
//! A document looks like
//!
//! ```json
//! {
//!   "properties": { "projectTitle": "Plant", "manager": "R. Ortiz" },
//!   "allTasks": [ { "uniqueId": 1, "name": "Plant", "outlineLevel": 0 } ],
//!   "tasks": [ { "uniqueId": 1, "children": [ { "uniqueId": 2 } ] } ],
//!   "resources": [ { "uniqueId": 7, "name": "Crew A" } ]
//! }
//! ```
//!
//! `allTasks` and `tasks` are both optional and may overlap, the same way
//! real schedule files expose a flat list next to the outline tree.

use super::{
    CostField, DateField, DurationField, FlagField, SourceAssignment, SourceDate, SourceDuration,
    SourceError, SourceNumber, SourceProject, SourceProperties, SourceRelation, SourceResource,
    SourceTask,
};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleDocument {
    #[serde(default)]
    properties: SourceProperties,
    #[serde(default)]
    all_tasks: Option<Vec<TaskDocument>>,
    #[serde(default)]
    tasks: Option<Vec<TaskDocument>>,
    #[serde(default)]
    resources: Vec<SourceResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TaskDocument {
    unique_id: Option<i64>,
    id: Option<i64>,
    outline_number: Option<String>,
    outline_level: Option<i64>,
    name: Option<String>,
    wbs: Option<String>,
    notes: Option<String>,
    parent_unique_id: Option<i64>,

    summary: Option<bool>,
    critical: Option<bool>,
    milestone: Option<bool>,
    estimated: Option<bool>,
    recurring: Option<bool>,
    external: Option<bool>,

    start: Option<SourceDate>,
    finish: Option<SourceDate>,
    baseline_start: Option<SourceDate>,
    baseline_finish: Option<SourceDate>,
    actual_start: Option<SourceDate>,
    actual_finish: Option<SourceDate>,
    constraint_date: Option<SourceDate>,
    deadline: Option<SourceDate>,
    early_start: Option<SourceDate>,
    early_finish: Option<SourceDate>,
    late_start: Option<SourceDate>,
    late_finish: Option<SourceDate>,

    duration: Option<SourceDuration>,
    work: Option<SourceDuration>,
    actual_work: Option<SourceDuration>,
    remaining_work: Option<SourceDuration>,
    baseline_work: Option<SourceDuration>,
    total_slack: Option<SourceDuration>,
    work_variance: Option<SourceDuration>,
    duration_variance: Option<SourceDuration>,

    cost: Option<SourceNumber>,
    fixed_cost: Option<SourceNumber>,
    baseline_cost: Option<SourceNumber>,
    actual_cost: Option<SourceNumber>,
    remaining_cost: Option<SourceNumber>,
    cost_variance: Option<SourceNumber>,
    percent_complete: Option<SourceNumber>,

    children: Vec<TaskDocument>,
    predecessors: Vec<RelationDocument>,
    successors: Vec<RelationDocument>,
    assignments: Vec<AssignmentDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RelationDocument {
    predecessor_unique_id: Option<i64>,
    successor_unique_id: Option<i64>,
    source_unique_id: Option<i64>,
    target_unique_id: Option<i64>,
    #[serde(rename = "type")]
    relation_type: Option<String>,
    lag: Option<SourceDuration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AssignmentDocument {
    resource_unique_id: Option<i64>,
    resource_name: Option<String>,
    units: Option<SourceNumber>,
    work: Option<SourceDuration>,
    actual_work: Option<SourceDuration>,
    remaining_work: Option<SourceDuration>,
    cost: Option<SourceNumber>,
    actual_cost: Option<SourceNumber>,
    remaining_cost: Option<SourceNumber>,
    start: Option<SourceDate>,
    finish: Option<SourceDate>,
}

#[derive(Debug)]
struct TaskNode {
    doc: TaskDocument,
    children: Vec<usize>,
    structural_parent: Option<usize>,
}

/// An in-memory schedule tree read from a JSON document.
#[derive(Debug)]
pub struct JsonProject {
    properties: SourceProperties,
    nodes: Vec<TaskNode>,
    all_tasks: Option<Vec<usize>>,
    top_level: Option<Vec<usize>>,
    by_unique_id: HashMap<i64, usize>,
    parent_by_unique_id: HashMap<i64, usize>,
    children_by_unique_id: HashMap<i64, usize>,
    /// Children declared only through `parentUniqueId`, one entry per uid.
    linked_children: HashMap<i64, Vec<usize>>,
    resources: HashMap<i64, SourceResource>,
}

impl JsonProject {
    fn from_document(document: ScheduleDocument) -> Self {
        let mut project = Self {
            properties: document.properties,
            nodes: Vec::new(),
            all_tasks: None,
            top_level: None,
            by_unique_id: HashMap::new(),
            parent_by_unique_id: HashMap::new(),
            children_by_unique_id: HashMap::new(),
            linked_children: HashMap::new(),
            resources: document
                .resources
                .into_iter()
                .filter_map(|res| res.unique_id.map(|uid| (uid, res)))
                .collect(),
        };

        if let Some(docs) = document.all_tasks {
            let roots = docs
                .into_iter()
                .map(|doc| project.insert(doc, None))
                .collect();
            project.all_tasks = Some(roots);
        }
        if let Some(docs) = document.tasks {
            let roots = docs
                .into_iter()
                .map(|doc| project.insert(doc, None))
                .collect();
            project.top_level = Some(roots);
        }

        debug!(nodes = project.nodes.len(), "json schedule flattened");
        project
    }

    fn insert(&mut self, mut doc: TaskDocument, parent: Option<usize>) -> usize {
        let children = std::mem::take(&mut doc.children);
        let index = self.nodes.len();
        let unique_id = doc.unique_id;
        let declared_parent = doc.parent_unique_id.filter(|&p| Some(p) != unique_id);
        self.nodes.push(TaskNode {
            doc,
            children: Vec::new(),
            structural_parent: parent,
        });

        if let Some(uid) = unique_id {
            self.by_unique_id.entry(uid).or_insert(index);
            if let Some(parent) = parent {
                self.parent_by_unique_id.entry(uid).or_insert(parent);
            }
        }
        if let Some(parent_uid) = declared_parent {
            let siblings = self.linked_children.entry(parent_uid).or_default();
            let seen = unique_id.is_some()
                && siblings
                    .iter()
                    .any(|&other| self.nodes[other].doc.unique_id == unique_id);
            if !seen {
                siblings.push(index);
            }
        }

        let child_indices: Vec<usize> = children
            .into_iter()
            .map(|child| self.insert(child, Some(index)))
            .collect();
        if let (Some(uid), false) = (unique_id, child_indices.is_empty()) {
            self.children_by_unique_id.entry(uid).or_insert(index);
        }
        self.nodes[index].children = child_indices;
        index
    }

    pub fn task_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn task_by_unique_id(&self, unique_id: i64) -> Option<JsonTask<'_>> {
        self.by_unique_id
            .get(&unique_id)
            .map(|&index| JsonTask::new(self, index))
    }

    fn handles(&self, indices: &[usize]) -> Vec<JsonTask<'_>> {
        indices
            .iter()
            .map(|&index| JsonTask::new(self, index))
            .collect()
    }
}

impl<'a> SourceProject for &'a JsonProject {
    type Task = JsonTask<'a>;

    fn properties(&self) -> std::result::Result<SourceProperties, SourceError> {
        Ok(self.properties.clone())
    }

    fn all_tasks(&self) -> std::result::Result<Vec<JsonTask<'a>>, SourceError> {
        let project: &'a JsonProject = *self;
        match &project.all_tasks {
            Some(indices) => Ok(project.handles(indices)),
            None => Err(SourceError::Unsupported("all_tasks")),
        }
    }

    fn top_level_tasks(&self) -> std::result::Result<Vec<JsonTask<'a>>, SourceError> {
        let project: &'a JsonProject = *self;
        match &project.top_level {
            Some(indices) => Ok(project.handles(indices)),
            None => Err(SourceError::Unsupported("top_level_tasks")),
        }
    }
}

/// Caller-owned handle that turns documents into [`JsonProject`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonScheduleReader;

impl JsonScheduleReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_str(&self, content: &str) -> Result<JsonProject> {
        let document: ScheduleDocument = serde_json::from_str(content)
            .map_err(|err| Error::fatal_read(format!("malformed schedule document: {err}")))?;
        Ok(JsonProject::from_document(document))
    }

    pub fn read_slice(&self, bytes: &[u8]) -> Result<JsonProject> {
        let document: ScheduleDocument = serde_json::from_slice(bytes)
            .map_err(|err| Error::fatal_read(format!("malformed schedule document: {err}")))?;
        Ok(JsonProject::from_document(document))
    }

    pub fn read_value(&self, value: serde_json::Value) -> Result<JsonProject> {
        let document: ScheduleDocument = serde_json::from_value(value)
            .map_err(|err| Error::fatal_read(format!("malformed schedule document: {err}")))?;
        Ok(JsonProject::from_document(document))
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<JsonProject> {
        let bytes = fs::read(path)?;
        self.read_slice(&bytes)
    }
}

/// Handle to one task of a [`JsonProject`].
#[derive(Debug, Clone, Copy)]
pub struct JsonTask<'a> {
    project: &'a JsonProject,
    index: usize,
}

impl<'a> JsonTask<'a> {
    fn new(project: &'a JsonProject, index: usize) -> Self {
        Self { project, index }
    }

    fn doc(&self) -> &'a TaskDocument {
        &self.project.nodes[self.index].doc
    }

    fn relations(&self, docs: &'a [RelationDocument], side: RelationSide) -> Vec<JsonRelation<'a>> {
        docs.iter()
            .map(|doc| JsonRelation {
                project: self.project,
                owner: self.index,
                side,
                doc,
            })
            .collect()
    }
}

impl<'a> SourceTask for JsonTask<'a> {
    type Relation = JsonRelation<'a>;
    type Assignment = JsonAssignment<'a>;

    fn unique_id(&self) -> Option<i64> {
        self.doc().unique_id
    }

    fn display_id(&self) -> Option<i64> {
        self.doc().id
    }

    fn outline_number(&self) -> Option<String> {
        self.doc().outline_number.clone()
    }

    fn outline_level(&self) -> Option<i64> {
        self.doc().outline_level
    }

    fn name(&self) -> Option<String> {
        self.doc().name.clone()
    }

    fn wbs(&self) -> Option<String> {
        self.doc().wbs.clone()
    }

    fn notes(&self) -> Option<String> {
        self.doc().notes.clone()
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        let doc = self.doc();
        match field {
            FlagField::Summary => doc.summary.or_else(|| {
                self.children()
                    .ok()
                    .map(|children| !children.is_empty())
            }),
            FlagField::Critical => doc.critical,
            FlagField::Milestone => doc.milestone,
            FlagField::Estimated => doc.estimated,
            FlagField::Recurring => doc.recurring,
            FlagField::External => doc.external,
        }
    }

    fn date(&self, field: DateField) -> Option<SourceDate> {
        let doc = self.doc();
        match field {
            DateField::Start => doc.start.clone(),
            DateField::Finish => doc.finish.clone(),
            DateField::BaselineStart => doc.baseline_start.clone(),
            DateField::BaselineFinish => doc.baseline_finish.clone(),
            DateField::ActualStart => doc.actual_start.clone(),
            DateField::ActualFinish => doc.actual_finish.clone(),
            DateField::ConstraintDate => doc.constraint_date.clone(),
            DateField::Deadline => doc.deadline.clone(),
            DateField::EarlyStart => doc.early_start.clone(),
            DateField::EarlyFinish => doc.early_finish.clone(),
            DateField::LateStart => doc.late_start.clone(),
            DateField::LateFinish => doc.late_finish.clone(),
        }
    }

    fn duration(&self, field: DurationField) -> Option<SourceDuration> {
        let doc = self.doc();
        match field {
            DurationField::Duration => doc.duration.clone(),
            DurationField::Work => doc.work.clone(),
            DurationField::ActualWork => doc.actual_work.clone(),
            DurationField::RemainingWork => doc.remaining_work.clone(),
            DurationField::BaselineWork => doc.baseline_work.clone(),
            DurationField::TotalSlack => doc.total_slack.clone(),
            DurationField::WorkVariance => doc.work_variance.clone(),
            DurationField::DurationVariance => doc.duration_variance.clone(),
        }
    }

    fn cost(&self, field: CostField) -> Option<SourceNumber> {
        let doc = self.doc();
        match field {
            CostField::Cost => doc.cost.clone(),
            CostField::FixedCost => doc.fixed_cost.clone(),
            CostField::BaselineCost => doc.baseline_cost.clone(),
            CostField::ActualCost => doc.actual_cost.clone(),
            CostField::RemainingCost => doc.remaining_cost.clone(),
            CostField::CostVariance => doc.cost_variance.clone(),
        }
    }

    fn percent_complete(&self) -> Option<SourceNumber> {
        self.doc().percent_complete.clone()
    }

    fn parent(&self) -> Option<Self> {
        let node = &self.project.nodes[self.index];
        if let Some(parent_uid) = node.doc.parent_unique_id {
            return self.project.task_by_unique_id(parent_uid);
        }
        if let Some(parent) = node.structural_parent {
            return Some(JsonTask::new(self.project, parent));
        }
        // The flat list usually carries no nesting; borrow it from the tree copy.
        node.doc
            .unique_id
            .and_then(|uid| self.project.parent_by_unique_id.get(&uid))
            .map(|&parent| JsonTask::new(self.project, parent))
    }

    fn children(&self) -> std::result::Result<Vec<Self>, SourceError> {
        let node = &self.project.nodes[self.index];
        if !node.children.is_empty() {
            return Ok(self.project.handles(&node.children));
        }
        let Some(uid) = node.doc.unique_id else {
            return Ok(Vec::new());
        };
        let nested = self
            .project
            .children_by_unique_id
            .get(&uid)
            .filter(|&&other| other != self.index)
            .map(|&other| self.project.handles(&self.project.nodes[other].children));
        if let Some(nested) = nested {
            return Ok(nested);
        }
        // Flat lists link children only through `parentUniqueId`.
        Ok(self
            .project
            .linked_children
            .get(&uid)
            .map(|indices| self.project.handles(indices))
            .unwrap_or_default())
    }

    fn predecessors(&self) -> std::result::Result<Vec<JsonRelation<'a>>, SourceError> {
        Ok(self.relations(&self.doc().predecessors, RelationSide::Predecessors))
    }

    fn successors(&self) -> std::result::Result<Vec<JsonRelation<'a>>, SourceError> {
        Ok(self.relations(&self.doc().successors, RelationSide::Successors))
    }

    fn resource_assignments(&self) -> std::result::Result<Vec<JsonAssignment<'a>>, SourceError> {
        Ok(self
            .doc()
            .assignments
            .iter()
            .map(|doc| JsonAssignment {
                project: self.project,
                doc,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelationSide {
    Predecessors,
    Successors,
}

/// A relation listed on a task. The side a relation is listed under tells
/// which endpoint the owning task is when the document only names the other.
#[derive(Debug, Clone, Copy)]
pub struct JsonRelation<'a> {
    project: &'a JsonProject,
    owner: usize,
    side: RelationSide,
    doc: &'a RelationDocument,
}

impl<'a> JsonRelation<'a> {
    fn endpoint(
        &self,
        explicit: Option<i64>,
        counterpart: Option<i64>,
        owner_side: RelationSide,
    ) -> Option<JsonTask<'a>> {
        match explicit {
            Some(uid) => self.project.task_by_unique_id(uid),
            None if counterpart.is_some() && self.side == owner_side => {
                Some(JsonTask::new(self.project, self.owner))
            }
            None => None,
        }
    }
}

impl<'a> SourceRelation for JsonRelation<'a> {
    type Task = JsonTask<'a>;

    fn predecessor_task(&self) -> Option<JsonTask<'a>> {
        self.endpoint(
            self.doc.predecessor_unique_id,
            self.doc.successor_unique_id,
            RelationSide::Successors,
        )
    }

    fn successor_task(&self) -> Option<JsonTask<'a>> {
        self.endpoint(
            self.doc.successor_unique_id,
            self.doc.predecessor_unique_id,
            RelationSide::Predecessors,
        )
    }

    fn source_task(&self) -> Option<JsonTask<'a>> {
        self.endpoint(
            self.doc.source_unique_id,
            self.doc.target_unique_id,
            RelationSide::Successors,
        )
    }

    fn target_task(&self) -> Option<JsonTask<'a>> {
        self.endpoint(
            self.doc.target_unique_id,
            self.doc.source_unique_id,
            RelationSide::Predecessors,
        )
    }

    fn relation_type(&self) -> Option<String> {
        self.doc.relation_type.clone()
    }

    fn lag(&self) -> Option<SourceDuration> {
        self.doc.lag.clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JsonAssignment<'a> {
    project: &'a JsonProject,
    doc: &'a AssignmentDocument,
}

impl SourceAssignment for JsonAssignment<'_> {
    fn resource(&self) -> Option<SourceResource> {
        let known = self
            .doc
            .resource_unique_id
            .and_then(|uid| self.project.resources.get(&uid));
        match (known, &self.doc.resource_name) {
            (Some(resource), None) => Some(resource.clone()),
            (_, Some(name)) => Some(SourceResource {
                unique_id: self.doc.resource_unique_id,
                name: Some(name.clone()),
            }),
            (None, None) => None,
        }
    }

    fn units(&self) -> Option<SourceNumber> {
        self.doc.units.clone()
    }

    fn work(&self, field: DurationField) -> Option<SourceDuration> {
        match field {
            DurationField::Work => self.doc.work.clone(),
            DurationField::ActualWork => self.doc.actual_work.clone(),
            DurationField::RemainingWork => self.doc.remaining_work.clone(),
            _ => None,
        }
    }

    fn cost(&self, field: CostField) -> Option<SourceNumber> {
        match field {
            CostField::Cost => self.doc.cost.clone(),
            CostField::ActualCost => self.doc.actual_cost.clone(),
            CostField::RemainingCost => self.doc.remaining_cost.clone(),
            _ => None,
        }
    }

    fn start(&self) -> Option<SourceDate> {
        self.doc.start.clone()
    }

    fn finish(&self) -> Option<SourceDate> {
        self.doc.finish.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(value: serde_json::Value) -> JsonProject {
        JsonScheduleReader::new().read_value(value).unwrap()
    }

    #[test]
    fn missing_task_lists_are_unsupported_accessors() {
        let project = read(json!({ "properties": { "projectTitle": "Empty" } }));
        let source = &project;
        assert_eq!(
            source.all_tasks().unwrap_err(),
            SourceError::Unsupported("all_tasks")
        );
        assert!(source.top_level_tasks().is_err());
        assert_eq!(
            source.properties().unwrap().project_title.as_deref(),
            Some("Empty")
        );
    }

    #[test]
    fn nested_children_know_their_parent() {
        let project = read(json!({
            "tasks": [{ "uniqueId": 1, "children": [{ "uniqueId": 2 }] }]
        }));
        let source = &project;
        let top = source.top_level_tasks().unwrap();
        let children = top[0].children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].parent().and_then(|p| p.unique_id()), Some(1));
        assert_eq!(top[0].flag(FlagField::Summary), Some(true));
    }

    #[test]
    fn flat_entries_borrow_structure_from_the_tree_copy() {
        let project = read(json!({
            "allTasks": [{ "uniqueId": 1 }, { "uniqueId": 2 }],
            "tasks": [{ "uniqueId": 1, "children": [{ "uniqueId": 2 }] }]
        }));
        let source = &project;
        let flat = source.all_tasks().unwrap();
        assert_eq!(flat[1].parent().and_then(|p| p.unique_id()), Some(1));
        let children = flat[0].children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].unique_id(), Some(2));
    }

    #[test]
    fn relation_owner_fills_the_unstated_endpoint() {
        let project = read(json!({
            "tasks": [
                { "uniqueId": 1, "name": "Dig" },
                { "uniqueId": 2, "predecessors": [{ "predecessorUniqueId": 1, "type": "SS" }] },
                { "uniqueId": 3, "predecessors": [{ "sourceUniqueId": 1 }] }
            ]
        }));
        let source = &project;
        let tasks = source.top_level_tasks().unwrap();

        let modern = &tasks[1].predecessors().unwrap()[0];
        assert_eq!(modern.predecessor_task().and_then(|t| t.unique_id()), Some(1));
        assert_eq!(modern.successor_task().and_then(|t| t.unique_id()), Some(2));
        assert_eq!(modern.relation_type().as_deref(), Some("SS"));

        let legacy = &tasks[2].predecessors().unwrap()[0];
        assert!(legacy.predecessor_task().is_none());
        assert_eq!(legacy.source_task().and_then(|t| t.unique_id()), Some(1));
        assert_eq!(legacy.target_task().and_then(|t| t.unique_id()), Some(3));
    }

    #[test]
    fn flat_parents_see_children_declared_by_parent_id() {
        let project = read(json!({
            "allTasks": [
                { "uniqueId": 1 },
                { "uniqueId": 2, "parentUniqueId": 1 },
                { "uniqueId": 3, "parentUniqueId": 1 },
                { "uniqueId": 4, "parentUniqueId": 4 }
            ],
            "tasks": [{ "uniqueId": 2, "parentUniqueId": 1 }]
        }));
        let source = &project;
        let tasks = source.all_tasks().unwrap();

        let children: Vec<Option<i64>> = tasks[0]
            .children()
            .unwrap()
            .iter()
            .map(|t| t.unique_id())
            .collect();
        assert_eq!(children, vec![Some(2), Some(3)]);
        assert_eq!(tasks[0].flag(FlagField::Summary), Some(true));
        assert_eq!(tasks[1].flag(FlagField::Summary), Some(false));
        assert!(tasks[3].children().unwrap().is_empty());
    }

    #[test]
    fn malformed_document_is_a_fatal_read() {
        let err = JsonScheduleReader::new()
            .read_str("{ \"tasks\": 12 ")
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn assignment_resolves_resource_table() {
        let project = read(json!({
            "resources": [{ "uniqueId": 7, "name": "Crew A" }],
            "tasks": [{ "uniqueId": 1, "assignments": [{ "resourceUniqueId": 7 }, {}] }]
        }));
        let source = &project;
        let task = source.top_level_tasks().unwrap()[0];
        let assignments = task.resource_assignments().unwrap();
        let resource = assignments[0].resource().unwrap();
        assert_eq!(resource.name.as_deref(), Some("Crew A"));
        assert!(assignments[1].resource().is_none());
    }
}
