use crate::config::NormalizerConfig;
use crate::extract::{
    duration_days, hours_or_zero, normalize_relation_type, optional_cost, optional_hours, to_cost,
    to_float, to_iso,
};
use crate::identity::{resolve_optional_id, resolve_relation_endpoints};
use crate::resource::ResourceAssignment;
use crate::source::{
    CostField, DateField, DurationField, FlagField, SourceAssignment, SourceError, SourceRelation,
    SourceTask,
};
use crate::task::{PredecessorLink, RelationType, SuccessorLink, TaskRecord};
use tracing::{debug, warn};

/// Flattens one source task into a record carrying `id`.
///
/// Hierarchy tier and folder are left at their defaults; they depend on the
/// whole record set and are filled in afterwards.
pub fn normalize_task<T: SourceTask>(task: &T, id: &str, config: &NormalizerConfig) -> TaskRecord {
    let level = task
        .outline_level()
        .map(|level| u32::try_from(level.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0);
    let mut record = TaskRecord::new(id, task.name().unwrap_or_default(), level);

    record.outline_number = task.outline_number();
    record.wbs = task.wbs();
    record.is_summary = flag(task, FlagField::Summary);
    record.parent_id = match resolve_optional_id(task.parent().as_ref()) {
        Some(parent_id) if parent_id == id => {
            warn!(task_id = id, "task names itself as parent; treating as root");
            None
        }
        other => other,
    };

    let date = |field: DateField| to_iso(task.date(field).as_ref());
    record.start_date = date(DateField::Start);
    record.end_date = date(DateField::Finish);
    record.baseline_start_date = date(DateField::BaselineStart);
    record.baseline_end_date = date(DateField::BaselineFinish);
    record.actual_start_date = date(DateField::ActualStart);
    record.actual_end_date = date(DateField::ActualFinish);
    record.constraint_date = date(DateField::ConstraintDate);
    record.deadline = date(DateField::Deadline);
    record.early_start = date(DateField::EarlyStart);
    record.early_finish = date(DateField::EarlyFinish);
    record.late_start = date(DateField::LateStart);
    record.late_finish = date(DateField::LateFinish);

    let duration = |field: DurationField| task.duration(field);
    record.percent_complete = to_float(task.percent_complete().as_ref());
    record.duration_hours = optional_hours(duration(DurationField::Duration).as_ref(), config);
    record.baseline_hours = hours_or_zero(duration(DurationField::BaselineWork).as_ref(), config);
    record.actual_hours = hours_or_zero(duration(DurationField::ActualWork).as_ref(), config);
    record.projected_hours = hours_or_zero(duration(DurationField::Work).as_ref(), config);
    record.remaining_hours = optional_hours(duration(DurationField::RemainingWork).as_ref(), config);
    record.work_variance = optional_hours(duration(DurationField::WorkVariance).as_ref(), config);
    record.duration_variance =
        optional_hours(duration(DurationField::DurationVariance).as_ref(), config);
    record.total_slack = duration_days(duration(DurationField::TotalSlack).as_ref(), config);

    let cost = |field: CostField| task.cost(field);
    record.baseline_cost = to_cost(cost(CostField::BaselineCost).as_ref());
    record.actual_cost = to_cost(cost(CostField::ActualCost).as_ref());
    record.remaining_cost = optional_cost(cost(CostField::RemainingCost).as_ref());
    record.cost = optional_cost(cost(CostField::Cost).as_ref());
    record.fixed_cost = optional_cost(cost(CostField::FixedCost).as_ref());
    record.cost_variance = optional_cost(cost(CostField::CostVariance).as_ref());

    record.is_critical = flag(task, FlagField::Critical);
    record.is_milestone = flag(task, FlagField::Milestone);
    record.is_estimated = flag(task, FlagField::Estimated);
    record.is_recurring = flag(task, FlagField::Recurring);
    record.is_external = flag(task, FlagField::External);

    record.resource_assignments = resource_assignments(task, id, config);
    record.assigned_resource = record
        .resource_assignments
        .iter()
        .map(|a| a.resource_name.as_str())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    record.comments = task.notes().unwrap_or_default();

    record.predecessors = relations(task.predecessors(), id, "predecessors", |relation| {
        let (predecessor, _) = resolve_relation_endpoints(relation);
        let link = linked_task(predecessor.as_ref(), relation, config)?;
        Some(PredecessorLink {
            predecessor_task_id: link.id,
            predecessor_name: link.name,
            relationship: link.relationship,
            lag_days: link.lag_days,
            is_external: link.is_external,
        })
    });
    record.successors = relations(task.successors(), id, "successors", |relation| {
        let (_, successor) = resolve_relation_endpoints(relation);
        let link = linked_task(successor.as_ref(), relation, config)?;
        Some(SuccessorLink {
            successor_task_id: link.id,
            successor_name: link.name,
            relationship: link.relationship,
            lag_days: link.lag_days,
            is_external: link.is_external,
        })
    });

    record
}

fn flag<T: SourceTask>(task: &T, field: FlagField) -> bool {
    task.flag(field).unwrap_or(false)
}

struct LinkedTask {
    id: String,
    name: String,
    relationship: RelationType,
    lag_days: f64,
    is_external: bool,
}

fn linked_task<T, R>(other: Option<&T>, relation: &R, config: &NormalizerConfig) -> Option<LinkedTask>
where
    T: SourceTask,
    R: SourceRelation<Task = T>,
{
    let other = other?;
    let id = resolve_optional_id(Some(other))?;
    Some(LinkedTask {
        id,
        name: other.name().unwrap_or_default(),
        relationship: normalize_relation_type(relation.relation_type().as_deref()),
        lag_days: duration_days(relation.lag().as_ref(), config),
        is_external: other.flag(FlagField::External).unwrap_or(false),
    })
}

fn relations<R, L, F>(
    source: Result<Vec<R>, SourceError>,
    task_id: &str,
    kind: &'static str,
    mut build: F,
) -> Vec<L>
where
    F: FnMut(&R) -> Option<L>,
{
    let relations = match source {
        Ok(relations) => relations,
        Err(SourceError::Unsupported(_)) => return Vec::new(),
        Err(err) => {
            warn!(task_id, kind, error = %err, "relation list unavailable");
            return Vec::new();
        }
    };
    let mut links = Vec::with_capacity(relations.len());
    for (position, relation) in relations.iter().enumerate() {
        match build(relation) {
            Some(link) => links.push(link),
            None => warn!(
                task_id,
                kind,
                position,
                "skipping relation whose linked task cannot be resolved"
            ),
        }
    }
    links
}

fn resource_assignments<T: SourceTask>(
    task: &T,
    task_id: &str,
    config: &NormalizerConfig,
) -> Vec<ResourceAssignment> {
    let assignments = match task.resource_assignments() {
        Ok(assignments) => assignments,
        Err(SourceError::Unsupported(_)) => return Vec::new(),
        Err(err) => {
            debug!(task_id, error = %err, "resource assignments unavailable");
            return Vec::new();
        }
    };

    assignments
        .iter()
        .filter_map(|assignment| {
            let resource = assignment.resource()?;
            let mut record = ResourceAssignment::new(
                resource.name.unwrap_or_default(),
                resource
                    .unique_id
                    .map(|uid| uid.to_string())
                    .unwrap_or_default(),
            );
            record.units = optional_cost(assignment.units().as_ref());
            record.work = optional_hours(assignment.work(DurationField::Work).as_ref(), config);
            record.actual_work =
                optional_hours(assignment.work(DurationField::ActualWork).as_ref(), config);
            record.remaining_work =
                optional_hours(assignment.work(DurationField::RemainingWork).as_ref(), config);
            record.cost = optional_cost(assignment.cost(CostField::Cost).as_ref());
            record.actual_cost = optional_cost(assignment.cost(CostField::ActualCost).as_ref());
            record.remaining_cost =
                optional_cost(assignment.cost(CostField::RemainingCost).as_ref());
            record.start = to_iso(assignment.start().as_ref());
            record.finish = to_iso(assignment.finish().as_ref());
            Some(record)
        })
        .collect()
}
