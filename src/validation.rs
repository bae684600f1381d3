use crate::error::Error;
use crate::summary::SummaryStats;
use crate::task::TaskRecord;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValidationError {
    message: String,
}

impl RecordValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RecordValidationError {}

impl From<RecordValidationError> for Error {
    fn from(err: RecordValidationError) -> Self {
        Error::InvalidData(err.message)
    }
}

fn check_finite(record: &TaskRecord, field: &str, value: f64) -> Result<(), RecordValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RecordValidationError::new(format!(
            "task {} has non-finite {field} {value}",
            record.id
        )))
    }
}

pub fn validate_record(record: &TaskRecord) -> Result<(), RecordValidationError> {
    if record.id.trim().is_empty() {
        return Err(RecordValidationError::new(format!(
            "task '{}' has an empty id",
            record.name
        )));
    }

    if record.parent_id.as_deref() == Some(record.id.as_str()) {
        return Err(RecordValidationError::new(format!(
            "task {} names itself as parent",
            record.id
        )));
    }

    check_finite(record, "percentComplete", record.percent_complete)?;
    check_finite(record, "baselineHours", record.baseline_hours)?;
    check_finite(record, "actualHours", record.actual_hours)?;
    check_finite(record, "projectedHours", record.projected_hours)?;
    check_finite(record, "baselineCost", record.baseline_cost)?;
    check_finite(record, "actualCost", record.actual_cost)?;
    check_finite(record, "totalSlack", record.total_slack)?;
    if let Some(hours) = record.remaining_hours {
        check_finite(record, "remainingHours", hours)?;
    }
    if let Some(cost) = record.remaining_cost {
        check_finite(record, "remainingCost", cost)?;
    }

    for link in &record.predecessors {
        if link.predecessor_task_id.is_empty() {
            return Err(RecordValidationError::new(format!(
                "task {} has a predecessor link without a task id",
                record.id
            )));
        }
    }
    for link in &record.successors {
        if link.successor_task_id.is_empty() {
            return Err(RecordValidationError::new(format!(
                "task {} has a successor link without a task id",
                record.id
            )));
        }
    }

    Ok(())
}

pub fn validate_records(records: &[TaskRecord]) -> Result<(), RecordValidationError> {
    let mut seen_ids = HashSet::with_capacity(records.len());
    for record in records {
        validate_record(record)?;
        if !seen_ids.insert(record.id.as_str()) {
            return Err(RecordValidationError::new(format!(
                "duplicate task id {}",
                record.id
            )));
        }
    }
    Ok(())
}

pub fn validate_summary(summary: &SummaryStats) -> Result<(), RecordValidationError> {
    let coverage = summary.dependencies.coverage_percent;
    if !(0.0..=100.0).contains(&coverage) {
        return Err(RecordValidationError::new(format!(
            "coverage {coverage} is outside 0-100"
        )));
    }
    let deps = &summary.dependencies;
    if deps.linked_leaf_tasks + deps.isolated_leaf_tasks != deps.total_leaf_tasks {
        return Err(RecordValidationError::new(format!(
            "leaf counts do not add up: {} linked + {} isolated != {}",
            deps.linked_leaf_tasks, deps.isolated_leaf_tasks, deps.total_leaf_tasks
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{CollectionStats, summarize};

    #[test]
    fn accepts_well_formed_records() {
        let mut child = TaskRecord::new("2", "Child", 2);
        child.parent_id = Some("1".into());
        let records = vec![TaskRecord::new("1", "Root", 0), child];
        assert!(validate_records(&records).is_ok());
        let summary = summarize(&records, CollectionStats::default());
        assert!(validate_summary(&summary).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = vec![TaskRecord::new("1", "a", 0), TaskRecord::new("1", "b", 0)];
        let err = validate_records(&records).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 1"));
    }

    #[test]
    fn rejects_self_parent_and_blank_id() {
        let mut looped = TaskRecord::new("5", "Loop", 1);
        looped.parent_id = Some("5".into());
        assert!(validate_record(&looped).is_err());
        assert!(validate_record(&TaskRecord::new(" ", "Blank", 1)).is_err());
    }

    #[test]
    fn rejects_non_finite_numbers_and_maps_to_invalid_data() {
        let mut record = TaskRecord::new("1", "NaN", 3);
        record.actual_hours = f64::NAN;
        let err: Error = validate_record(&record).unwrap_err().into();
        assert!(matches!(err, Error::InvalidData(message) if message.contains("actualHours")));
    }

    #[test]
    fn rejects_out_of_range_coverage() {
        let mut summary = SummaryStats::default();
        summary.dependencies.coverage_percent = 100.5;
        assert!(validate_summary(&summary).is_err());
    }
}
