use crate::error::{Error, Result};
use crate::parser::ParsedSchedule;
use crate::task::TaskRecord;
use crate::validation::{validate_records, validate_summary};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn save_parsed_to_json<P: AsRef<Path>>(parsed: &ParsedSchedule, path: P) -> Result<()> {
    validate_records(&parsed.tasks)?;
    validate_summary(&parsed.summary)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, parsed)?;
    Ok(())
}

pub fn load_parsed_from_json<P: AsRef<Path>>(path: P) -> Result<ParsedSchedule> {
    let file = File::open(path)?;
    let parsed: ParsedSchedule = serde_json::from_reader(file)?;
    validate_records(&parsed.tasks)?;
    Ok(parsed)
}

/// One flattened CSV row. Link and assignment lists are embedded as JSON.
#[derive(Debug, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    name: String,
    outline_level: u32,
    outline_number: String,
    wbs: String,
    hierarchy_type: String,
    folder: String,
    parent_id: String,
    is_summary: bool,
    start_date: String,
    end_date: String,
    baseline_start_date: String,
    baseline_end_date: String,
    actual_start_date: String,
    actual_end_date: String,
    percent_complete: f64,
    baseline_hours: f64,
    actual_hours: f64,
    projected_hours: f64,
    remaining_hours: String,
    baseline_cost: f64,
    actual_cost: f64,
    remaining_cost: String,
    total_slack: f64,
    is_critical: bool,
    is_milestone: bool,
    assigned_resource: String,
    comments: String,
    predecessors: String,
    successors: String,
    resource_assignments: String,
}

impl TryFrom<&TaskRecord> for TaskCsvRecord {
    type Error = Error;

    fn try_from(record: &TaskRecord) -> Result<Self> {
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            outline_level: record.outline_level,
            outline_number: record.outline_number.clone().unwrap_or_default(),
            wbs: record.wbs.clone().unwrap_or_default(),
            hierarchy_type: record.hierarchy_type.as_str().to_string(),
            folder: record.folder.clone(),
            parent_id: record.parent_id.clone().unwrap_or_default(),
            is_summary: record.is_summary,
            start_date: record.start_date.clone().unwrap_or_default(),
            end_date: record.end_date.clone().unwrap_or_default(),
            baseline_start_date: record.baseline_start_date.clone().unwrap_or_default(),
            baseline_end_date: record.baseline_end_date.clone().unwrap_or_default(),
            actual_start_date: record.actual_start_date.clone().unwrap_or_default(),
            actual_end_date: record.actual_end_date.clone().unwrap_or_default(),
            percent_complete: record.percent_complete,
            baseline_hours: record.baseline_hours,
            actual_hours: record.actual_hours,
            projected_hours: record.projected_hours,
            remaining_hours: format_option_f64(record.remaining_hours),
            baseline_cost: record.baseline_cost,
            actual_cost: record.actual_cost,
            remaining_cost: format_option_f64(record.remaining_cost),
            total_slack: record.total_slack,
            is_critical: record.is_critical,
            is_milestone: record.is_milestone,
            assigned_resource: record.assigned_resource.clone(),
            comments: record.comments.clone(),
            predecessors: serde_json::to_string(&record.predecessors)?,
            successors: serde_json::to_string(&record.successors)?,
            resource_assignments: serde_json::to_string(&record.resource_assignments)?,
        })
    }
}

pub fn write_records_csv<W: Write>(records: &[TaskRecord], out: W) -> Result<()> {
    validate_records(records)?;
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(TaskCsvRecord::try_from(record)?)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_records_to_csv<P: AsRef<Path>>(records: &[TaskRecord], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_records_csv(records, file)
}

// Empty means "not reported", distinct from "0".
fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
