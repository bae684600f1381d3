use crate::error::Result;
use crate::task::TaskRecord;
use polars::prelude::*;

/// Column order of [`records_to_dataframe`].
pub const RECORD_COLUMNS: [&str; 21] = [
    "id",
    "name",
    "outline_level",
    "hierarchy_type",
    "folder",
    "parent_id",
    "is_summary",
    "start_date",
    "end_date",
    "percent_complete",
    "baseline_hours",
    "actual_hours",
    "projected_hours",
    "remaining_hours",
    "baseline_cost",
    "actual_cost",
    "remaining_cost",
    "total_slack",
    "is_critical",
    "predecessor_count",
    "successor_count",
];

fn strings<F>(records: &[TaskRecord], f: F) -> Vec<String>
where
    F: Fn(&TaskRecord) -> String,
{
    records.iter().map(f).collect()
}

fn optional_strings<F>(records: &[TaskRecord], f: F) -> Vec<Option<String>>
where
    F: Fn(&TaskRecord) -> Option<String>,
{
    records.iter().map(f).collect()
}

fn floats<F>(records: &[TaskRecord], f: F) -> Vec<f64>
where
    F: Fn(&TaskRecord) -> f64,
{
    records.iter().map(f).collect()
}

fn optional_floats<F>(records: &[TaskRecord], f: F) -> Vec<Option<f64>>
where
    F: Fn(&TaskRecord) -> Option<f64>,
{
    records.iter().map(f).collect()
}

fn flags<F>(records: &[TaskRecord], f: F) -> Vec<bool>
where
    F: Fn(&TaskRecord) -> bool,
{
    records.iter().map(f).collect()
}

fn counts<F>(records: &[TaskRecord], f: F) -> Vec<u32>
where
    F: Fn(&TaskRecord) -> usize,
{
    records
        .iter()
        .map(|r| u32::try_from(f(r)).unwrap_or(u32::MAX))
        .collect()
}

/// One row per record, dates kept as ISO strings. Unreported remaining work
/// and cost become nulls.
pub fn records_to_dataframe(records: &[TaskRecord]) -> Result<DataFrame> {
    let columns = vec![
        Series::new("id".into(), strings(records, |r| r.id.clone())),
        Series::new("name".into(), strings(records, |r| r.name.clone())),
        Series::new(
            "outline_level".into(),
            counts(records, |r| r.outline_level as usize),
        ),
        Series::new(
            "hierarchy_type".into(),
            strings(records, |r| r.hierarchy_type.as_str().to_string()),
        ),
        Series::new("folder".into(), strings(records, |r| r.folder.clone())),
        Series::new(
            "parent_id".into(),
            optional_strings(records, |r| r.parent_id.clone()),
        ),
        Series::new("is_summary".into(), flags(records, |r| r.is_summary)),
        Series::new(
            "start_date".into(),
            optional_strings(records, |r| r.start_date.clone()),
        ),
        Series::new(
            "end_date".into(),
            optional_strings(records, |r| r.end_date.clone()),
        ),
        Series::new(
            "percent_complete".into(),
            floats(records, |r| r.percent_complete),
        ),
        Series::new("baseline_hours".into(), floats(records, |r| r.baseline_hours)),
        Series::new("actual_hours".into(), floats(records, |r| r.actual_hours)),
        Series::new(
            "projected_hours".into(),
            floats(records, |r| r.projected_hours),
        ),
        Series::new(
            "remaining_hours".into(),
            optional_floats(records, |r| r.remaining_hours),
        ),
        Series::new("baseline_cost".into(), floats(records, |r| r.baseline_cost)),
        Series::new("actual_cost".into(), floats(records, |r| r.actual_cost)),
        Series::new(
            "remaining_cost".into(),
            optional_floats(records, |r| r.remaining_cost),
        ),
        Series::new("total_slack".into(), floats(records, |r| r.total_slack)),
        Series::new("is_critical".into(), flags(records, |r| r.is_critical)),
        Series::new(
            "predecessor_count".into(),
            counts(records, |r| r.predecessors.len()),
        ),
        Series::new(
            "successor_count".into(),
            counts(records, |r| r.successors.len()),
        ),
    ];
    let columns: Vec<Column> = columns.into_iter().map(|series| series.into_column()).collect();
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_record_in_declared_column_order() {
        let mut first = TaskRecord::new("1", "Root", 0);
        first.is_summary = true;
        let mut second = TaskRecord::new("2", "Dig", 4);
        second.parent_id = Some("1".into());
        second.remaining_hours = Some(6.0);

        let df = records_to_dataframe(&[first, second]).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, RECORD_COLUMNS.to_vec());

        let remaining = df.column("remaining_hours").unwrap();
        assert_eq!(remaining.null_count(), 1);
        let parents = df.column("parent_id").unwrap();
        assert_eq!(parents.null_count(), 1);
    }

    #[test]
    fn empty_input_gives_empty_frame() {
        let df = records_to_dataframe(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), RECORD_COLUMNS.len());
    }
}
