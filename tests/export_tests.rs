use schedule_normalizer::export::{
    RECORD_COLUMNS, load_parsed_from_json, records_to_dataframe, save_parsed_to_json,
    save_records_to_csv,
};
use schedule_normalizer::{Error, JsonScheduleReader, ParsedSchedule, ScheduleParser, TaskRecord};
use serde_json::json;
use tempfile::NamedTempFile;

fn sample_parsed() -> ParsedSchedule {
    let project = JsonScheduleReader::new()
        .read_value(json!({
            "properties": { "projectTitle": "Export Project" },
            "tasks": [{
                "uniqueId": 10, "name": "Export Project", "outlineLevel": 0,
                "children": [
                    {
                        "uniqueId": 11, "name": "Design", "outlineLevel": 2,
                        "remainingCost": { "amount": 150.5 },
                        "successors": [{ "successorUniqueId": 12, "type": "SS" }]
                    },
                    { "uniqueId": 12, "name": "Build, phase 1", "outlineLevel": 2, "notes": "multi\nline" }
                ]
            }]
        }))
        .unwrap();
    ScheduleParser::default().parse(&&project).unwrap()
}

#[test]
fn json_export_round_trips() {
    let parsed = sample_parsed();
    let tmp = NamedTempFile::new().unwrap();
    save_parsed_to_json(&parsed, tmp.path()).unwrap();

    let loaded = load_parsed_from_json(tmp.path()).unwrap();
    assert_eq!(loaded, parsed);
    assert_eq!(loaded.tasks[1].remaining_cost, Some(150.5));
}

#[test]
fn csv_export_writes_one_row_per_record() {
    let parsed = sample_parsed();
    let tmp = NamedTempFile::new().unwrap();
    save_records_to_csv(&parsed.tasks, tmp.path()).unwrap();

    let mut reader = csv::Reader::from_path(tmp.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), parsed.tasks.len());

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let build = rows.iter().find(|row| &row[0] == "12").unwrap();
    assert_eq!(&build[column("name")], "Build, phase 1");
    assert_eq!(&build[column("comments")], "multi\nline");
    assert_eq!(&build[column("remaining_cost")], "");
    let design = rows.iter().find(|row| &row[0] == "11").unwrap();
    assert!(design[column("successors")].contains("\"SS\""));
}

#[test]
fn exporters_refuse_duplicate_ids() {
    let records = vec![TaskRecord::new("1", "a", 0), TaskRecord::new("1", "b", 0)];
    let tmp = NamedTempFile::new().unwrap();
    let err = save_records_to_csv(&records, tmp.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn dataframe_has_a_row_per_task() {
    let parsed = sample_parsed();
    let df = records_to_dataframe(&parsed.tasks).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), RECORD_COLUMNS.len());
    let successors = df.column("successor_count").unwrap().u32().unwrap();
    assert_eq!(successors.into_iter().flatten().sum::<u32>(), 1);
}
