//! Writers for downstream consumers of a parsed schedule.

pub mod file;
pub mod frame;

pub use file::{load_parsed_from_json, save_parsed_to_json, save_records_to_csv, write_records_csv};
pub use frame::{RECORD_COLUMNS, records_to_dataframe};
