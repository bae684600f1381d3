//! Capability interface over an already-read schedule.
//!
//! The reader that produces the project tree lives outside this crate; all the
//! normalizer needs is the narrow set of accessors below. Every field accessor
//! returns an `Option` so that "not exposed by this source" is a value rather
//! than an error. Only the retrieval accessors that walk the tree report
//! failures, because the collector needs to know which strategy broke.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod json;

pub use json::{JsonProject, JsonScheduleReader, JsonTask};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source does not expose this accessor at all.
    #[error("accessor '{0}' is not available")]
    Unsupported(&'static str),
    #[error("accessor '{accessor}' failed: {message}")]
    Failed {
        accessor: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn failed(accessor: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            accessor,
            message: message.into(),
        }
    }
}

/// A numeric value as the source exposes it: a plain number, a cost object
/// carrying an amount, or text that may or may not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceNumber {
    Float(f64),
    Amount { amount: f64 },
    Text(String),
}

impl From<f64> for SourceNumber {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
    ElapsedMinutes,
    ElapsedHours,
    ElapsedDays,
    ElapsedWeeks,
    Percent,
    #[default]
    Unknown,
}

impl TimeUnit {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "min" | "mins" | "minute" | "minutes" => TimeUnit::Minutes,
            "h" | "hr" | "hrs" | "hour" | "hours" => TimeUnit::Hours,
            "d" | "day" | "days" => TimeUnit::Days,
            "w" | "wk" | "wks" | "week" | "weeks" => TimeUnit::Weeks,
            "mo" | "mon" | "month" | "months" => TimeUnit::Months,
            "y" | "yr" | "year" | "years" => TimeUnit::Years,
            "em" | "elapsed_minutes" => TimeUnit::ElapsedMinutes,
            "eh" | "elapsed_hours" => TimeUnit::ElapsedHours,
            "ed" | "elapsed_days" => TimeUnit::ElapsedDays,
            "ew" | "elapsed_weeks" => TimeUnit::ElapsedWeeks,
            "%" | "percent" => TimeUnit::Percent,
            _ => TimeUnit::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
            TimeUnit::Weeks => "w",
            TimeUnit::Months => "mo",
            TimeUnit::Years => "y",
            TimeUnit::ElapsedMinutes => "em",
            TimeUnit::ElapsedHours => "eh",
            TimeUnit::ElapsedDays => "ed",
            TimeUnit::ElapsedWeeks => "ew",
            TimeUnit::Percent => "%",
            TimeUnit::Unknown => "",
        }
    }
}

impl From<String> for TimeUnit {
    fn from(value: String) -> Self {
        TimeUnit::parse(&value)
    }
}

impl From<TimeUnit> for String {
    fn from(value: TimeUnit) -> Self {
        value.as_str().to_string()
    }
}

/// A duration object: an amount and the unit it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDuration {
    #[serde(rename = "duration")]
    pub value: SourceNumber,
    #[serde(default)]
    pub units: TimeUnit,
}

impl SourceDuration {
    pub fn new(value: f64, units: TimeUnit) -> Self {
        Self {
            value: SourceNumber::Float(value),
            units,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceDate {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    Finish,
    BaselineStart,
    BaselineFinish,
    ActualStart,
    ActualFinish,
    ConstraintDate,
    Deadline,
    EarlyStart,
    EarlyFinish,
    LateStart,
    LateFinish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationField {
    Duration,
    Work,
    ActualWork,
    RemainingWork,
    BaselineWork,
    TotalSlack,
    WorkVariance,
    DurationVariance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostField {
    Cost,
    FixedCost,
    BaselineCost,
    ActualCost,
    RemainingCost,
    CostVariance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    Summary,
    Critical,
    Milestone,
    Estimated,
    Recurring,
    External,
}

/// Project-wide properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceProperties {
    pub project_title: Option<String>,
    pub manager: Option<String>,
    pub start_date: Option<SourceDate>,
    pub finish_date: Option<SourceDate>,
    pub status_date: Option<SourceDate>,
    pub currency_code: Option<String>,
    pub default_calendar_name: Option<String>,
    pub author: Option<String>,
    pub company: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceResource {
    pub unique_id: Option<i64>,
    pub name: Option<String>,
}

pub trait SourceProject {
    type Task: SourceTask;

    /// Project-wide properties. Failing here means the tree cannot be read.
    fn properties(&self) -> Result<SourceProperties, SourceError>;

    /// Flat list of every task in the file.
    fn all_tasks(&self) -> Result<Vec<Self::Task>, SourceError> {
        Err(SourceError::Unsupported("all_tasks"))
    }

    /// Top-level entries of the outline tree.
    fn top_level_tasks(&self) -> Result<Vec<Self::Task>, SourceError> {
        Err(SourceError::Unsupported("top_level_tasks"))
    }
}

pub trait SourceTask: Clone {
    type Relation: SourceRelation<Task = Self>;
    type Assignment: SourceAssignment;

    fn unique_id(&self) -> Option<i64> {
        None
    }

    fn display_id(&self) -> Option<i64> {
        None
    }

    fn outline_number(&self) -> Option<String> {
        None
    }

    fn outline_level(&self) -> Option<i64> {
        None
    }

    fn name(&self) -> Option<String> {
        None
    }

    fn wbs(&self) -> Option<String> {
        None
    }

    fn notes(&self) -> Option<String> {
        None
    }

    fn flag(&self, _field: FlagField) -> Option<bool> {
        None
    }

    fn date(&self, _field: DateField) -> Option<SourceDate> {
        None
    }

    fn duration(&self, _field: DurationField) -> Option<SourceDuration> {
        None
    }

    fn cost(&self, _field: CostField) -> Option<SourceNumber> {
        None
    }

    fn percent_complete(&self) -> Option<SourceNumber> {
        None
    }

    fn parent(&self) -> Option<Self> {
        None
    }

    fn children(&self) -> Result<Vec<Self>, SourceError> {
        Err(SourceError::Unsupported("children"))
    }

    fn predecessors(&self) -> Result<Vec<Self::Relation>, SourceError> {
        Err(SourceError::Unsupported("predecessors"))
    }

    fn successors(&self) -> Result<Vec<Self::Relation>, SourceError> {
        Err(SourceError::Unsupported("successors"))
    }

    fn resource_assignments(&self) -> Result<Vec<Self::Assignment>, SourceError> {
        Err(SourceError::Unsupported("resource_assignments"))
    }
}

/// A dependency between two tasks.
///
/// Sources disagree on how endpoints are exposed: newer ones name them
/// predecessor/successor, older ones source/target. Either pair may be absent.
pub trait SourceRelation {
    type Task;

    fn predecessor_task(&self) -> Option<Self::Task> {
        None
    }

    fn successor_task(&self) -> Option<Self::Task> {
        None
    }

    fn source_task(&self) -> Option<Self::Task> {
        None
    }

    fn target_task(&self) -> Option<Self::Task> {
        None
    }

    fn relation_type(&self) -> Option<String> {
        None
    }

    fn lag(&self) -> Option<SourceDuration> {
        None
    }
}

pub trait SourceAssignment {
    fn resource(&self) -> Option<SourceResource>;

    fn units(&self) -> Option<SourceNumber> {
        None
    }

    /// Work, actual work or remaining work of the assignment.
    fn work(&self, _field: DurationField) -> Option<SourceDuration> {
        None
    }

    /// Cost, actual cost or remaining cost of the assignment.
    fn cost(&self, _field: CostField) -> Option<SourceNumber> {
        None
    }

    fn start(&self) -> Option<SourceDate> {
        None
    }

    fn finish(&self) -> Option<SourceDate> {
        None
    }
}

/// Hook for the external critical-path analyzer that may fill in early/late
/// dates and slack before normalization.
pub trait ScheduleAnalyzer<P: SourceProject> {
    fn schedule(&self, project: &mut P) -> Result<(), SourceError>;
}
