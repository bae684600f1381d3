//! Conversions from source value objects into plain output primitives.
//!
//! None of these fail. An absent value or one that cannot be converted yields
//! the documented default for the field it feeds.

use crate::config::NormalizerConfig;
use crate::source::{SourceDate, SourceDuration, SourceNumber, TimeUnit};
use crate::task::RelationType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_DATE: &str = "%Y-%m-%d";

const TEXT_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Numeric value of a source number, `None` if it does not convert.
pub fn number_value(value: &SourceNumber) -> Option<f64> {
    let parsed = match value {
        SourceNumber::Float(v) => Some(*v),
        SourceNumber::Amount { amount } => Some(*amount),
        SourceNumber::Text(text) => {
            let trimmed = text.trim();
            match trimmed.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    debug!(value = trimmed, "numeric field is not a number");
                    None
                }
            }
        }
    };
    parsed.filter(|v| v.is_finite())
}

/// Plain number, 0.0 when missing or unconvertible.
pub fn to_float(value: Option<&SourceNumber>) -> f64 {
    value.and_then(number_value).unwrap_or(0.0)
}

/// Cost amount, 0.0 when missing or unconvertible.
pub fn to_cost(value: Option<&SourceNumber>) -> f64 {
    to_float(value)
}

/// Cost that distinguishes "not exposed" (`None`) from a present value.
/// A present value that cannot be converted still counts as present.
pub fn optional_cost(value: Option<&SourceNumber>) -> Option<f64> {
    value.map(|v| number_value(v).unwrap_or(0.0))
}

pub fn to_iso(value: Option<&SourceDate>) -> Option<String> {
    match value? {
        SourceDate::DateTime(dt) => Some(dt.format(ISO_DATE_TIME).to_string()),
        SourceDate::Date(date) => Some(date.format(ISO_DATE).to_string()),
        SourceDate::Text(text) => parse_text_date(text),
    }
}

fn parse_text_date(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local().format(ISO_DATE_TIME).to_string());
    }
    for format in TEXT_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.format(ISO_DATE_TIME).to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE) {
        return Some(date.format(ISO_DATE).to_string());
    }
    debug!(value = trimmed, "date field is not a recognised date");
    None
}

/// Hours represented by a duration. Days and weeks scale by the configured
/// working day and week; every other unit passes through unchanged.
pub fn duration_hours(duration: &SourceDuration, config: &NormalizerConfig) -> f64 {
    let value = to_float(Some(&duration.value));
    match duration.units {
        TimeUnit::Days => value * config.hours_per_day,
        TimeUnit::Weeks => value * config.hours_per_week(),
        _ => value,
    }
}

/// Hours of an optional duration, 0.0 when the source has none.
pub fn hours_or_zero(duration: Option<&SourceDuration>, config: &NormalizerConfig) -> f64 {
    optional_hours(duration, config).unwrap_or(0.0)
}

/// Hours of an optional duration, keeping absence distinct from zero.
pub fn optional_hours(duration: Option<&SourceDuration>, config: &NormalizerConfig) -> Option<f64> {
    duration.map(|d| duration_hours(d, config))
}

/// Days represented by a duration, used for lag and slack.
pub fn duration_days(duration: Option<&SourceDuration>, config: &NormalizerConfig) -> f64 {
    let Some(duration) = duration else {
        return 0.0;
    };
    let value = to_float(Some(&duration.value));
    match duration.units {
        TimeUnit::Hours => value / config.hours_per_day,
        TimeUnit::Minutes => value / (config.hours_per_day * 60.0),
        TimeUnit::Weeks => value * config.days_per_week,
        _ => value,
    }
}

/// Maps whatever the source calls a dependency type onto FS/SS/FF/SF.
/// Unrecognised or missing types are finish-to-start.
pub fn normalize_relation_type(raw: Option<&str>) -> RelationType {
    let Some(raw) = raw else {
        return RelationType::FinishStart;
    };
    let upper = raw.trim().to_ascii_uppercase();
    let compact = upper.replace('_', "");
    if upper.contains("FINISH_START") || compact == "FS" {
        RelationType::FinishStart
    } else if upper.contains("START_START") || compact == "SS" {
        RelationType::StartStart
    } else if upper.contains("FINISH_FINISH") || compact == "FF" {
        RelationType::FinishFinish
    } else if upper.contains("START_FINISH") || compact == "SF" {
        RelationType::StartFinish
    } else {
        RelationType::FinishStart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NormalizerConfig {
        NormalizerConfig::default()
    }

    #[test]
    fn text_numbers_parse_and_garbage_defaults() {
        assert_eq!(to_float(Some(&SourceNumber::Text(" 12.5 ".into()))), 12.5);
        assert_eq!(to_float(Some(&SourceNumber::Text("n/a".into()))), 0.0);
        assert_eq!(to_float(None), 0.0);
        assert_eq!(to_cost(Some(&SourceNumber::Amount { amount: 99.0 })), 99.0);
    }

    #[test]
    fn optional_cost_keeps_absence_distinct() {
        assert_eq!(optional_cost(None), None);
        assert_eq!(optional_cost(Some(&SourceNumber::Float(0.0))), Some(0.0));
        assert_eq!(optional_cost(Some(&SourceNumber::Text("?".into()))), Some(0.0));
    }

    #[test]
    fn day_and_week_durations_scale_to_hours() {
        let cfg = config();
        assert_eq!(duration_hours(&SourceDuration::new(2.0, TimeUnit::Days), &cfg), 16.0);
        assert_eq!(duration_hours(&SourceDuration::new(1.0, TimeUnit::Weeks), &cfg), 40.0);
        assert_eq!(duration_hours(&SourceDuration::new(90.0, TimeUnit::Minutes), &cfg), 90.0);
        assert_eq!(duration_hours(&SourceDuration::new(3.0, TimeUnit::Hours), &cfg), 3.0);
    }

    #[test]
    fn hours_per_day_is_configurable() {
        let cfg = config().with_hours_per_day(10.0);
        assert_eq!(duration_hours(&SourceDuration::new(1.5, TimeUnit::Days), &cfg), 15.0);
        assert_eq!(duration_hours(&SourceDuration::new(1.0, TimeUnit::Weeks), &cfg), 50.0);
    }

    #[test]
    fn absent_duration_is_none_but_zero_is_zero() {
        let cfg = config();
        assert_eq!(optional_hours(None, &cfg), None);
        let zero = SourceDuration::new(0.0, TimeUnit::Hours);
        assert_eq!(optional_hours(Some(&zero), &cfg), Some(0.0));
        assert_eq!(hours_or_zero(None, &cfg), 0.0);
    }

    #[test]
    fn lag_converts_to_days() {
        let cfg = config();
        let hours = SourceDuration::new(16.0, TimeUnit::Hours);
        assert_eq!(duration_days(Some(&hours), &cfg), 2.0);
        let lead = SourceDuration::new(-1.0, TimeUnit::Weeks);
        assert_eq!(duration_days(Some(&lead), &cfg), -5.0);
        assert_eq!(duration_days(None, &cfg), 0.0);
    }

    #[test]
    fn dates_render_as_iso_strings() {
        let dt = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(
            to_iso(Some(&SourceDate::DateTime(dt))).as_deref(),
            Some("2025-03-04T08:00:00")
        );
        assert_eq!(
            to_iso(Some(&SourceDate::Text("2025-03-04T17:00".into()))).as_deref(),
            Some("2025-03-04T17:00:00")
        );
        assert_eq!(
            to_iso(Some(&SourceDate::Text("2025-03-04".into()))).as_deref(),
            Some("2025-03-04")
        );
        assert_eq!(to_iso(Some(&SourceDate::Text("soon".into()))), None);
        assert_eq!(to_iso(None), None);
    }

    #[test]
    fn relation_types_normalize() {
        assert_eq!(normalize_relation_type(Some("START_START")), RelationType::StartStart);
        assert_eq!(normalize_relation_type(Some("ff")), RelationType::FinishFinish);
        assert_eq!(normalize_relation_type(Some("S_F")), RelationType::StartFinish);
        assert_eq!(normalize_relation_type(Some("FINISH_START")), RelationType::FinishStart);
        assert_eq!(normalize_relation_type(Some("sometimes")), RelationType::FinishStart);
        assert_eq!(normalize_relation_type(None), RelationType::FinishStart);
    }
}
