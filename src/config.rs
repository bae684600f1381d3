use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_HOURS_PER_DAY: &str = "SCHEDULE_NORMALIZER_HOURS_PER_DAY";
pub const ENV_DAYS_PER_WEEK: &str = "SCHEDULE_NORMALIZER_DAYS_PER_WEEK";
pub const ENV_PARALLEL: &str = "SCHEDULE_NORMALIZER_PARALLEL";

/// Tunables for converting source durations and running the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Working hours in one day-unit duration.
    pub hours_per_day: f64,
    /// Working days in one week-unit duration.
    pub days_per_week: f64,
    /// Normalize tasks on the rayon pool instead of sequentially.
    pub parallel: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            days_per_week: 5.0,
            parallel: false,
        }
    }
}

impl NormalizerConfig {
    pub fn hours_per_week(&self) -> f64 {
        self.hours_per_day * self.days_per_week
    }

    pub fn with_hours_per_day(mut self, hours_per_day: f64) -> Self {
        self.hours_per_day = hours_per_day;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads the optional config file, then applies environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        base.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_HOURS_PER_DAY) {
            self.hours_per_day = parse_override(ENV_HOURS_PER_DAY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DAYS_PER_WEEK) {
            self.days_per_week = parse_override(ENV_DAYS_PER_WEEK, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PARALLEL) {
            self.parallel = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(Error::Config(format!(
                        "{ENV_PARALLEL} must be a boolean (got '{other}')"
                    )));
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(Error::Config(format!(
                "hours_per_day must be positive (got {})",
                self.hours_per_day
            )));
        }
        if !self.days_per_week.is_finite() || self.days_per_week <= 0.0 {
            return Err(Error::Config(format!(
                "days_per_week must be positive (got {})",
                self.days_per_week
            )));
        }
        Ok(())
    }
}

fn parse_override(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{key} must be a number (got '{raw}')")))
}
