use serde::{Deserialize, Serialize};

/// A resource (person, crew, equipment) assigned to a task.
///
/// Optional fields are present only when the source exposed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAssignment {
    pub resource_name: String,
    /// Source identifier of the resource, empty when the source has none.
    pub resource_id: String,
    /// Assignment units as reported (1.0 = one full-time resource).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    /// Hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_work: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_work: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
}

impl ResourceAssignment {
    pub fn new(resource_name: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_id: resource_id.into(),
            units: None,
            work: None,
            actual_work: None,
            remaining_work: None,
            cost: None,
            actual_cost: None,
            remaining_cost: None,
            start: None,
            finish: None,
        }
    }
}
