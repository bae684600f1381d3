use crate::extract;
use crate::source::SourceProperties;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_NAME: &str = "Imported Project";

/// Project-wide properties of the parsed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub manager: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_calendar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            manager: String::new(),
            start_date: None,
            end_date: None,
            status_date: None,
            currency: None,
            default_calendar: None,
            author: None,
            company: None,
            keywords: None,
        }
    }
}

impl ProjectInfo {
    pub fn from_properties(props: &SourceProperties) -> Self {
        Self {
            name: non_blank(props.project_title.as_deref())
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            manager: props.manager.clone().unwrap_or_default(),
            start_date: extract::to_iso(props.start_date.as_ref()),
            end_date: extract::to_iso(props.finish_date.as_ref()),
            status_date: extract::to_iso(props.status_date.as_ref()),
            currency: non_blank(props.currency_code.as_deref()),
            default_calendar: non_blank(props.default_calendar_name.as_deref()),
            author: non_blank(props.author.as_deref()),
            company: non_blank(props.company.as_deref()),
            keywords: non_blank(props.keywords.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDate;

    #[test]
    fn missing_title_falls_back_to_default_name() {
        let info = ProjectInfo::from_properties(&SourceProperties::default());
        assert_eq!(info.name, DEFAULT_PROJECT_NAME);
        assert_eq!(info.manager, "");
        assert!(info.start_date.is_none());
    }

    #[test]
    fn copies_optional_properties() {
        let props = SourceProperties {
            project_title: Some("Substation".into()),
            manager: Some("J. Park".into()),
            start_date: Some(SourceDate::Text("2025-02-03T08:00".into())),
            currency_code: Some("EUR".into()),
            company: Some("  ".into()),
            ..SourceProperties::default()
        };
        let info = ProjectInfo::from_properties(&props);
        assert_eq!(info.name, "Substation");
        assert_eq!(info.start_date.as_deref(), Some("2025-02-03T08:00:00"));
        assert_eq!(info.currency.as_deref(), Some("EUR"));
        assert!(info.company.is_none());
    }
}
