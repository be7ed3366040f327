use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::report::ReportType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl std::str::FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(anyhow::anyhow!("Unknown sort order: {s} (expected newest or oldest)")),
        }
    }
}

/// Query params shared by GET /reports, /reports/summary and /reports/export.
///
/// `day` and `dateFrom`/`dateTo` are two filtering modes; when `day` is set
/// the range is ignored. Blank strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilters {
    pub class_id: Option<String>,
    /// Calendar day, e.g. "2024-01-05".
    pub day: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(rename = "type", deserialize_with = "blank_as_none")]
    pub report_type: Option<ReportType>,
    pub child_search: Option<String>,
    #[serde(deserialize_with = "blank_as_false")]
    pub has_notes_only: bool,
    pub sort_order: SortOrder,
    /// Zero means unlimited.
    #[serde(deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
}

impl ReportFilters {
    pub fn class_id(&self) -> Option<&str> {
        non_blank(&self.class_id)
    }

    pub fn day(&self) -> Option<&str> {
        non_blank(&self.day)
    }

    pub fn date_from(&self) -> Option<&str> {
        non_blank(&self.date_from)
    }

    pub fn date_to(&self) -> Option<&str> {
        non_blank(&self.date_to)
    }

    pub fn child_search(&self) -> Option<&str> {
        self.child_search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }

    /// Every set date must be a zero-padded `YYYY-MM-DD` calendar day.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("day", self.day()),
            ("dateFrom", self.date_from()),
            ("dateTo", self.date_to()),
        ] {
            if let Some(value) = value {
                if !is_calendar_day(value) {
                    anyhow::bail!("Invalid {name}: {value} (expected YYYY-MM-DD)");
                }
            }
        }
        Ok(())
    }
}

/// `YYYY-MM-DD` with zero padding. Day bounds are compared as strings, so
/// `2024-1-5` is refused even though it names a real date.
pub fn is_calendar_day(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string() == value)
        .unwrap_or(false)
}

/// Query strings send `type=` for an empty select; read it as unset.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn blank_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none::<D, bool>(deserializer)?.unwrap_or(false))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ReportFilters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn blank_values_are_unset() {
        let filters = parse(json!({
            "classId": "",
            "day": " ",
            "type": "",
            "limit": "",
            "hasNotesOnly": ""
        }));
        assert_eq!(filters.class_id(), None);
        assert_eq!(filters.day(), None);
        assert_eq!(filters.report_type, None);
        assert_eq!(filters.limit(), None);
        assert!(!filters.has_notes_only);
    }

    #[test]
    fn query_values_are_parsed() {
        let filters = parse(json!({"type": "nap_time", "limit": "5", "hasNotesOnly": "true"}));
        assert_eq!(filters.report_type, Some(ReportType::NapTime));
        assert_eq!(filters.limit(), Some(5));
        assert!(filters.has_notes_only);

        assert!(serde_json::from_value::<ReportFilters>(json!({"type": "bath_time"})).is_err());
        assert!(serde_json::from_value::<ReportFilters>(json!({"limit": "lots"})).is_err());
    }

    #[test]
    fn dates_must_be_padded_calendar_days() {
        assert!(is_calendar_day("2024-01-05"));
        assert!(!is_calendar_day("2024-1-5"));
        assert!(!is_calendar_day("2024-02-30"));
        assert!(!is_calendar_day("05/01/2024"));

        assert!(parse(json!({"dateFrom": "2024-01-01", "dateTo": "2024-01-31"})).validate().is_ok());
        assert!(parse(json!({"day": ""})).validate().is_ok());
        let err = parse(json!({"dateTo": "2024-1-31"})).validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid dateTo: 2024-1-31 (expected YYYY-MM-DD)");
    }
}
