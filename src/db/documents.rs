//! Conversion of raw store documents into typed models.
//!
//! Documents come from a schemaless store, so nothing is trusted: every field
//! is read explicitly and a document that lacks what the pipeline needs is
//! rejected here instead of surfacing later as a panic.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::{
    child::{Child, ParentContact},
    classroom::ClassRoom,
    report::{DailyReport, ReportType},
    school::School,
    staff::{StaffMember, StaffRole},
};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: String },
}

type Fields = Map<String, Value>;

fn fields(doc: &Value) -> Result<&Fields, DocumentError> {
    doc.as_object().ok_or(DocumentError::NotAnObject)
}

/// Strings are trimmed; numbers are accepted and rendered; anything blank is `None`.
fn optional_str(doc: &Fields, key: &str) -> Option<String> {
    match doc.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_str(doc: &Fields, key: &'static str) -> Result<String, DocumentError> {
    optional_str(doc, key).ok_or(DocumentError::MissingField(key))
}

/// Free text keeps its inner whitespace; only a missing or non-string value is `None`.
fn optional_text(doc: &Fields, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

fn optional_u32(doc: &Fields, key: &str) -> Option<u32> {
    match doc.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(doc: &Fields, key: &str) -> Vec<String> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn optional_date(doc: &Fields, key: &str) -> Option<NaiveDate> {
    let raw = optional_str(doc, key)?;
    let date_part = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Canonical UTC rendering used for every stored timestamp. A fixed width and
/// a fixed zone make plain string comparison agree with time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a stored timestamp to the canonical form, or empty when it can't be read.
///
/// Accepts RFC 3339 strings with any offset, naive date-times (taken as UTC),
/// bare dates (midnight UTC) and `{seconds, nanoseconds}` objects as written
/// by the document store's native timestamp type.
pub fn normalize_timestamp(value: Option<&Value>) -> String {
    let parsed = match value {
        Some(Value::String(raw)) => parse_timestamp_str(raw.trim()),
        Some(Value::Object(obj)) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64);
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            seconds.and_then(|s| DateTime::from_timestamp(s, nanos))
        }
        _ => None,
    };
    // Only four-digit years keep the canonical form fixed-width.
    parsed
        .filter(|at| (0..=9999).contains(&at.year()))
        .map(format_timestamp)
        .unwrap_or_default()
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl TryFrom<&Value> for DailyReport {
    type Error = DocumentError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        let doc = fields(doc)?;
        let raw_type = required_str(doc, "type")?;
        let report_type = raw_type.parse::<ReportType>().map_err(|_| DocumentError::InvalidValue {
            field: "type",
            value: raw_type.clone(),
        })?;
        Ok(DailyReport {
            id: required_str(doc, "id")?,
            child_id: required_str(doc, "childId")?,
            class_id: optional_str(doc, "classId"),
            report_type,
            timestamp: normalize_timestamp(doc.get("timestamp")),
            notes: optional_text(doc, "notes"),
            meal_option_name: optional_str(doc, "mealOptionName"),
            meal_type: optional_str(doc, "mealType"),
            medication_name: optional_str(doc, "medicationName"),
            incident_details: optional_text(doc, "incidentDetails"),
        })
    }
}

impl TryFrom<&Value> for ClassRoom {
    type Error = DocumentError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        let doc = fields(doc)?;
        let id = required_str(doc, "id")?;
        Ok(ClassRoom {
            name: optional_str(doc, "name").unwrap_or_else(|| id.clone()),
            id,
            min_age_months: optional_u32(doc, "minAgeMonths"),
            max_age_months: optional_u32(doc, "maxAgeMonths"),
            teacher_id: optional_str(doc, "teacherId"),
        })
    }
}

impl TryFrom<&Value> for Child {
    type Error = DocumentError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        let doc = fields(doc)?;
        Ok(Child {
            id: required_str(doc, "id")?,
            first_name: optional_str(doc, "firstName").unwrap_or_default(),
            last_name: optional_str(doc, "lastName").unwrap_or_default(),
            class_id: optional_str(doc, "classId"),
            date_of_birth: optional_date(doc, "dateOfBirth"),
            allergies: optional_str(doc, "allergies"),
            notes: optional_text(doc, "notes"),
            parent_ids: string_list(doc, "parentIds"),
        })
    }
}

impl TryFrom<&Value> for ParentContact {
    type Error = DocumentError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        let doc = fields(doc)?;
        Ok(ParentContact {
            id: required_str(doc, "id")?,
            first_name: optional_str(doc, "firstName").unwrap_or_default(),
            last_name: optional_str(doc, "lastName").unwrap_or_default(),
            email: optional_str(doc, "email"),
            phone: optional_str(doc, "phone"),
            relationship: optional_str(doc, "relationship"),
        })
    }
}

impl TryFrom<&Value> for StaffMember {
    type Error = DocumentError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        let doc = fields(doc)?;
        let raw_role = optional_str(doc, "role").unwrap_or_else(|| "teacher".to_string());
        let role: StaffRole = raw_role
            .trim()
            .to_lowercase()
            .parse()
            .map_err(|_| DocumentError::InvalidValue {
                field: "role",
                value: raw_role.clone(),
            })?;
        Ok(StaffMember {
            id: required_str(doc, "id")?,
            first_name: optional_str(doc, "firstName").unwrap_or_default(),
            last_name: optional_str(doc, "lastName").unwrap_or_default(),
            email: optional_str(doc, "email"),
            role,
            class_ids: string_list(doc, "classIds"),
        })
    }
}

/// The school document is optional; its name falls back to the id.
pub fn school_from_document(id: &str, doc: Option<&Value>) -> School {
    let name = doc
        .and_then(Value::as_object)
        .and_then(|d| optional_str(d, "name"))
        .unwrap_or_else(|| id.to_string());
    School {
        id: id.to_string(),
        name,
    }
}
