use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    NappyChange,
    Meal,
    NapTime,
    Medication,
    Incident,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::NappyChange,
        ReportType::Meal,
        ReportType::NapTime,
        ReportType::Medication,
        ReportType::Incident,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::NappyChange => "nappy_change",
            ReportType::Meal => "meal",
            ReportType::NapTime => "nap_time",
            ReportType::Medication => "medication",
            ReportType::Incident => "incident",
        }
    }

    /// Human label used in tables and exported documents.
    pub fn label(self) -> &'static str {
        match self {
            ReportType::NappyChange => "Nappy change",
            ReportType::Meal => "Meal",
            ReportType::NapTime => "Nap time",
            ReportType::Medication => "Medication",
            ReportType::Incident => "Incident",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nappy_change" => Ok(ReportType::NappyChange),
            "meal" => Ok(ReportType::Meal),
            "nap_time" => Ok(ReportType::NapTime),
            "medication" => Ok(ReportType::Medication),
            "incident" => Ok(ReportType::Incident),
            _ => Err(anyhow::anyhow!("Unknown report type: {s}")),
        }
    }
}

/// One child-activity log entry written by a teacher from the mobile app.
/// Read-only for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: String,
    pub child_id: String,
    /// Class the report was filed under, when the document carries one.
    /// Rows expose the resolved class instead.
    #[serde(skip_serializing)]
    pub class_id: Option<String>,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// Canonical UTC form (`2024-01-05T10:00:00.000Z`), or empty when the
    /// stored value could not be read as a date.
    pub timestamp: String,
    pub notes: Option<String>,
    pub meal_option_name: Option<String>,
    pub meal_type: Option<String>,
    pub medication_name: Option<String>,
    pub incident_details: Option<String>,
}

impl DailyReport {
    pub fn new(
        id: impl Into<String>,
        child_id: impl Into<String>,
        report_type: ReportType,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            child_id: child_id.into(),
            class_id: None,
            report_type,
            timestamp: timestamp.into(),
            notes: None,
            meal_option_name: None,
            meal_type: None,
            medication_name: None,
            incident_details: None,
        }
    }

    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// `YYYY-MM-DD` part of the timestamp, if there is one.
    pub fn day(&self) -> Option<&str> {
        self.timestamp.get(..10).filter(|d| d.len() == 10)
    }

    /// `HH:MM` part of the timestamp (UTC).
    pub fn time_of_day(&self) -> Option<&str> {
        self.timestamp.get(11..16)
    }

    /// Type-specific detail text shown next to the report type.
    pub fn details(&self) -> String {
        match self.report_type {
            ReportType::Meal => match (self.meal_type.as_deref(), self.meal_option_name.as_deref()) {
                (Some(kind), Some(option)) => format!("{kind}: {option}"),
                (Some(kind), None) => kind.to_string(),
                (None, Some(option)) => option.to_string(),
                (None, None) => String::new(),
            },
            ReportType::Medication => self.medication_name.clone().unwrap_or_default(),
            ReportType::Incident => self.incident_details.clone().unwrap_or_default(),
            ReportType::NappyChange | ReportType::NapTime => String::new(),
        }
    }
}

impl AsRef<DailyReport> for DailyReport {
    fn as_ref(&self) -> &DailyReport {
        self
    }
}

/// A report joined with the child it belongs to, for tables and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(flatten)]
    pub report: DailyReport,
    pub child_name: String,
    /// The child's class, falling back to the class stored on the report.
    pub class_id: Option<String>,
}

impl AsRef<DailyReport> for ReportRow {
    fn as_ref(&self) -> &DailyReport {
        &self.report
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub count: usize,
    pub latest: Option<String>,
}
