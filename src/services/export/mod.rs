//! Multi-format export: one data-shaping layer, three renderers.
//!
//! Builders in [`documents`] turn models into an [`ExportDocument`]; the
//! renderers ([`delimited`], [`spreadsheet`], [`pdf`]) only lay that document
//! out, so every format carries the same sections, columns and rows.

pub mod delimited;
pub mod documents;
pub mod pdf;
mod service;
pub mod spreadsheet;

pub use service::{ExportRequest, ExportService, ExportServiceError};

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No sections selected for export")]
    NoSectionsSelected,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Pdf(#[from] printpdf::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(anyhow::anyhow!("Unknown export format: {s} (expected csv, xlsx or pdf)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Detail views: child profile, report lists.
    Portrait,
    /// Wide rosters.
    Landscape,
}

/// Recognized section keys of the `include` map.
pub mod sections {
    pub const PROFILE: &str = "profile";
    pub const PARENTS: &str = "parents";
    pub const ACTIVITY_SUMMARY: &str = "activitySummary";
    pub const REPORTS: &str = "reports";
}

/// Section toggles sent by the caller, e.g. `{"profile": true, "parents": false}`.
/// Keys that are absent are enabled; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionInclude(BTreeMap<String, bool>);

impl SectionInclude {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, enabled: bool) -> Self {
        self.0.insert(key.to_string(), enabled);
        self
    }

    pub fn enabled(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(true)
    }
}

/// One independently includable block of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: &'static str,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Section {
    pub fn new(key: &'static str, title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            key,
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Who is exporting and when; shared by every builder.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub brand: String,
    pub exported_on: NaiveDate,
}

impl ExportContext {
    pub fn today(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            exported_on: Utc::now().date_naive(),
        }
    }
}

/// Format-independent shape of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    /// Entity kind used as the filename prefix ("reports", "child", ...).
    pub entity: &'static str,
    /// Display name the filename slug is derived from.
    pub subject: String,
    pub brand: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub metadata: Vec<(String, String)>,
    pub sections: Vec<Section>,
    /// Whether section titles are printed; off for single-table documents.
    pub titled_sections: bool,
    pub orientation: Orientation,
    pub exported_on: NaiveDate,
}

impl ExportDocument {
    pub fn filename(&self, format: ExportFormat) -> String {
        format!(
            "{}-{}-{}.{}",
            self.entity,
            slugify(&self.subject),
            self.exported_on.format("%Y-%m-%d"),
            format.extension()
        )
    }

    pub fn exported_on_label(&self) -> String {
        self.exported_on.format("%Y-%m-%d").to_string()
    }
}

/// Display name → filename slug: whitespace runs become one hyphen,
/// parentheses and path separators are dropped.
pub fn slugify(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '/' | '\\' | ':' | '"'))
        .collect();
    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        "export".to_string()
    } else {
        slug
    }
}

/// A rendered export ready to be downloaded or written to disk.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `doc` in `format`. A document without sections is refused before
/// any renderer runs.
pub fn render(doc: &ExportDocument, format: ExportFormat) -> Result<ExportedFile, ExportError> {
    if doc.sections.is_empty() {
        return Err(ExportError::NoSectionsSelected);
    }
    let bytes = match format {
        ExportFormat::Csv => delimited::render(doc)?,
        ExportFormat::Xlsx => spreadsheet::render(doc)?,
        ExportFormat::Pdf => pdf::render(doc)?,
    };
    let filename = doc.filename(format);
    tracing::info!(
        "Exported {filename} ({} sections, {} rows, {} bytes)",
        doc.sections.len(),
        doc.sections.iter().map(|s| s.rows.len()).sum::<usize>(),
        bytes.len()
    );
    Ok(ExportedFile {
        filename,
        content_type: format.content_type(),
        bytes,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_document(rows: usize) -> ExportDocument {
        let mut section = Section::new(sections::REPORTS, "Reports", &["Date", "Child", "Notes"]);
        for i in 0..rows {
            section.push_row(vec![
                "2024-01-05".into(),
                format!("Child {i}"),
                "a,b\"c".into(),
            ]);
        }
        ExportDocument {
            entity: "reports",
            subject: "Toddlers (12-24 months)".into(),
            brand: "Little Steps".into(),
            title: "Daily reports".into(),
            subtitle: Some("Sunny Days".into()),
            metadata: vec![("School".into(), "Sunny Days".into())],
            sections: vec![section],
            titled_sections: false,
            orientation: Orientation::Portrait,
            exported_on: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        }
    }

    #[test]
    fn slug_drops_parentheses_and_joins_whitespace() {
        assert_eq!(slugify("Toddlers (12-24 months)"), "Toddlers-12-24-months");
        assert_eq!(slugify("  Emma   Smith "), "Emma-Smith");
        assert_eq!(slugify("a/b"), "ab");
        assert_eq!(slugify("()"), "export");
    }

    #[test]
    fn filenames_are_deterministic() {
        let doc = sample_document(1);
        assert_eq!(doc.filename(ExportFormat::Csv), "reports-Toddlers-12-24-months-2024-01-07.csv");
        assert_eq!(doc.filename(ExportFormat::Pdf), "reports-Toddlers-12-24-months-2024-01-07.pdf");
    }

    #[test]
    fn include_defaults_to_enabled() {
        let include: SectionInclude =
            serde_json::from_str(r#"{"profile": false, "somethingElse": false}"#).unwrap();
        assert!(!include.enabled(sections::PROFILE));
        assert!(include.enabled(sections::PARENTS));
        assert!(include.enabled(sections::ACTIVITY_SUMMARY));
        assert!(SectionInclude::all().enabled(sections::PROFILE));
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn empty_document_is_refused_in_every_format() {
        let mut doc = sample_document(0);
        doc.sections.clear();
        for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf] {
            assert!(matches!(render(&doc, format), Err(ExportError::NoSectionsSelected)));
        }
    }

    #[test]
    fn zero_row_document_still_renders() {
        let doc = sample_document(0);
        for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf] {
            let file = render(&doc, format).unwrap();
            assert!(!file.bytes.is_empty());
            assert_eq!(file.content_type, format.content_type());
        }
    }
}
