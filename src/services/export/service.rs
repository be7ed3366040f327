use crate::{
    db::{SnapshotStore, StoreError},
    models::filters::ReportFilters,
    services::{filters::apply_filters, reports::ReportService},
};

use super::{
    documents::{child_document, parents_document, reports_document, staff_document, ChildProfile},
    render, ExportContext, ExportError, ExportFormat, ExportedFile, SectionInclude,
};

#[derive(Debug, thiserror::Error)]
pub enum ExportServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Child not found: {0}")]
    ChildNotFound(String),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What to export for one school.
#[derive(Debug, Clone)]
pub enum ExportRequest {
    Reports(ReportFilters),
    Child { child_id: String, include: SectionInclude },
    Staff,
    Parents,
}

impl ExportRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ExportRequest::Reports(_) => "reports",
            ExportRequest::Child { .. } => "child",
            ExportRequest::Staff => "staff",
            ExportRequest::Parents => "parents",
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Load the school, shape the requested document and render it.
    pub async fn export(
        store: &SnapshotStore,
        school_id: &str,
        ctx: &ExportContext,
        request: &ExportRequest,
        format: ExportFormat,
    ) -> Result<ExportedFile, ExportServiceError> {
        let snapshot = ReportService::load_snapshot(store, school_id).await?;
        let class_display = |id: Option<&str>| snapshot.class_display(id);

        let doc = match request {
            ExportRequest::Reports(filters) => {
                let rows = snapshot.report_rows(None);
                let filtered = apply_filters(&rows, filters);
                reports_document(ctx, &snapshot.school.name, &filtered, filters, class_display)
            }
            ExportRequest::Child { child_id, include } => {
                let child = snapshot
                    .child(child_id)
                    .ok_or_else(|| ExportServiceError::ChildNotFound(child_id.clone()))?;
                let profile = ChildProfile::from_snapshot(&snapshot, child);
                child_document(ctx, &profile, include, class_display)
            }
            ExportRequest::Staff => {
                staff_document(ctx, &snapshot.school.name, &snapshot.staff, class_display)
            }
            ExportRequest::Parents => parents_document(ctx, &snapshot),
        };

        let file = render(&doc, format)?;
        tracing::info!("School {school_id}: {} export ready as {}", request.kind(), file.filename);
        Ok(file)
    }
}
