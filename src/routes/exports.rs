use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    middleware::school::SchoolScope,
    models::filters::ReportFilters,
    services::export::{
        ExportContext, ExportError, ExportFormat, ExportRequest, ExportService, ExportServiceError,
        ExportedFile, SectionInclude,
    },
    AppState,
};

use super::{api_error, reports::checked, store_error, ApiError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    fn parse(&self) -> Result<ExportFormat, ApiError> {
        match self.format.as_deref().filter(|f| !f.trim().is_empty()) {
            None => Ok(ExportFormat::default()),
            Some(f) => f.parse().map_err(|e| api_error(StatusCode::BAD_REQUEST, e)),
        }
    }
}

fn export_error(e: ExportServiceError) -> ApiError {
    match e {
        ExportServiceError::Store(e) => store_error(e),
        ExportServiceError::ChildNotFound(_) => api_error(StatusCode::NOT_FOUND, e),
        ExportServiceError::Export(ExportError::NoSectionsSelected) => {
            api_error(StatusCode::BAD_REQUEST, e)
        }
        ExportServiceError::Export(_) => {
            tracing::error!("Export failed: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

fn download(file: ExportedFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

async fn run(
    state: &AppState,
    school: &str,
    request: ExportRequest,
    format: ExportFormat,
) -> Result<Response, ApiError> {
    let ctx = ExportContext::today(state.config.brand_name.clone());
    ExportService::export(&state.store, school, &ctx, &request, format)
        .await
        .map(download)
        .map_err(export_error)
}

pub async fn export_reports(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(format): Query<FormatQuery>,
    Query(filters): Query<ReportFilters>,
) -> Result<Response, ApiError> {
    let format = format.parse()?;
    checked(&filters)?;
    run(&state, &school, ExportRequest::Reports(filters), format).await
}

/// The body is the section include map, e.g. `{"profile": true, "parents": false}`.
pub async fn export_child(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Path(child_id): Path<String>,
    Query(format): Query<FormatQuery>,
    Json(include): Json<SectionInclude>,
) -> Result<Response, ApiError> {
    let format = format.parse()?;
    run(&state, &school, ExportRequest::Child { child_id, include }, format).await
}

pub async fn export_staff(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(format): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format = format.parse()?;
    run(&state, &school, ExportRequest::Staff, format).await
}

pub async fn export_parents(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(format): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format = format.parse()?;
    run(&state, &school, ExportRequest::Parents, format).await
}
