use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    middleware::school::SchoolScope,
    models::filters::{blank_as_none, is_calendar_day, ReportFilters},
    services::{days, filters::apply_filters, reports::ReportService},
    AppState,
};

use super::{api_error, store_error, ApiError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaysQuery {
    pub class_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
}

pub(crate) fn checked(filters: &ReportFilters) -> Result<(), ApiError> {
    filters
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

fn class_scope(class_id: &Option<String>) -> Option<&str> {
    class_id.as_deref().filter(|c| !c.trim().is_empty())
}

pub async fn list_reports(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(filters): Query<ReportFilters>,
) -> Result<Json<Value>, ApiError> {
    checked(&filters)?;
    let rows = ReportService::load_rows(&state.store, &school, None)
        .await
        .map_err(store_error)?;
    let filtered = apply_filters(&rows, &filters);
    Ok(Json(json!(filtered)))
}

pub async fn days_with_activity(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Value>, ApiError> {
    let rows = ReportService::load_rows(&state.store, &school, class_scope(&query.class_id))
        .await
        .map_err(store_error)?;
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(state.config.days_with_activity_limit);
    Ok(Json(json!({ "days": days::days_with_activity(&rows, limit) })))
}

pub async fn reports_for_day(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Path(day): Path<String>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Value>, ApiError> {
    if !is_calendar_day(&day) {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("Invalid day: {day} (expected YYYY-MM-DD)")));
    }
    let rows = ReportService::load_rows(&state.store, &school, class_scope(&query.class_id))
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "day": day, "reports": days::reports_for_day(&rows, &day) })))
}

pub async fn summary(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
    Query(filters): Query<ReportFilters>,
) -> Result<Json<Value>, ApiError> {
    checked(&filters)?;
    let rows = ReportService::load_rows(&state.store, &school, None)
        .await
        .map_err(store_error)?;
    let filtered = apply_filters(&rows, &filters);
    Ok(Json(json!({
        "total": filtered.len(),
        "types": days::activity_summary(&filtered),
    })))
}
