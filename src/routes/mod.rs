pub mod classes;
pub mod exports;
pub mod health;
pub mod reports;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{db::StoreError, AppState};

pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

pub(crate) fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::InvalidSchool(_) => api_error(StatusCode::BAD_REQUEST, e),
        StoreError::SchoolNotFound(_) => api_error(StatusCode::NOT_FOUND, e),
        _ => {
            tracing::error!("Snapshot store error: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/classes", get(classes::list_classes))
        // Reports
        .route("/reports", get(reports::list_reports))
        .route("/reports/days", get(reports::days_with_activity))
        .route("/reports/days/{day}", get(reports::reports_for_day))
        .route("/reports/summary", get(reports::summary))
        // Exports
        .route("/reports/export", get(exports::export_reports))
        .route("/children/{id}/export", post(exports::export_child))
        .route("/staff/export", get(exports::export_staff))
        .route("/parents/export", get(exports::export_parents))
        .with_state(state)
}
