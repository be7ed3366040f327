use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    middleware::school::SchoolScope,
    models::classroom::ClassSummary,
    services::reports::ReportService,
    AppState,
};

use super::{store_error, ApiError};

pub async fn list_classes(
    State(state): State<AppState>,
    SchoolScope(school): SchoolScope,
) -> Result<Json<Value>, ApiError> {
    let snapshot = ReportService::load_snapshot(&state.store, &school)
        .await
        .map_err(store_error)?;

    let classes: Vec<ClassSummary> = snapshot
        .classes
        .iter()
        .map(|class| ClassSummary {
            display_name: class.display_name(),
            child_count: snapshot.children_in_class(&class.id),
            class: class.clone(),
        })
        .collect();

    Ok(Json(json!(classes)))
}
