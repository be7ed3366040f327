use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::{db::is_valid_school_id, AppState};

pub const SCHOOL_HEADER: &str = "X-School";

/// School scope of a request, taken from the `X-School` header.
/// The id must be a valid slug and name a school present in the store.
#[derive(Debug, Clone)]
pub struct SchoolScope(pub String);

impl FromRequestParts<AppState> for SchoolScope {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let school = extract_school(parts)?;

        match state.store.school_exists(&school).await {
            Ok(true) => Ok(SchoolScope(school)),
            Ok(false) => Err((StatusCode::NOT_FOUND, Json(json!({ "error": "School not found" })))),
            Err(e) => {
                tracing::warn!("School lookup failed for {school}: {e}");
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Store error" }))))
            }
        }
    }
}

fn extract_school(parts: &Parts) -> Result<String, (StatusCode, Json<Value>)> {
    let school = parts
        .headers
        .get(SCHOOL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing X-School header" }))))?;

    if !is_valid_school_id(&school) {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid school identifier" }))));
    }
    Ok(school)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/reports");
        if let Some(value) = header {
            builder = builder.header(SCHOOL_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_is_normalized_and_validated() {
        assert_eq!(extract_school(&parts(Some(" Sunny-Days "))).unwrap(), "sunny-days");
        assert_eq!(extract_school(&parts(None)).unwrap_err().0, StatusCode::BAD_REQUEST);
        assert_eq!(extract_school(&parts(Some("../etc"))).unwrap_err().0, StatusCode::BAD_REQUEST);
        assert_eq!(extract_school(&parts(Some("a"))).unwrap_err().0, StatusCode::BAD_REQUEST);
    }
}
