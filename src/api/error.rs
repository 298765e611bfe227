use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::EditorError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a core error onto the transport: validation problems are the
/// caller's fault, everything that touched the store is a 500.
pub fn editor_error(err: EditorError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        EditorError::EmptyRoute(_) | EditorError::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
        EditorError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
