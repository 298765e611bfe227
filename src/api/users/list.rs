use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::UsersState;
use crate::api::{editor_error, ErrorResponse};
use crate::models::User;
use crate::services;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// List every user who owns at least one recorded point
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users with recorded location history", body = UserListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<UsersState>,
) -> Result<Json<UserListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let users = services::list_users(&state.pool)
        .await
        .map_err(editor_error)?;

    Ok(Json(UserListResponse { users }))
}
