use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UsersState;
use crate::api::{editor_error, ErrorResponse};
use crate::services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlacePointRequest {
    /// Latitude in degrees, -90..90
    pub latitude: f64,
    /// Longitude in degrees, -180..180
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Accuracy in meters; defaults to 20.0 for manually placed points
    pub accuracy: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacePointResponse {
    pub success: bool,
    pub point_id: i64,
    /// Timestamp synthesized for the new point
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletePointResponse {
    pub success: bool,
    pub message: String,
}

/// Insert a manually drawn point into an existing route
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/routes/{route_date}/points",
    params(
        ("user_id" = i64, Path, description = "Owner of the route"),
        ("route_date" = NaiveDate, Path, description = "Calendar date of the route (YYYY-MM-DD)")
    ),
    request_body = PlacePointRequest,
    responses(
        (status = 201, description = "Point placed", body = PlacePointResponse),
        (status = 400, description = "Invalid coordinates or empty route", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "points"
)]
pub async fn place_point(
    State(state): State<UsersState>,
    Path((user_id, route_date)): Path<(i64, NaiveDate)>,
    Json(request): Json<PlacePointRequest>,
) -> Result<(StatusCode, Json<PlacePointResponse>), (StatusCode, Json<ErrorResponse>)> {
    let placed = services::place_point(
        &state.pool,
        user_id,
        route_date,
        request.latitude,
        request.longitude,
        request.altitude,
        request.accuracy,
    )
    .await
    .map_err(editor_error)?;

    Ok((
        StatusCode::CREATED,
        Json(PlacePointResponse {
            success: true,
            point_id: placed.point_id,
            timestamp: placed.recorded_at,
            message: "Point added successfully".to_string(),
        }),
    ))
}

/// Delete a point owned by the given user
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/points/{point_id}",
    params(
        ("user_id" = i64, Path, description = "Owner of the point"),
        ("point_id" = i64, Path, description = "Point to delete")
    ),
    responses(
        (status = 200, description = "Point deleted", body = DeletePointResponse),
        (status = 404, description = "Point not found or not authorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "points"
)]
pub async fn delete_point(
    State(state): State<UsersState>,
    Path((user_id, point_id)): Path<(i64, i64)>,
) -> Result<Json<DeletePointResponse>, (StatusCode, Json<ErrorResponse>)> {
    let deleted = services::delete_point(&state.pool, user_id, point_id)
        .await
        .map_err(editor_error)?;

    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Point not found or not authorized".to_string(),
            }),
        ));
    }

    Ok(Json(DeletePointResponse {
        success: true,
        message: "Point deleted successfully".to_string(),
    }))
}
