use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::UsersState;
use crate::api::{editor_error, ErrorResponse};
use crate::models::{RouteSummary, TrackPoint};
use crate::services;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteListQuery {
    /// Lookback window in days (default 30)
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteListResponse {
    pub user_id: i64,
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoutePointsResponse {
    pub user_id: i64,
    pub route_date: NaiveDate,
    pub points: Vec<TrackPoint>,
}

/// List a user's daily routes within the lookback window, newest first
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/routes",
    params(
        ("user_id" = i64, Path, description = "User to list routes for"),
        RouteListQuery
    ),
    responses(
        (status = 200, description = "Route summaries", body = RouteListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn list_user_routes(
    State(state): State<UsersState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RouteListQuery>,
) -> Result<Json<RouteListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let lookback_days = query.days.unwrap_or(services::DEFAULT_LOOKBACK_DAYS);
    let routes = services::list_routes(&state.pool, user_id, lookback_days)
        .await
        .map_err(editor_error)?;

    Ok(Json(RouteListResponse { user_id, routes }))
}

/// All points of one route, ascending by recording time
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/routes/{route_date}/points",
    params(
        ("user_id" = i64, Path, description = "Owner of the route"),
        ("route_date" = NaiveDate, Path, description = "Calendar date of the route (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Ordered route points", body = RoutePointsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn list_route_points(
    State(state): State<UsersState>,
    Path((user_id, route_date)): Path<(i64, NaiveDate)>,
) -> Result<Json<RoutePointsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let points = services::list_points(&state.pool, user_id, route_date)
        .await
        .map_err(editor_error)?;

    Ok(Json(RoutePointsResponse {
        user_id,
        route_date,
        points,
    }))
}
