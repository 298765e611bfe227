pub mod list;
pub mod points;
pub mod routes;

use axum::{
    routing::{delete, get},
    Router,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UsersState {
    pub pool: SqlitePool,
}

pub fn router(pool: SqlitePool) -> Router {
    let state = UsersState { pool };
    Router::new()
        .route("/", get(list::list_users))
        .route("/{user_id}/routes", get(routes::list_user_routes))
        .route(
            "/{user_id}/routes/{route_date}/points",
            get(routes::list_route_points).post(points::place_point),
        )
        .route("/{user_id}/points/{point_id}", delete(points::delete_point))
        .with_state(state)
}
