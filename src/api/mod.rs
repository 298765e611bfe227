pub mod error;
pub mod health;
pub mod users;

pub use error::{editor_error, ErrorResponse};

use axum::Router;
use sqlx::SqlitePool;

pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        .nest("/users", users::router(pool.clone()))
        .nest("/health", health::router(pool))
}
