//! Core route-editing services: the read-side query service and the point
//! placement engine.
//!
//! Everything here is stateless; each function is one short-lived unit of
//! work borrowing the connection pool. No caching, no background tasks.

pub mod error;
pub mod geo;
pub mod placement;
pub mod routes;

pub use error::EditorError;
pub use placement::{delete_point, place_point, PlacedPoint, MANUAL_ACCURACY_M};
pub use routes::{
    list_points, list_routes, list_users, DEFAULT_LOOKBACK_DAYS, MIN_ROUTE_POINTS,
};
