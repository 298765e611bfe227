use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user who owns at least one recorded point.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// First and last name when both are present, otherwise the email address.
    pub display_name: String,
}

/// One recorded or manually inserted location sample.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TrackPoint {
    pub id: i64,
    /// Latitude in degrees, -90..90
    pub latitude: f64,
    /// Longitude in degrees, -180..180
    pub longitude: f64,
    /// Recording instant (UTC)
    pub recorded_at: DateTime<Utc>,
    /// Measurement accuracy in meters, 20.0 for manually placed points
    pub accuracy: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Speed at recording time; never set for manually placed points
    pub speed: Option<f64>,
    /// Battery level at recording time; never set for manually placed points
    pub battery: Option<f64>,
}

/// Aggregated view of one calendar day of a user's points.
///
/// Derived at query time by grouping points on the calendar date of
/// `recorded_at`; routes have no storage row of their own.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RouteSummary {
    pub route_date: NaiveDate,
    pub point_count: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
