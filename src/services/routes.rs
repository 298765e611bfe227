//! Read side: users, daily route summaries, and ordered route points.
//!
//! A route is the set of one user's points recorded on one calendar date,
//! treated as a chronologically ordered polyline. Grouping happens in SQL;
//! nothing is cached between calls.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use super::error::EditorError;
use crate::models::{RouteSummary, TrackPoint, User};

/// Routes with fewer points than this are considered noise and are not
/// listed. Their points remain fetchable by date.
pub const MIN_ROUTE_POINTS: i64 = 5;

/// Default lookback window for route listings, in days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// List every user who owns at least one recorded point, ordered by
/// display name.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, EditorError> {
    let users = sqlx::query_as(
        r#"
        SELECT id, email,
               COALESCE(first_name || ' ' || last_name, email) AS display_name
        FROM users
        WHERE id IN (SELECT DISTINCT user_id FROM points)
        ORDER BY display_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// List route summaries for a user within the lookback window, newest date
/// first. Only dates with at least [`MIN_ROUTE_POINTS`] located points
/// qualify.
pub async fn list_routes(
    pool: &SqlitePool,
    user_id: i64,
    lookback_days: i64,
) -> Result<Vec<RouteSummary>, EditorError> {
    let cutoff = Utc::now() - Duration::days(lookback_days);

    let routes = sqlx::query_as(
        r#"
        SELECT DATE(recorded_at) AS route_date,
               COUNT(*) AS point_count,
               MIN(recorded_at) AS start_time,
               MAX(recorded_at) AS end_time,
               MIN(latitude) AS min_lat,
               MAX(latitude) AS max_lat,
               MIN(longitude) AS min_lon,
               MAX(longitude) AS max_lon
        FROM points
        WHERE user_id = ?
          AND recorded_at >= ?
          AND latitude IS NOT NULL
          AND longitude IS NOT NULL
        GROUP BY DATE(recorded_at)
        HAVING COUNT(*) >= ?
        ORDER BY route_date DESC
        "#,
    )
    .bind(user_id)
    .bind(cutoff)
    .bind(MIN_ROUTE_POINTS)
    .fetch_all(pool)
    .await?;

    Ok(routes)
}

/// All located points for a user on one date, ascending by recording time.
/// This is the canonical current-route view consumed by the placement
/// engine and by any UI.
pub async fn list_points(
    pool: &SqlitePool,
    user_id: i64,
    route_date: NaiveDate,
) -> Result<Vec<TrackPoint>, EditorError> {
    let points = sqlx::query_as(
        r#"
        SELECT id, latitude, longitude, recorded_at,
               accuracy, altitude, speed, battery
        FROM points
        WHERE user_id = ?
          AND DATE(recorded_at) = ?
          AND latitude IS NOT NULL
          AND longitude IS NOT NULL
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(user_id)
    .bind(route_date)
    .fetch_all(pool)
    .await?;

    Ok(points)
}
