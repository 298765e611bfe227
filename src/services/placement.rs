//! Write side: placing manually drawn points into existing routes and
//! deleting erroneous ones.
//!
//! Placement picks the adjacent pair of route points whose great-circle
//! detour cost is smallest, then assigns the time midpoint of that pair so
//! chronological order and route order stay the same thing for any renderer
//! that sorts by timestamp.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::error::EditorError;
use super::geo::haversine_distance;
use super::routes::list_points;
use crate::models::TrackPoint;

/// Accuracy recorded for manually placed points, in meters. Marks the point
/// as hand-placed with moderate confidence, distinct from device-measured
/// accuracy values.
pub const MANUAL_ACCURACY_M: f64 = 20.0;

/// Outcome of a successful placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacedPoint {
    pub point_id: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Index `i` of the gap (points[i], points[i+1]) the new coordinate fits
/// best into. Requires at least two points.
///
/// The detour cost of a gap is d(new, prev) + d(new, next) - d(prev, next),
/// non-negative by the triangle inequality and zero when the new point lies
/// exactly on the segment. Strict comparison makes the earliest gap win
/// ties. The rule is purely geometric: on sparse or looping routes it can
/// pick a gap that is close in space but distant in time.
fn best_gap(points: &[TrackPoint], latitude: f64, longitude: f64) -> usize {
    let mut best_index = 0;
    let mut min_penalty = f64::INFINITY;

    for (i, pair) in points.windows(2).enumerate() {
        let dist_to_prev =
            haversine_distance(latitude, longitude, pair[0].latitude, pair[0].longitude);
        let dist_to_next =
            haversine_distance(latitude, longitude, pair[1].latitude, pair[1].longitude);
        let original_gap = haversine_distance(
            pair[0].latitude,
            pair[0].longitude,
            pair[1].latitude,
            pair[1].longitude,
        );

        let penalty = dist_to_prev + dist_to_next - original_gap;
        if penalty < min_penalty {
            min_penalty = penalty;
            best_index = i;
        }
    }

    best_index
}

/// Timestamp for a point inserted into the given ordered route, or `None`
/// for an empty route.
///
/// With fewer than two points there is no gap to weigh, so the point is
/// appended 30 seconds after the last known one.
fn insertion_timestamp(
    points: &[TrackPoint],
    latitude: f64,
    longitude: f64,
) -> Option<DateTime<Utc>> {
    let last = points.last()?;
    if points.len() < 2 {
        return Some(last.recorded_at + Duration::seconds(30));
    }

    let gap = best_gap(points, latitude, longitude);
    let t_prev = points[gap].recorded_at;
    let t_next = points[gap + 1].recorded_at;
    Some(t_prev + (t_next - t_prev) / 2)
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), EditorError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(EditorError::InvalidCoordinate(format!(
            "latitude {latitude} out of range"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(EditorError::InvalidCoordinate(format!(
            "longitude {longitude} out of range"
        )));
    }
    Ok(())
}

/// Insert a manually drawn point into the user's route for the given date.
///
/// Fails with [`EditorError::EmptyRoute`] when no located points exist for
/// that date; there is no reference to synthesize a timestamp from. If
/// another point of the same user already holds the chosen timestamp, the
/// timestamp is shifted forward by 5 seconds, once. A second collision is
/// left to the store.
pub async fn place_point(
    pool: &SqlitePool,
    user_id: i64,
    route_date: NaiveDate,
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    accuracy: Option<f64>,
) -> Result<PlacedPoint, EditorError> {
    validate_coordinates(latitude, longitude)?;

    let points = list_points(pool, user_id, route_date).await?;
    let mut recorded_at = insertion_timestamp(&points, latitude, longitude)
        .ok_or(EditorError::EmptyRoute(route_date))?;

    let mut tx = pool.begin().await?;

    let clash: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM points WHERE user_id = ? AND recorded_at = ?")
            .bind(user_id)
            .bind(recorded_at)
            .fetch_optional(&mut *tx)
            .await?;
    if clash.is_some() {
        recorded_at += Duration::seconds(5);
    }

    let now = Utc::now();
    let (point_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO points (user_id, latitude, longitude, recorded_at,
                            accuracy, altitude, speed, battery,
                            created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, NULL, NULL, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(recorded_at)
    .bind(accuracy.unwrap_or(MANUAL_ACCURACY_M))
    .bind(altitude)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(point_id, user_id, %recorded_at, "placed manual point");

    Ok(PlacedPoint {
        point_id,
        recorded_at,
    })
}

/// Delete a point, but only if it belongs to the given user. Returns whether
/// a row was removed; a missing id and a foreign owner are deliberately the
/// same outcome.
pub async fn delete_point(
    pool: &SqlitePool,
    user_id: i64,
    point_id: i64,
) -> Result<bool, EditorError> {
    let deleted: Option<(i64,)> =
        sqlx::query_as("DELETE FROM points WHERE id = ? AND user_id = ? RETURNING id")
            .bind(point_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if deleted.is_some() {
        info!(point_id, user_id, "deleted point");
    }

    Ok(deleted.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{memory_pool, seed_point, seed_user};
    use chrono::TimeZone;

    fn track_point(id: i64, latitude: f64, longitude: f64, timestamp: &str) -> TrackPoint {
        TrackPoint {
            id,
            latitude,
            longitude,
            recorded_at: timestamp.parse().unwrap(),
            accuracy: None,
            altitude: None,
            speed: None,
            battery: None,
        }
    }

    #[test]
    fn best_gap_prefers_the_segment_the_point_lies_on() {
        let points = vec![
            track_point(1, 0.0, 0.0, "2024-01-01T10:00:00Z"),
            track_point(2, 0.0, 1.0, "2024-01-01T10:10:00Z"),
            track_point(3, 0.0, 2.0, "2024-01-01T10:20:00Z"),
        ];

        assert_eq!(best_gap(&points, 0.0, 0.5), 0);
        assert_eq!(best_gap(&points, 0.0, 1.5), 1);
    }

    #[test]
    fn best_gap_breaks_ties_towards_the_earliest_gap() {
        // Three identical points: every gap has the same penalty.
        let points = vec![
            track_point(1, 0.0, 0.0, "2024-01-01T10:00:00Z"),
            track_point(2, 0.0, 0.0, "2024-01-01T10:10:00Z"),
            track_point(3, 0.0, 0.0, "2024-01-01T10:20:00Z"),
        ];

        assert_eq!(best_gap(&points, 1.0, 1.0), 0);
    }

    #[test]
    fn insertion_timestamp_is_the_time_midpoint_of_the_chosen_gap() {
        let points = vec![
            track_point(1, 0.0, 0.0, "2024-01-01T12:00:00Z"),
            track_point(2, 0.0, 1.0, "2024-01-01T12:01:00Z"),
        ];

        let ts = insertion_timestamp(&points, 0.0, 0.5).unwrap();
        assert_eq!(ts, "2024-01-01T12:00:30Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn single_point_routes_append_thirty_seconds_after_the_end() {
        let points = vec![track_point(1, 0.0, 0.0, "2024-01-01T09:00:00Z")];

        let ts = insertion_timestamp(&points, 50.0, 50.0).unwrap();
        assert_eq!(ts, "2024-01-01T09:00:30Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn empty_routes_have_no_insertion_timestamp() {
        assert!(insertion_timestamp(&[], 0.0, 0.0).is_none());
    }

    #[tokio::test]
    async fn place_point_between_two_neighbors() {
        let pool = memory_pool().await;
        seed_user(&pool, 7, "traveler@example.com", None, None).await;
        seed_point(
            &pool,
            7,
            Some(40.0),
            Some(-74.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
        .await;
        seed_point(
            &pool,
            7,
            Some(40.0),
            Some(-73.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 10, 0).unwrap(),
        )
        .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let placed = place_point(&pool, 7, date, 40.0, -73.5, None, None)
            .await
            .unwrap();

        assert_eq!(
            placed.recorded_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap()
        );

        let points = list_points(&pool, 7, date).await.unwrap();
        assert_eq!(points.len(), 3);
        let inserted = &points[1];
        assert_eq!(inserted.id, placed.point_id);
        assert_eq!(inserted.accuracy, Some(MANUAL_ACCURACY_M));
        assert_eq!(inserted.altitude, None);
        assert_eq!(inserted.speed, None);
        assert_eq!(inserted.battery, None);
    }

    #[tokio::test]
    async fn place_point_on_single_point_route_appends_at_the_end() {
        let pool = memory_pool().await;
        seed_user(&pool, 9, "solo@example.com", None, None).await;
        seed_point(
            &pool,
            9,
            Some(48.37),
            Some(10.89),
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        )
        .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let placed = place_point(&pool, 9, date, 48.38, 10.90, None, None)
            .await
            .unwrap();

        assert_eq!(
            placed.recorded_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 30).unwrap()
        );
    }

    #[tokio::test]
    async fn place_point_into_empty_route_fails_without_writing() {
        let pool = memory_pool().await;
        seed_user(&pool, 1, "ada@example.com", None, None).await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = place_point(&pool, 1, date, 40.0, -74.0, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::EmptyRoute(_)));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM points")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn colliding_timestamp_is_shifted_five_seconds() {
        let pool = memory_pool().await;
        seed_user(&pool, 7, "traveler@example.com", None, None).await;
        seed_point(
            &pool,
            7,
            Some(40.0),
            Some(-74.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
        .await;
        seed_point(
            &pool,
            7,
            Some(40.0),
            Some(-73.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 10, 0).unwrap(),
        )
        .await;
        // An unlocated point already occupies the midpoint timestamp. It is
        // invisible to the route view but still collides.
        seed_point(
            &pool,
            7,
            None,
            None,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap(),
        )
        .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let placed = place_point(&pool, 7, date, 40.0, -73.5, None, None)
            .await
            .unwrap();

        assert_eq!(
            placed.recorded_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn supplied_altitude_and_accuracy_are_stored() {
        let pool = memory_pool().await;
        seed_user(&pool, 1, "ada@example.com", None, None).await;
        seed_point(
            &pool,
            1,
            Some(40.0),
            Some(-74.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
        .await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let placed = place_point(&pool, 1, date, 40.0, -74.001, Some(120.5), Some(8.0))
            .await
            .unwrap();

        let points = list_points(&pool, 1, date).await.unwrap();
        let inserted = points.iter().find(|p| p.id == placed.point_id).unwrap();
        assert_eq!(inserted.altitude, Some(120.5));
        assert_eq!(inserted.accuracy, Some(8.0));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected_before_any_write() {
        let pool = memory_pool().await;
        seed_user(&pool, 1, "ada@example.com", None, None).await;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for (lat, lon) in [(95.0, 0.0), (-95.0, 0.0), (0.0, 200.0), (f64::NAN, 0.0)] {
            let err = place_point(&pool, 1, date, lat, lon, None, None)
                .await
                .unwrap_err();
            assert!(matches!(err, EditorError::InvalidCoordinate(_)));
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM points")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn delete_point_requires_ownership() {
        let pool = memory_pool().await;
        seed_user(&pool, 1, "ada@example.com", None, None).await;
        seed_user(&pool, 2, "kurt@example.com", None, None).await;
        let id = seed_point(
            &pool,
            1,
            Some(40.0),
            Some(-74.0),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
        .await;

        // Foreign owner and unknown id are the same outcome.
        assert!(!delete_point(&pool, 2, id).await.unwrap());
        assert!(!delete_point(&pool, 1, 9999).await.unwrap());

        assert!(delete_point(&pool, 1, id).await.unwrap());
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM points")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        // Already gone; deleting again reports the miss.
        assert!(!delete_point(&pool, 1, id).await.unwrap());
    }
}
