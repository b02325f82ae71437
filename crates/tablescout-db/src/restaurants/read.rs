//! Read operations for the `restaurants` table.

use sqlx::PgPool;
use tablescout_core::SearchCenter;
use tablescout_search::EARTH_RADIUS_KM;

use super::types::{BoundingBox, RestaurantRow};

/// Compute the prefilter box for `radius_km` around `center`.
///
/// Near the poles, or when the box would cross the antimeridian, longitude
/// is left unbounded.
#[must_use]
pub fn bounding_box(center: SearchCenter, radius_km: f64) -> BoundingBox {
    let lat_delta = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let min_latitude = (center.latitude - lat_delta).max(-90.0);
    let max_latitude = (center.latitude + lat_delta).min(90.0);

    let widest_lat = min_latitude.abs().max(max_latitude.abs());
    let cos_lat = widest_lat.to_radians().cos();
    let lng_delta = if cos_lat > f64::EPSILON {
        lat_delta / cos_lat
    } else {
        f64::INFINITY
    };

    let (min_longitude, max_longitude) =
        if max_latitude >= 90.0 || min_latitude <= -90.0 || lng_delta >= 180.0 {
            (-180.0, 180.0)
        } else {
            let lo = center.longitude - lng_delta;
            let hi = center.longitude + lng_delta;
            if lo < -180.0 || hi > 180.0 {
                (-180.0, 180.0)
            } else {
                (lo, hi)
            }
        };

    BoundingBox {
        min_latitude,
        max_latitude,
        min_longitude,
        max_longitude,
    }
}

/// List active restaurants inside `bbox`, optionally restricted to those
/// listed on any of `platforms`.
///
/// `platforms` must already be lowercased; an empty slice disables the
/// filter. Rows come back unordered.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_restaurants_in_box(
    pool: &PgPool,
    bbox: BoundingBox,
    platforms: &[String],
) -> Result<Vec<RestaurantRow>, sqlx::Error> {
    sqlx::query_as::<_, RestaurantRow>(
        "SELECT id, public_id, name, cuisine_type, rating::float8 AS rating, \
                latitude, longitude, address, platforms, is_active, \
                created_at, updated_at \
         FROM restaurants \
         WHERE is_active = TRUE \
           AND latitude BETWEEN $1 AND $2 \
           AND longitude BETWEEN $3 AND $4 \
           AND (cardinality($5::text[]) = 0 OR platforms && $5::text[])",
    )
    .bind(bbox.min_latitude)
    .bind(bbox.max_latitude)
    .bind(bbox.min_longitude)
    .bind(bbox.max_longitude)
    .bind(platforms)
    .fetch_all(pool)
    .await
}

/// Count active restaurants.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_active_restaurants(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants WHERE is_active = TRUE")
        .fetch_one(pool)
        .await
}
