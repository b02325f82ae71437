//! Row types for the `restaurants` table.

use chrono::{DateTime, Utc};
use tablescout_core::Restaurant;
use uuid::Uuid;

/// A row from the `restaurants` table.
///
/// `rating` is stored as `NUMERIC(3,2)` and read back through a `::float8`
/// cast.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub cuisine_type: Option<String>,
    pub rating: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub platforms: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cuisine_type: row.cuisine_type,
            rating: row.rating,
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address,
            platforms: row.platforms,
        }
    }
}

/// Degree bounds that contain every point within some radius of a center.
///
/// A coarse prefilter only; callers still apply the exact great-circle cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}
