//! Write operations for the `restaurants` table.

use sqlx::PgConnection;
use tablescout_core::RestaurantSeed;

/// Insert a restaurant or refresh the existing row with the same name and
/// position.
///
/// Platform names are lowercased before storage. Returns `true` when the row
/// was newly inserted.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_restaurant(
    conn: &mut PgConnection,
    seed: &RestaurantSeed,
) -> Result<bool, sqlx::Error> {
    let platforms: Vec<String> = seed
        .platforms
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    sqlx::query_scalar::<_, bool>(
        "INSERT INTO restaurants \
             (name, cuisine_type, rating, latitude, longitude, address, platforms, is_active) \
         VALUES ($1, $2, $3::float8::numeric, $4, $5, $6, $7, TRUE) \
         ON CONFLICT (name, latitude, longitude) DO UPDATE SET \
             cuisine_type = EXCLUDED.cuisine_type, \
             rating       = EXCLUDED.rating, \
             address      = EXCLUDED.address, \
             platforms    = EXCLUDED.platforms, \
             is_active    = TRUE, \
             updated_at   = NOW() \
         RETURNING (xmax = 0) AS is_new",
    )
    .bind(&seed.name)
    .bind(&seed.cuisine_type)
    .bind(seed.rating)
    .bind(seed.latitude)
    .bind(seed.longitude)
    .bind(&seed.address)
    .bind(&platforms)
    .fetch_one(conn)
    .await
}
