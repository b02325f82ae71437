use sqlx::PgPool;
use tablescout_core::RestaurantSeed;

use crate::restaurants::upsert_restaurant;
use crate::DbError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl SeedSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Upsert restaurants from config into the database.
///
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_restaurants(
    pool: &PgPool,
    restaurants: &[RestaurantSeed],
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for seed in restaurants {
        if upsert_restaurant(&mut *tx, seed).await? {
            summary.inserted += 1;
        } else {
            summary.updated += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "restaurants seeded"
    );
    Ok(summary)
}
