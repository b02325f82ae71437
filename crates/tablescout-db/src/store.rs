//! Postgres-backed [`NearbySearch`].

use async_trait::async_trait;
use sqlx::PgPool;
use tablescout_core::Restaurant;
use tablescout_search::{select_nearest, LookupError, NearbyQuery, NearbySearch};

use crate::restaurants::{bounding_box, list_restaurants_in_box};

/// Answers nearby queries with a bounding-box prefilter in SQL followed by
/// the exact great-circle cutoff in process.
#[derive(Debug, Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NearbySearch for PgRestaurantStore {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Restaurant>, LookupError> {
        let bbox = bounding_box(query.center, query.radius_km);
        let rows = list_restaurants_in_box(&self.pool, bbox, &query.platforms)
            .await
            .map_err(lookup_error)?;

        tracing::debug!(
            radius_km = query.radius_km,
            candidates = rows.len(),
            "bounding-box prefilter"
        );

        Ok(select_nearest(
            query.center,
            query.radius_km,
            query.limit,
            rows.into_iter().map(Restaurant::from),
        ))
    }
}

/// Classify a driver error as transient or permanent for the retry layer.
pub(crate) fn lookup_error(err: sqlx::Error) -> LookupError {
    match err {
        sqlx::Error::PoolTimedOut => LookupError::Timeout,
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => LookupError::Unavailable(err.to_string()),
        other => LookupError::Query(other.to_string()),
    }
}
