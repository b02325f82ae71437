use async_trait::async_trait;
use tablescout_core::Restaurant;

use crate::distance::select_nearest;
use crate::lookup::{LookupError, NearbyQuery, NearbySearch};

/// A fixed in-memory restaurant set. Used for local runs without a database
/// and as the store behind engine and route tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    restaurants: Vec<Restaurant>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

#[async_trait]
impl NearbySearch for MemoryStore {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Restaurant>, LookupError> {
        let candidates = self
            .restaurants
            .iter()
            .filter(|r| r.listed_on_any(&query.platforms))
            .cloned();
        Ok(select_nearest(
            query.center,
            query.radius_km,
            query.limit,
            candidates,
        ))
    }
}
