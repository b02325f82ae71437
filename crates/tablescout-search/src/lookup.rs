//! The nearby-lookup collaborator the search core is built on.

use async_trait::async_trait;
use tablescout_core::{Restaurant, SearchCenter};
use thiserror::Error;

/// One raw "what is within `radius_km` of `center`" question.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: SearchCenter,
    pub radius_km: f64,
    /// Lowercased platform names; empty means no platform filter.
    pub platforms: Vec<String>,
    pub limit: usize,
}

/// Errors returned by a restaurant store.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The store could not be reached (connection refused, pool closed, I/O).
    #[error("restaurant store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("restaurant store timed out")]
    Timeout,

    /// The store answered with an error that retrying will not fix.
    #[error("restaurant store query failed: {0}")]
    Query(String),
}

impl LookupError {
    /// `true` for errors worth retrying after a back-off delay.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, LookupError::Unavailable(_) | LookupError::Timeout)
    }
}

/// Raw nearby-restaurant lookup.
///
/// Implementations must return only restaurants whose
/// [`haversine_km`](crate::distance::haversine_km) distance from the center is
/// at most `radius_km`, listed on at least one requested platform, nearest
/// first, capped at `limit`. [`select_nearest`](crate::distance::select_nearest)
/// does the final cut.
#[async_trait]
pub trait NearbySearch: Send + Sync {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Restaurant>, LookupError>;
}

#[async_trait]
impl<T> NearbySearch for std::sync::Arc<T>
where
    T: NearbySearch + ?Sized,
{
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Restaurant>, LookupError> {
        (**self).nearby(query).await
    }
}
