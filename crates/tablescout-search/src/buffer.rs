//! Buffer ring augmentation around a core search radius.

use std::collections::HashSet;

use serde::Serialize;
use tablescout_core::{Restaurant, SearchCenter};

use crate::distance::distance_from;
use crate::lookup::{LookupError, NearbyQuery, NearbySearch};

#[derive(Debug, Clone)]
pub struct Augmented {
    pub effective_radius_km: f64,
    /// Core results plus buffer-ring results, each id at most once.
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreBufferDistribution {
    pub core_results: usize,
    pub buffer_results: usize,
}

/// Extend a core result set out to `core_radius_km + buffer_radius_km`.
///
/// Re-queries the store at the effective radius and unions the answer with
/// `core_results`, keeping the first occurrence of each id. A zero buffer skips
/// the re-query.
///
/// # Errors
///
/// Returns the store's [`LookupError`] if the buffer query fails. The core
/// results are discarded in that case.
pub async fn augment(
    store: &dyn NearbySearch,
    center: SearchCenter,
    core_radius_km: f64,
    buffer_radius_km: f64,
    core_results: Vec<Restaurant>,
    platforms: &[String],
    limit: usize,
) -> Result<Augmented, LookupError> {
    let effective_radius_km = core_radius_km + buffer_radius_km;
    if buffer_radius_km <= 0.0 {
        return Ok(Augmented {
            effective_radius_km,
            restaurants: core_results,
        });
    }

    let superset = store
        .nearby(&NearbyQuery {
            center,
            radius_km: effective_radius_km,
            platforms: platforms.to_vec(),
            limit,
        })
        .await?;

    let mut seen = HashSet::with_capacity(core_results.len() + superset.len());
    let restaurants: Vec<Restaurant> = core_results
        .into_iter()
        .chain(superset)
        .filter(|r| seen.insert(r.id))
        .collect();

    tracing::debug!(
        core_radius_km,
        effective_radius_km,
        merged = restaurants.len(),
        "buffer ring merged"
    );

    Ok(Augmented {
        effective_radius_km,
        restaurants,
    })
}

/// Count how many restaurants sit inside the core radius versus beyond it.
///
/// Uses exact distance; the two counts always sum to the input length.
#[must_use]
pub fn tally<'a, I>(
    center: SearchCenter,
    restaurants: I,
    core_radius_km: f64,
) -> CoreBufferDistribution
where
    I: IntoIterator<Item = &'a Restaurant>,
{
    let mut distribution = CoreBufferDistribution {
        core_results: 0,
        buffer_results: 0,
    };
    for restaurant in restaurants {
        if distance_from(center, restaurant) <= core_radius_km {
            distribution.core_results += 1;
        } else {
            distribution.buffer_results += 1;
        }
    }
    distribution
}
