//! Adaptive radius expansion.
//!
//! Attempts are strictly sequential: each radius decision depends on the
//! previous attempt's count.

use tablescout_core::{RadiusGrowth, Restaurant, SearchCenter};

use crate::lookup::{LookupError, NearbyQuery, NearbySearch};

/// Attempts allowed before the expander jumps straight to `max_radius_km`.
/// The jump attempt is the last one, so no run exceeds this count.
pub const MAX_ATTEMPTS: usize = 16;

/// Parameters for one expansion run. Callers validate before expanding.
#[derive(Debug, Clone)]
pub struct ExpansionRequest<'a> {
    pub center: SearchCenter,
    pub initial_radius_km: f64,
    pub max_radius_km: f64,
    pub min_results: usize,
    pub platforms: &'a [String],
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct ExpansionOutcome {
    pub restaurants: Vec<Restaurant>,
    pub final_radius_km: f64,
    pub attempts: u32,
    /// Radius used by each attempt, in order. Strictly increasing.
    pub radii_km: Vec<f64>,
}

pub struct RadiusExpander<'a> {
    store: &'a dyn NearbySearch,
    growth: RadiusGrowth,
}

impl<'a> RadiusExpander<'a> {
    #[must_use]
    pub fn new(store: &'a dyn NearbySearch, growth: RadiusGrowth) -> Self {
        Self { store, growth }
    }

    /// Search outward from `initial_radius_km` until `min_results` are found or
    /// `max_radius_km` has been searched.
    ///
    /// Falling short at the ceiling is not an error; whatever the last attempt
    /// found is returned.
    ///
    /// # Errors
    ///
    /// Returns the store's [`LookupError`] if any attempt fails.
    pub async fn expand(
        &self,
        request: &ExpansionRequest<'_>,
    ) -> Result<ExpansionOutcome, LookupError> {
        let mut radius = request.initial_radius_km;
        let mut radii_km = Vec::new();

        loop {
            radii_km.push(radius);
            let query = NearbyQuery {
                center: request.center,
                radius_km: radius,
                platforms: request.platforms.to_vec(),
                limit: request.limit,
            };
            let found = self.store.nearby(&query).await?;
            let satisfied = found.len() >= request.min_results;
            let at_ceiling = radius >= request.max_radius_km;

            tracing::debug!(
                attempt = radii_km.len(),
                radius_km = radius,
                found = found.len(),
                min_results = request.min_results,
                "radius expansion attempt"
            );

            if satisfied || at_ceiling {
                #[allow(clippy::cast_possible_truncation)]
                let attempts = radii_km.len() as u32;
                return Ok(ExpansionOutcome {
                    restaurants: found,
                    final_radius_km: radius,
                    attempts,
                    radii_km,
                });
            }

            let next = self.growth.next(radius).min(request.max_radius_km);
            // Growth that stalls, or a run about to use its last attempt, goes
            // straight to the ceiling.
            radius = if next > radius && radii_km.len() + 1 < MAX_ATTEMPTS {
                next
            } else {
                request.max_radius_km
            };
        }
    }
}
