//! Request-level orchestration of the search stages.
//!
//! Realtime: expand → (buffer) → annotate → truncate → (zones) → (distribution).
//! Nearby: fixed radius lookup → (buffer) → annotate → truncate → (distribution).
//! Counts are always taken from the final, truncated list so every reported
//! breakdown sums to `total`.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tablescout_core::{
    AppConfig, CoreError, RadiusGrowth, Restaurant, RestaurantHit, SearchCenter,
};
use thiserror::Error;

use crate::buffer::{augment, tally, CoreBufferDistribution};
use crate::distance::annotate;
use crate::expander::{ExpansionRequest, RadiusExpander};
use crate::lookup::{LookupError, NearbyQuery, NearbySearch};
use crate::zones::{partition, BufferZones};

/// Smallest radius a caller may ask for.
pub const MIN_RADIUS_KM: f64 = 0.01;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] CoreError),
    #[error("restaurant lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Engine-wide knobs, normally taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub growth: RadiusGrowth,
    pub max_radius_cap_km: f64,
    pub default_platforms: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            growth: RadiusGrowth::default(),
            max_radius_cap_km: 50.0,
            default_platforms: vec!["internal".to_string()],
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            growth: config.radius_growth,
            max_radius_cap_km: config.max_radius_cap_km,
            default_platforms: config.default_platforms.clone(),
        }
    }
}

/// An adaptive search that grows its radius until enough results are found.
#[derive(Debug, Clone)]
pub struct RealtimeSearch {
    pub center: SearchCenter,
    pub initial_radius_km: f64,
    pub max_radius_km: f64,
    /// Signed so that negative input can be reported instead of failing to parse.
    pub min_results: i64,
    pub buffer_radius_km: Option<f64>,
    pub include_zones: bool,
    pub platforms: Vec<String>,
    pub limit: usize,
}

/// A single fixed-radius search.
#[derive(Debug, Clone)]
pub struct NearbyRequest {
    pub center: SearchCenter,
    pub radius_km: f64,
    pub buffer_radius_km: Option<f64>,
    pub platforms: Vec<String>,
    pub limit: usize,
    pub real_time: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealtimeParams {
    pub center: SearchCenter,
    pub final_radius_km: f64,
    pub search_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_radius_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_radius_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealtimeOutcome {
    pub search_params: RealtimeParams,
    pub total: usize,
    pub restaurants: Vec<RestaurantHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_zones: Option<BufferZones>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_buffer_distribution: Option<CoreBufferDistribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyParams {
    pub center: SearchCenter,
    pub radius_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_radius_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_radius_km: Option<f64>,
    pub real_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NearbyDistribution {
    pub core_radius_results: usize,
    pub buffer_zone_results: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyData {
    pub search_params: NearbyParams,
    pub total: usize,
    pub restaurants: Vec<RestaurantHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<NearbyDistribution>,
}

#[derive(Debug, Clone)]
pub struct NearbyOutcome {
    pub data: NearbyData,
    pub platforms_searched: Vec<String>,
}

pub struct SearchEngine {
    store: Arc<dyn NearbySearch>,
    settings: SearchSettings,
}

impl SearchEngine {
    #[must_use]
    pub fn new(store: Arc<dyn NearbySearch>, settings: SearchSettings) -> Self {
        Self { store, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Run the adaptive realtime search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] for bad input and
    /// [`SearchError::Lookup`] when the store fails (after retries, if the store
    /// retries).
    pub async fn realtime(&self, request: &RealtimeSearch) -> Result<RealtimeOutcome, SearchError> {
        let min_results = self.validate_realtime(request)?;
        let platforms = normalize_platforms(&request.platforms);

        let expansion = RadiusExpander::new(self.store.as_ref(), self.settings.growth)
            .expand(&ExpansionRequest {
                center: request.center,
                initial_radius_km: request.initial_radius_km,
                max_radius_km: request.max_radius_km,
                min_results,
                platforms: &platforms,
                limit: request.limit,
            })
            .await?;

        let final_radius_km = expansion.final_radius_km;
        let (restaurants, effective_radius_km) = match request.buffer_radius_km {
            Some(buffer) => {
                let augmented = augment(
                    self.store.as_ref(),
                    request.center,
                    final_radius_km,
                    buffer,
                    expansion.restaurants,
                    &platforms,
                    request.limit,
                )
                .await?;
                (augmented.restaurants, Some(augmented.effective_radius_km))
            }
            None => (expansion.restaurants, None),
        };

        let hits = finalize(request.center, restaurants, request.limit);

        // Bands cover [0, final radius]; buffer-ring hits count as outer.
        let buffer_zones = request.include_zones.then(|| {
            partition(
                request.center,
                hits.iter().map(|h| &h.restaurant),
                final_radius_km,
            )
        });
        let core_buffer_distribution = request.buffer_radius_km.map(|_| {
            tally(
                request.center,
                hits.iter().map(|h| &h.restaurant),
                final_radius_km,
            )
        });

        tracing::info!(
            latitude = request.center.latitude,
            longitude = request.center.longitude,
            final_radius_km,
            attempts = expansion.attempts,
            total = hits.len(),
            "realtime search complete"
        );

        Ok(RealtimeOutcome {
            search_params: RealtimeParams {
                center: request.center,
                final_radius_km,
                search_attempts: expansion.attempts,
                effective_radius_km,
                buffer_radius_km: request.buffer_radius_km,
            },
            total: hits.len(),
            restaurants: hits,
            buffer_zones,
            core_buffer_distribution,
        })
    }

    /// Run a single fixed-radius search, optionally with a buffer ring.
    ///
    /// # Errors
    ///
    /// See [`SearchEngine::realtime`].
    pub async fn nearby(&self, request: &NearbyRequest) -> Result<NearbyOutcome, SearchError> {
        self.validate_nearby(request)?;
        let platforms = normalize_platforms(&request.platforms);

        let core = self
            .store
            .nearby(&NearbyQuery {
                center: request.center,
                radius_km: request.radius_km,
                platforms: platforms.clone(),
                limit: request.limit,
            })
            .await?;

        let (restaurants, effective_radius_km) = match request.buffer_radius_km {
            Some(buffer) => {
                let augmented = augment(
                    self.store.as_ref(),
                    request.center,
                    request.radius_km,
                    buffer,
                    core,
                    &platforms,
                    request.limit,
                )
                .await?;
                (augmented.restaurants, Some(augmented.effective_radius_km))
            }
            None => (core, None),
        };

        let hits = finalize(request.center, restaurants, request.limit);
        let distribution = request.buffer_radius_km.map(|_| {
            let split = tally(
                request.center,
                hits.iter().map(|h| &h.restaurant),
                request.radius_km,
            );
            NearbyDistribution {
                core_radius_results: split.core_results,
                buffer_zone_results: split.buffer_results,
            }
        });

        tracing::info!(
            latitude = request.center.latitude,
            longitude = request.center.longitude,
            radius_km = request.radius_km,
            total = hits.len(),
            "nearby search complete"
        );

        let platforms_searched = if platforms.is_empty() {
            self.settings.default_platforms.clone()
        } else {
            platforms
        };

        Ok(NearbyOutcome {
            data: NearbyData {
                search_params: NearbyParams {
                    center: request.center,
                    radius_km: request.radius_km,
                    buffer_radius_km: request.buffer_radius_km,
                    effective_radius_km,
                    real_time: request.real_time,
                },
                total: hits.len(),
                restaurants: hits,
                distribution,
            },
            platforms_searched,
        })
    }

    /// Returns `min_results` as a count once every field checks out.
    fn validate_realtime(&self, request: &RealtimeSearch) -> Result<usize, CoreError> {
        request.center.validate()?;
        self.check_radius("initial_radius", request.initial_radius_km)?;
        self.check_radius("max_radius", request.max_radius_km)?;
        if request.initial_radius_km > request.max_radius_km {
            return Err(CoreError::InvalidParameter(format!(
                "initial_radius ({}) must not exceed max_radius ({})",
                request.initial_radius_km, request.max_radius_km
            )));
        }
        if let Some(buffer) = request.buffer_radius_km {
            self.check_buffer(buffer)?;
        }
        check_limit(request.limit)?;

        let min_results = usize::try_from(request.min_results).map_err(|_| {
            CoreError::InvalidParameter(format!(
                "min_results must be zero or greater, got {}",
                request.min_results
            ))
        })?;
        Ok(min_results)
    }

    fn validate_nearby(&self, request: &NearbyRequest) -> Result<(), CoreError> {
        request.center.validate()?;
        self.check_radius("radius", request.radius_km)?;
        if let Some(buffer) = request.buffer_radius_km {
            self.check_buffer(buffer)?;
        }
        check_limit(request.limit)
    }

    fn check_radius(&self, field: &'static str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value < MIN_RADIUS_KM {
            return Err(CoreError::InvalidRadius {
                field,
                expectation: "at least 0.01 km",
                value,
            });
        }
        if value > self.settings.max_radius_cap_km {
            return Err(CoreError::InvalidRadius {
                field,
                expectation: "within the configured radius cap",
                value,
            });
        }
        Ok(())
    }

    fn check_buffer(&self, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidRadius {
                field: "buffer_radius",
                expectation: "zero or a positive number of kilometers",
                value,
            });
        }
        if value > self.settings.max_radius_cap_km {
            return Err(CoreError::InvalidRadius {
                field: "buffer_radius",
                expectation: "within the configured radius cap",
                value,
            });
        }
        Ok(())
    }
}

fn check_limit(limit: usize) -> Result<(), CoreError> {
    if limit == 0 {
        return Err(CoreError::InvalidParameter(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Lowercase, trim, drop blanks, dedupe and sort.
fn normalize_platforms(platforms: &[String]) -> Vec<String> {
    platforms
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn finalize(
    center: SearchCenter,
    restaurants: Vec<Restaurant>,
    limit: usize,
) -> Vec<RestaurantHit> {
    let mut hits = annotate(center, restaurants);
    hits.truncate(limit);
    hits
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
