//! `search` subcommands: run the engine and print a result table.
//!
//! By default searches go against Postgres with the configured retry policy.
//! `--from-file` searches a YAML restaurant file in memory instead, without
//! needing a database or `DATABASE_URL`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Subcommand};
use tablescout_core::{Restaurant, RestaurantHit, SearchCenter};
use tablescout_db::PgRestaurantStore;
use tablescout_search::{
    MemoryStore, NearbyRequest, RealtimeSearch, RetryingSearch, SearchEngine, SearchSettings,
};

#[derive(Debug, Args)]
pub struct SearchSource {
    /// Search restaurants from this YAML file instead of the database
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
    /// Restrict to restaurants listed on these platforms (repeatable)
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
    /// Maximum number of results
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Debug, Subcommand)]
pub enum SearchCommands {
    /// Adaptive search that widens the radius until enough results are found
    Realtime {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value_t = 2.0)]
        initial_radius: f64,
        #[arg(long, default_value_t = 10.0)]
        max_radius: f64,
        #[arg(long, default_value_t = 3, allow_hyphen_values = true)]
        min_results: i64,
        /// Extra ring beyond the final radius, in km
        #[arg(long)]
        buffer: Option<f64>,
        /// Print the inner/middle/outer zone breakdown
        #[arg(long)]
        zones: bool,
        #[command(flatten)]
        source: SearchSource,
    },
    /// Single fixed-radius search
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        radius: f64,
        /// Extra ring beyond the radius, in km
        #[arg(long)]
        buffer: Option<f64>,
        #[command(flatten)]
        source: SearchSource,
    },
}

/// Assign stable ids by file position; the file itself carries none.
pub(crate) fn memory_store_from_file(path: &Path) -> anyhow::Result<MemoryStore> {
    let file = tablescout_core::load_restaurants(path)?;
    let restaurants = file
        .restaurants
        .into_iter()
        .zip(1_i64..)
        .map(|(seed, id)| Restaurant {
            id,
            name: seed.name,
            cuisine_type: seed.cuisine_type,
            rating: seed.rating,
            latitude: seed.latitude,
            longitude: seed.longitude,
            address: seed.address,
            platforms: seed.platforms.iter().map(|p| p.to_lowercase()).collect(),
        })
        .collect();
    Ok(MemoryStore::new(restaurants))
}

async fn build_engine(source: &SearchSource) -> anyhow::Result<SearchEngine> {
    if let Some(path) = &source.from_file {
        let store = memory_store_from_file(path)?;
        tracing::info!(restaurants = store.len(), path = %path.display(), "searching file");
        return Ok(SearchEngine::new(Arc::new(store), SearchSettings::default()));
    }

    let config = tablescout_core::load_app_config()?;
    let pool_config = tablescout_db::PoolConfig::from_app_config(&config);
    let pool = tablescout_db::connect_pool(&config.database_url, pool_config).await?;
    let store = RetryingSearch::new(
        PgRestaurantStore::new(pool),
        config.lookup_max_retries,
        config.lookup_backoff_base_ms,
    );
    Ok(SearchEngine::new(
        Arc::new(store),
        SearchSettings::from_app_config(&config),
    ))
}

pub(crate) async fn run(command: SearchCommands) -> anyhow::Result<()> {
    match command {
        SearchCommands::Realtime {
            lat,
            lng,
            initial_radius,
            max_radius,
            min_results,
            buffer,
            zones,
            source,
        } => {
            let engine = build_engine(&source).await?;
            let outcome = engine
                .realtime(&RealtimeSearch {
                    center: SearchCenter::new(lat, lng)?,
                    initial_radius_km: initial_radius,
                    max_radius_km: max_radius,
                    min_results,
                    buffer_radius_km: buffer,
                    include_zones: zones,
                    platforms: source.platforms,
                    limit: source.limit,
                })
                .await?;

            let params = &outcome.search_params;
            println!(
                "final radius {:.2} km after {} attempt(s); {} result(s)",
                params.final_radius_km, params.search_attempts, outcome.total
            );
            if let Some(effective) = params.effective_radius_km {
                println!("effective radius {effective:.2} km");
            }
            if let Some(split) = outcome.core_buffer_distribution {
                println!(
                    "core {} / buffer {}",
                    split.core_results, split.buffer_results
                );
            }
            if let Some(z) = outcome.buffer_zones {
                println!(
                    "zones: inner {} (<= {:.2} km), middle {} (<= {:.2} km), outer {} (<= {:.2} km)",
                    z.inner_zone.count,
                    z.inner_zone.radius_km,
                    z.middle_zone.count,
                    z.middle_zone.radius_km,
                    z.outer_zone.count,
                    z.outer_zone.radius_km
                );
            }
            print_hits(&outcome.restaurants);
        }
        SearchCommands::Nearby {
            lat,
            lng,
            radius,
            buffer,
            source,
        } => {
            let engine = build_engine(&source).await?;
            let outcome = engine
                .nearby(&NearbyRequest {
                    center: SearchCenter::new(lat, lng)?,
                    radius_km: radius,
                    buffer_radius_km: buffer,
                    platforms: source.platforms,
                    limit: source.limit,
                    real_time: false,
                })
                .await?;

            println!(
                "{} result(s) within {:.2} km; platforms: {}",
                outcome.data.total,
                outcome
                    .data
                    .search_params
                    .effective_radius_km
                    .unwrap_or(radius),
                outcome.platforms_searched.join(", ")
            );
            if let Some(split) = outcome.data.distribution {
                println!(
                    "core {} / buffer {}",
                    split.core_radius_results, split.buffer_zone_results
                );
            }
            print_hits(&outcome.data.restaurants);
        }
    }

    Ok(())
}

fn print_hits(hits: &[RestaurantHit]) {
    if hits.is_empty() {
        println!("no restaurants found");
        return;
    }

    println!(
        "{:<6}{:<30}{:<16}{:>7}{:>10}",
        "ID", "NAME", "CUISINE", "RATING", "DIST KM"
    );
    for hit in hits {
        let r = &hit.restaurant;
        let name = if r.name.chars().count() > 28 {
            format!("{}...", r.name.chars().take(25).collect::<String>())
        } else {
            r.name.clone()
        };
        let rating = r
            .rating
            .map_or_else(|| "\u{2014}".to_string(), |v| format!("{v:.1}"));
        println!(
            "{:<6}{:<30}{:<16}{:>7}{:>10.1}",
            r.id,
            name,
            r.cuisine_type.as_deref().unwrap_or("\u{2014}"),
            rating,
            hit.distance_km
        );
    }
}
