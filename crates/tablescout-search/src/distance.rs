//! Great-circle distance and the display annotation built on it.
//!
//! Every radius decision in the crate (store cutoff, zone bands, core/buffer
//! split) goes through [`haversine_km`] on unrounded values. Rounding happens
//! only in [`annotate`], after ordering is fixed.

use std::cmp::Ordering;

use tablescout_core::{Restaurant, RestaurantHit, SearchCenter};

/// Mean Earth radius (IUGG) in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Great-circle distance between two lat/lng points in kilometers.
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Clamp guards asin against a > 1 from float error on antipodal points.
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Exact distance from `center` to a restaurant.
#[must_use]
pub fn distance_from(center: SearchCenter, restaurant: &Restaurant) -> f64 {
    haversine_km(
        center.latitude,
        center.longitude,
        restaurant.latitude,
        restaurant.longitude,
    )
}

/// Round a distance to one decimal place for display.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

fn by_distance_then_id(a: &(f64, Restaurant), b: &(f64, Restaurant)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id))
}

/// Keep the `limit` nearest candidates within `radius_km` of `center`, nearest first.
///
/// Stores use this as their final cutoff so radius membership agrees with the
/// zone and buffer classification done later.
#[must_use]
pub fn select_nearest<I>(
    center: SearchCenter,
    radius_km: f64,
    limit: usize,
    candidates: I,
) -> Vec<Restaurant>
where
    I: IntoIterator<Item = Restaurant>,
{
    let mut within: Vec<(f64, Restaurant)> = candidates
        .into_iter()
        .map(|r| (distance_from(center, &r), r))
        .filter(|(d, _)| *d <= radius_km)
        .collect();
    within.sort_by(by_distance_then_id);
    within.truncate(limit);
    within.into_iter().map(|(_, r)| r).collect()
}

/// Attach display distances and order the set nearest first.
///
/// Sorting uses exact distance (ties broken by id), so the rounded
/// `distance_km` values are non-decreasing down the list.
#[must_use]
pub fn annotate(center: SearchCenter, restaurants: Vec<Restaurant>) -> Vec<RestaurantHit> {
    let mut measured: Vec<(f64, Restaurant)> = restaurants
        .into_iter()
        .map(|r| (distance_from(center, &r), r))
        .collect();
    measured.sort_by(by_distance_then_id);
    measured
        .into_iter()
        .map(|(d, restaurant)| RestaurantHit {
            restaurant,
            distance_km: round_km(d),
        })
        .collect()
}
