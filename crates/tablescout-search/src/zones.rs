//! Concentric zone distribution for a result set.

use serde::Serialize;
use tablescout_core::{Restaurant, SearchCenter};

use crate::distance::distance_from;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    /// Outer edge of the band.
    pub radius_km: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferZones {
    pub inner_zone: Zone,
    pub middle_zone: Zone,
    pub outer_zone: Zone,
}

impl BufferZones {
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner_zone.count + self.middle_zone.count + self.outer_zone.count
    }
}

/// Split `restaurants` into three equal-width bands over `[0, radius_km]`.
///
/// Bands are `[0, r/3]`, `(r/3, 2r/3]`, `(2r/3, r]`; a restaurant exactly on a
/// boundary falls into the lower band. Anything past `r` is counted in the
/// outer band so the counts always sum to the input length.
#[must_use]
pub fn partition<'a, I>(center: SearchCenter, restaurants: I, radius_km: f64) -> BufferZones
where
    I: IntoIterator<Item = &'a Restaurant>,
{
    let inner_edge = radius_km / 3.0;
    let middle_edge = radius_km * 2.0 / 3.0;

    let (mut inner, mut middle, mut outer) = (0usize, 0usize, 0usize);
    for restaurant in restaurants {
        let d = distance_from(center, restaurant);
        if d <= inner_edge {
            inner += 1;
        } else if d <= middle_edge {
            middle += 1;
        } else {
            outer += 1;
        }
    }

    BufferZones {
        inner_zone: Zone {
            radius_km: inner_edge,
            count: inner,
        },
        middle_zone: Zone {
            radius_km: middle_edge,
            count: middle,
        },
        outer_zone: Zone {
            radius_km,
            count: outer,
        },
    }
}
