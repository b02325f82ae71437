//! Adaptive-radius restaurant search.
//!
//! The engine drives four stages against any [`NearbySearch`] store: radius
//! expansion, optional buffer augmentation, distance annotation, and optional
//! zone and core/buffer breakdowns.

pub mod buffer;
pub mod distance;
pub mod engine;
pub mod expander;
pub mod lookup;
pub mod memory;
pub mod retry;
pub mod zones;

pub use buffer::{augment, tally, Augmented, CoreBufferDistribution};
pub use distance::{annotate, haversine_km, round_km, select_nearest, EARTH_RADIUS_KM};
pub use engine::{
    NearbyData, NearbyDistribution, NearbyOutcome, NearbyParams, NearbyRequest, RealtimeOutcome,
    RealtimeParams, RealtimeSearch, SearchEngine, SearchError, SearchSettings, MIN_RADIUS_KM,
};
pub use expander::{ExpansionOutcome, ExpansionRequest, RadiusExpander, MAX_ATTEMPTS};
pub use lookup::{LookupError, NearbyQuery, NearbySearch};
pub use memory::MemoryStore;
pub use retry::RetryingSearch;
pub use zones::{partition, BufferZones, Zone};
