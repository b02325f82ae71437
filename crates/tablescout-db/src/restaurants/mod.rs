//! Database operations for the `restaurants` table.

mod read;
mod types;
mod write;

pub use read::{bounding_box, count_active_restaurants, list_restaurants_in_box};
pub use types::{BoundingBox, RestaurantRow};
pub use write::upsert_restaurant;
