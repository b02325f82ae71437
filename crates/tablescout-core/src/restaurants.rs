use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, SearchCenter};

/// A restaurant as the store knows it. Carries no distance; see [`RestaurantHit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine_type: Option<String>,
    pub rating: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl Restaurant {
    /// `true` when the restaurant is listed on at least one of `wanted`.
    /// An empty `wanted` set matches everything.
    #[must_use]
    pub fn listed_on_any(&self, wanted: &[String]) -> bool {
        wanted.is_empty()
            || self
                .platforms
                .iter()
                .any(|p| wanted.iter().any(|w| w.eq_ignore_ascii_case(p)))
    }
}

/// One restaurant as seen from one search center.
///
/// `distance_km` belongs to the search that produced it and is rounded for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantHit {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSeed {
    pub name: String,
    pub cuisine_type: Option<String>,
    pub rating: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantsFile {
    pub restaurants: Vec<RestaurantSeed>,
}

/// Load and validate the restaurant seed file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_restaurants(path: &Path) -> Result<RestaurantsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RestaurantsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: RestaurantsFile = serde_yaml::from_str(&content)?;
    validate_restaurants(&file)?;
    Ok(file)
}

fn validate_restaurants(file: &RestaurantsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for seed in &file.restaurants {
        if seed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "restaurant name must be non-empty".to_string(),
            ));
        }

        SearchCenter::new(seed.latitude, seed.longitude).map_err(|e| {
            ConfigError::Validation(format!("restaurant '{}': {e}", seed.name))
        })?;

        if let Some(rating) = seed.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ConfigError::Validation(format!(
                    "restaurant '{}' has rating {rating}; must be between 0 and 5",
                    seed.name
                )));
            }
        }

        // Same name at the same spot is the upsert key in the store.
        let key = (
            seed.name.to_lowercase(),
            seed.latitude.to_bits(),
            seed.longitude.to_bits(),
        );
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant: '{}' at ({}, {})",
                seed.name, seed.latitude, seed.longitude
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(name: &str, lat: f64, lng: f64) -> RestaurantSeed {
        RestaurantSeed {
            name: name.to_string(),
            cuisine_type: Some("thai".to_string()),
            rating: Some(4.2),
            latitude: lat,
            longitude: lng,
            address: None,
            platforms: vec!["grab".to_string()],
        }
    }

    fn restaurant(platforms: &[&str]) -> Restaurant {
        Restaurant {
            id: 1,
            name: "Jay Fai".to_string(),
            cuisine_type: Some("thai".to_string()),
            rating: Some(4.8),
            latitude: 13.7527,
            longitude: 100.5048,
            address: None,
            platforms: platforms.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn validate_accepts_distinct_restaurants() {
        let file = RestaurantsFile {
            restaurants: vec![seed("A", 13.75, 100.50), seed("A", 13.76, 100.50)],
        };
        assert!(validate_restaurants(&file).is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let file = RestaurantsFile {
            restaurants: vec![seed("  ", 13.75, 100.50)],
        };
        let err = validate_restaurants(&file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_bad_coordinates() {
        let file = RestaurantsFile {
            restaurants: vec![seed("Nowhere", 95.0, 100.50)],
        };
        let err = validate_restaurants(&file).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn validate_rejects_rating_out_of_range() {
        let mut bad = seed("Overrated", 13.75, 100.50);
        bad.rating = Some(7.5);
        let file = RestaurantsFile {
            restaurants: vec![bad],
        };
        assert!(matches!(
            validate_restaurants(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicates_case_insensitively() {
        let file = RestaurantsFile {
            restaurants: vec![seed("Som Tam", 13.75, 100.50), seed("SOM TAM", 13.75, 100.50)],
        };
        let err = validate_restaurants(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn load_restaurants_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("restaurants.yaml");
        let file = load_restaurants(&path).expect("failed to load restaurants.yaml");
        assert!(!file.restaurants.is_empty());
    }

    #[test]
    fn parses_yaml_with_default_platforms() {
        let yaml = r"
restaurants:
  - name: Thipsamai
    cuisine_type: thai
    rating: 4.5
    latitude: 13.7526
    longitude: 100.5047
";
        let file: RestaurantsFile = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(file.restaurants.len(), 1);
        assert!(file.restaurants[0].platforms.is_empty());
        assert!(file.restaurants[0].address.is_none());
    }

    #[test]
    fn platform_filter_matches_case_insensitively() {
        let r = restaurant(&["Grab", "LineMan"]);
        assert!(r.listed_on_any(&["grab".to_string()]));
        assert!(!r.listed_on_any(&["foodpanda".to_string()]));
        assert!(r.listed_on_any(&[]));
    }

    #[test]
    fn hit_serializes_flat_with_distance() {
        let hit = RestaurantHit {
            restaurant: restaurant(&[]),
            distance_km: 2.3,
        };
        let json = serde_json::to_value(&hit).expect("serialize");
        assert_eq!(json["name"], "Jay Fai");
        assert_eq!(json["distance_km"], 2.3);
        assert_eq!(json["cuisine_type"], "thai");
    }
}
