//! Geographic primitives shared by the search core, the store and the API.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The point a search radiates from.
///
/// Immutable for the lifetime of one request; construct through
/// [`SearchCenter::new`] to get range checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchCenter {
    pub latitude: f64,
    pub longitude: f64,
}

impl SearchCenter {
    /// Build a center after checking both coordinates are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLatitude`] or [`CoreError::InvalidLongitude`]
    /// when a coordinate is NaN, infinite, or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let center = Self {
            latitude,
            longitude,
        };
        center.validate()?;
        Ok(center)
    }

    /// Re-check a center that may have been deserialized directly.
    ///
    /// # Errors
    ///
    /// See [`SearchCenter::new`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bangkok() {
        let center = SearchCenter::new(13.7563, 100.5018).expect("valid center");
        assert!((center.latitude - 13.7563).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_inclusive_bounds() {
        assert!(SearchCenter::new(90.0, 180.0).is_ok());
        assert!(SearchCenter::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            SearchCenter::new(90.5, 0.0),
            Err(CoreError::InvalidLatitude(90.5))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            SearchCenter::new(0.0, -180.01),
            Err(CoreError::InvalidLongitude(-180.01))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(matches!(
            SearchCenter::new(f64::NAN, 0.0),
            Err(CoreError::InvalidLatitude(_))
        ));
        assert!(matches!(
            SearchCenter::new(0.0, f64::INFINITY),
            Err(CoreError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn deserialized_center_can_be_revalidated() {
        let center: SearchCenter =
            serde_json::from_str(r#"{"latitude": 123.0, "longitude": 0.0}"#).expect("parse");
        assert!(center.validate().is_err());
    }
}
