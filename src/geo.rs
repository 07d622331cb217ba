//! Geographic points for the location radius filter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographical point with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CatalogError::invalid_argument(format!(
                "latitude {lat} must be between -90 and 90"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CatalogError::invalid_argument(format!(
                "longitude {lon} must be between -180 and 180"
            )));
        }

        Ok(GeoPoint { lat, lon })
    }

    /// Haversine distance to another point in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl FromStr for GeoPoint {
    type Err = CatalogError;

    /// Parse `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CatalogError::invalid_argument(format!("'{s}' is not 'lat,lon'")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| CatalogError::invalid_argument(format!("latitude '{lat}': {e}")))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| CatalogError::invalid_argument(format!("longitude '{lon}': {e}")))?;
        GeoPoint::new(lat, lon)
    }
}
