use serde::{Deserialize, Serialize};

/// Coordinates and region for a city the backend knows about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityInfo {
    /// Latitude.
    pub lat: f64,

    /// Longitude.
    pub lon: f64,

    /// Administrative region.
    pub region: String,
}
