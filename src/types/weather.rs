use serde::{Deserialize, Serialize};

/// A 7-day weather report for one of the known cities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    /// City the report was requested for.
    pub city: String,

    /// Administrative region of the city.
    pub region: String,

    /// Latitude of the city.
    pub lat: f64,

    /// Longitude of the city.
    pub lon: f64,

    /// Conditions right now. Fields are absent when the upstream provider
    /// has no current observation.
    pub current: CurrentConditions,

    /// Daily forecast, today first.
    pub forecast: Vec<DailyForecast>,

    /// Aggregates over the forecast window.
    pub summary: WeatherSummary,
}

/// Current observed conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,

    /// Wind speed in km/h.
    pub windspeed: Option<f64>,

    /// WMO weather interpretation code.
    pub weather_code: Option<i64>,
}

/// One day of forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    /// ISO date of the forecast day.
    pub date: String,

    /// Daily maximum temperature in degrees Celsius.
    pub temp_max: Option<f64>,

    /// Daily minimum temperature in degrees Celsius.
    pub temp_min: Option<f64>,

    /// Precipitation sum in millimeters.
    pub precipitation_mm: Option<f64>,

    /// Maximum wind speed in km/h.
    pub wind_max_kmh: Option<f64>,

    /// WMO weather interpretation code.
    pub weather_code: Option<i64>,
}

/// Aggregates over the forecast window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    /// Total precipitation over the window, millimeters.
    pub total_precipitation_mm: f64,

    /// Highest daily maximum over the window, degrees Celsius.
    pub max_temperature: f64,

    /// Number of days with more than 1 mm of rain.
    pub rain_days: u32,
}
