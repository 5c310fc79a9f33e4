use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a point, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// mm in the last hour
    pub rainfall: f64,
    /// m/s
    pub wind_speed: f64,
    /// metres
    pub visibility: Option<f64>,
    pub weather_condition: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub data: CurrentWeather,
    pub location: WeatherLocation,
    pub fetched_at: DateTime<Utc>,
}
