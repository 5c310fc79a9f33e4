use crate::config::OpenWeatherMapConfig;
use crate::error::{AdvisorError, Result};
use crate::models::{Coordinates, CurrentWeather, WeatherLocation, WeatherReport};
use chrono::Utc;
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
    base_url: String,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    rain: Option<OwmRain>,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Option<OwmSys>,
    coord: OwmCoord,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.api_key.is_empty()
    }

    /// Fetch current conditions at a coordinate, metric units.
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherReport> {
        validate_coordinates(lat, lon)?;
        if !self.is_enabled() {
            return Err(AdvisorError::DataSourceUnavailable(
                "OpenWeatherMap is not configured".into(),
            ));
        }

        let response = self
            .client
            .get(self.weather_url(lat, lon))
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmCurrentResponse = response.json().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        Ok(convert_response(owm_response))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.weather_url(0.0, 0.0))
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn weather_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, lat, lon, self.config.api_key
        )
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AdvisorError::invalid(format!(
            "Coordinates out of range: lat={}, lon={}",
            lat, lon
        )));
    }
    Ok(())
}

fn convert_response(response: OwmCurrentResponse) -> WeatherReport {
    let (weather_condition, description) = response
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_default();

    WeatherReport {
        data: CurrentWeather {
            temperature: response.main.temp,
            humidity: response.main.humidity,
            pressure: response.main.pressure,
            rainfall: response.rain.map(|r| r.one_hour).unwrap_or(0.0),
            wind_speed: response.wind.map(|w| w.speed).unwrap_or(0.0),
            visibility: response.visibility,
            weather_condition,
            description,
        },
        location: WeatherLocation {
            city: response.name,
            country: response.sys.map(|s| s.country).unwrap_or_default(),
            coordinates: Coordinates {
                lat: response.coord.lat,
                lon: response.coord.lon,
            },
        },
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> OpenWeatherMapConfig {
        OpenWeatherMapConfig {
            api_key: "test_key".to_string(),
            enabled: true,
        }
    }

    const SAMPLE: &str = r#"{
        "coord": {"lon": 77.59, "lat": 12.97},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 24.3, "feels_like": 24.8, "pressure": 1012, "humidity": 83},
        "visibility": 8000,
        "wind": {"speed": 4.1, "deg": 250},
        "rain": {"1h": 0.42},
        "sys": {"country": "IN"},
        "name": "Bengaluru"
    }"#;

    #[test]
    fn converts_current_weather() {
        let raw: OwmCurrentResponse = serde_json::from_str(SAMPLE).unwrap();
        let report = convert_response(raw);
        assert_eq!(report.data.temperature, 24.3);
        assert_eq!(report.data.humidity, 83.0);
        assert_eq!(report.data.rainfall, 0.42);
        assert_eq!(report.data.weather_condition, "Rain");
        assert_eq!(report.data.description, "light rain");
        assert_eq!(report.data.visibility, Some(8000.0));
        assert_eq!(report.location.city, "Bengaluru");
        assert_eq!(report.location.country, "IN");
        assert_eq!(report.location.coordinates.lat, 12.97);
    }

    #[test]
    fn missing_rain_is_zero() {
        let raw: OwmCurrentResponse = serde_json::from_str(
            r#"{"coord": {"lon": 0, "lat": 0}, "main": {"temp": 30, "pressure": 1000, "humidity": 40}}"#,
        )
        .unwrap();
        let report = convert_response(raw);
        assert_eq!(report.data.rainfall, 0.0);
        assert_eq!(report.data.wind_speed, 0.0);
        assert!(report.data.weather_condition.is_empty());
    }

    #[test]
    fn metric_units_in_url() {
        let client = OpenWeatherMapClient::new(sample_config());
        let url = client.weather_url(12.5, 77.25);
        assert!(url.ends_with("/weather?lat=12.5&lon=77.25&appid=test_key&units=metric"));
    }

    #[tokio::test]
    async fn disabled_client_is_unavailable() {
        let mut config = sample_config();
        config.enabled = false;
        let client = OpenWeatherMapClient::new(config);
        let err = client.fetch_current(10.0, 10.0).await.unwrap_err();
        assert!(matches!(err, AdvisorError::DataSourceUnavailable(_)));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_invalid() {
        let client = OpenWeatherMapClient::new(sample_config());
        let err = client.fetch_current(120.0, 10.0).await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
    }
}
