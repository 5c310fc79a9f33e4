use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kharif" | "monsoon" => Some(Season::Kharif),
            "rabi" | "winter" => Some(Season::Rabi),
            "zaid" | "summer" => Some(Season::Zaid),
            _ => None,
        }
    }

    pub fn all() -> &'static [Season] {
        &[Season::Kharif, Season::Rabi, Season::Zaid]
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive acceptable range for one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance to the nearest bound; zero inside the band.
    pub fn distance(&self, value: f64) -> f64 {
        if self.contains(value) {
            0.0
        } else {
            (value - self.min).abs().min((value - self.max).abs())
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Growing envelope of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequirementBand {
    pub temperature: Band,
    pub humidity_min: f64,
    pub rainfall_min: f64,
    pub ph: Band,
    pub nitrogen_min: f64,
    pub phosphorus_min: f64,
    pub potassium_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    pub requirements: RequirementBand,
    /// Tonnes per acre
    pub yield_per_acre: f64,
    /// Price per tonne
    pub market_price: f64,
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub growing_tips: Vec<String>,
}

impl CropProfile {
    pub fn grows_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

/// Crop suggestion returned to callers and persisted with the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop_name: String,
    pub confidence_score: f64,
    pub expected_yield: f64,
    pub profit_margin: f64,
    pub growing_tips: Vec<String>,
    pub market_price: f64,
    pub season_suitability: Vec<Season>,
}

/// Market section of a crop request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInput {
    pub season: Option<String>,
    pub farm_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
