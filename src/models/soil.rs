use super::conditions::SoilInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "Low",
            NutrientLevel::Medium => "Medium",
            NutrientLevel::High => "High",
        }
    }

    /// Classify against Medium/High lower bounds.
    pub fn classify(value: f64, medium: f64, high: f64) -> Self {
        if value >= high {
            NutrientLevel::High
        } else if value >= medium {
            NutrientLevel::Medium
        } else {
            NutrientLevel::Low
        }
    }
}

impl std::fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhStatus {
    Acidic,
    Neutral,
    Alkaline,
}

impl PhStatus {
    pub fn from_ph(ph: f64) -> Self {
        if ph < 6.0 {
            PhStatus::Acidic
        } else if ph > 7.5 {
            PhStatus::Alkaline
        } else {
            PhStatus::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhStatus::Acidic => "Acidic",
            PhStatus::Neutral => "Neutral",
            PhStatus::Alkaline => "Alkaline",
        }
    }
}

impl std::fmt::Display for PhStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FertilityRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl FertilityRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            FertilityRating::Excellent
        } else if score >= 60.0 {
            FertilityRating::Good
        } else if score >= 40.0 {
            FertilityRating::Fair
        } else {
            FertilityRating::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FertilityRating::Poor => "Poor",
            FertilityRating::Fair => "Fair",
            FertilityRating::Good => "Good",
            FertilityRating::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for FertilityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientStatus {
    pub nitrogen: NutrientLevel,
    pub phosphorus: NutrientLevel,
    pub potassium: NutrientLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilAnalysis {
    pub nutrient_status: NutrientStatus,
    pub ph_status: PhStatus,
    pub moisture_status: Option<String>,
    pub fertility_score: f64,
    pub overall_quality: FertilityRating,
}

/// Soil analysis together with advice and the values it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReport {
    pub soil_analysis: SoilAnalysis,
    pub recommendations: Vec<String>,
    pub input_values: SoilInput,
}

/// Soil status block of a fertilizer response, on the kg/ha scale used by soil labs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilStatus {
    pub nitrogen_status: NutrientLevel,
    pub phosphorus_status: NutrientLevel,
    pub potassium_status: NutrientLevel,
    pub ph_status: PhStatus,
    pub overall_fertility: FertilityRating,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrient_level_boundaries() {
        assert_eq!(NutrientLevel::classify(39.9, 40.0, 80.0), NutrientLevel::Low);
        assert_eq!(NutrientLevel::classify(40.0, 40.0, 80.0), NutrientLevel::Medium);
        assert_eq!(NutrientLevel::classify(80.0, 40.0, 80.0), NutrientLevel::High);
    }

    #[test]
    fn ph_status_boundaries() {
        assert_eq!(PhStatus::from_ph(5.9), PhStatus::Acidic);
        assert_eq!(PhStatus::from_ph(6.0), PhStatus::Neutral);
        assert_eq!(PhStatus::from_ph(7.5), PhStatus::Neutral);
        assert_eq!(PhStatus::from_ph(7.6), PhStatus::Alkaline);
    }

    #[test]
    fn fertility_rating_from_score() {
        assert_eq!(FertilityRating::from_score(100.0), FertilityRating::Excellent);
        assert_eq!(FertilityRating::from_score(80.0), FertilityRating::Excellent);
        assert_eq!(FertilityRating::from_score(79.9), FertilityRating::Good);
        assert_eq!(FertilityRating::from_score(40.0), FertilityRating::Fair);
        assert_eq!(FertilityRating::from_score(0.0), FertilityRating::Poor);
    }
}
