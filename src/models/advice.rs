use super::conditions::{ClimateInput, NutrientLevels, SoilInput};
use super::crop::{CropRecommendation, Location, MarketInput};
use super::fertilizer::{CropInfo, FarmDetails, FertilizerPlan};
use super::soil::{FertilityRating, SoilStatus};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_USER: &str = "anonymous";

pub fn user_or_anonymous(user_id: Option<&str>) -> String {
    user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(ANONYMOUS_USER)
        .to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    pub soil_data: Option<SoilInput>,
    pub climate_data: Option<ClimateInput>,
    pub market_data: Option<MarketInput>,
}

impl CropRequest {
    pub fn user(&self) -> String {
        user_or_anonymous(self.user_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSummary {
    pub season_suitability: String,
    pub irrigation_requirement: String,
    pub climate_risks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub optimal_farm_size: String,
    pub season: String,
    pub investment_capacity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAnalysisSummary {
    pub soil_quality: FertilityRating,
    pub climate_suitability: ClimateSummary,
    pub market_factors: MarketSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAdvice {
    pub recommendations: Vec<CropRecommendation>,
    pub analysis_summary: CropAnalysisSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub crop_info: Option<CropInfo>,
    pub soil_data: Option<SoilInput>,
    pub farm_details: Option<FarmDetails>,
}

impl FertilizerRequest {
    pub fn user(&self) -> String {
        user_or_anonymous(self.user_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRequirements {
    pub nitrogen_needed: f64,
    pub phosphorus_needed: f64,
    pub potassium_needed: f64,
}

impl From<NutrientLevels> for NutrientRequirements {
    fn from(levels: NutrientLevels) -> Self {
        Self {
            nitrogen_needed: levels.nitrogen,
            phosphorus_needed: levels.phosphorus,
            potassium_needed: levels.potassium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerSummary {
    pub soil_status: SoilStatus,
    pub nutrient_requirements: NutrientRequirements,
    pub cost_per_acre: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerAdvice {
    pub recommendations: Vec<FertilizerPlan>,
    pub total_cost: f64,
    pub expected_yield_increase: String,
    pub analysis_summary: FertilizerSummary,
}
