use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthStage {
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
    Maturity,
}

/// Fraction of the raw N/P/K deficiency to supply at a growth stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageMultipliers {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "Seedling",
            GrowthStage::Vegetative => "Vegetative",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::Fruiting => "Fruiting",
            GrowthStage::Maturity => "Maturity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seedling" => Some(GrowthStage::Seedling),
            "vegetative" => Some(GrowthStage::Vegetative),
            "flowering" => Some(GrowthStage::Flowering),
            "fruiting" => Some(GrowthStage::Fruiting),
            "maturity" => Some(GrowthStage::Maturity),
            _ => None,
        }
    }

    /// Like `from_str`, but an unknown stage is an input error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            AdvisorError::invalid(format!(
                "unknown growth stage '{}' (expected one of Seedling, Vegetative, Flowering, Fruiting, Maturity)",
                s
            ))
        })
    }

    pub fn all() -> &'static [GrowthStage] {
        &[
            GrowthStage::Seedling,
            GrowthStage::Vegetative,
            GrowthStage::Flowering,
            GrowthStage::Fruiting,
            GrowthStage::Maturity,
        ]
    }

    pub fn multipliers(&self) -> StageMultipliers {
        let (nitrogen, phosphorus, potassium) = match self {
            GrowthStage::Seedling => (0.3, 0.5, 0.3),
            GrowthStage::Vegetative => (0.5, 0.3, 0.4),
            GrowthStage::Flowering => (0.3, 0.4, 0.6),
            GrowthStage::Fruiting => (0.4, 0.3, 0.7),
            GrowthStage::Maturity => (0.2, 0.2, 0.3),
        };
        StageMultipliers {
            nitrogen,
            phosphorus,
            potassium,
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Part a product plays in the decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductRole {
    /// Straight nitrogen, e.g. urea
    Nitrogen,
    /// Combined nitrogen + phosphorus, e.g. DAP
    NitrogenPhosphorus,
    /// Balanced N-P-K blend
    Balanced,
    /// Straight potash, e.g. MOP
    Potassium,
}

impl ProductRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductRole::Nitrogen => "Nitrogen",
            ProductRole::NitrogenPhosphorus => "Nitrogen + Phosphorus",
            ProductRole::Balanced => "Balanced NPK",
            ProductRole::Potassium => "Potassium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerProduct {
    pub name: String,
    /// Name shown in plans, e.g. "DAP (Diammonium Phosphate)"
    pub display_name: String,
    #[serde(default)]
    pub role: Option<ProductRole>,
    pub nitrogen_pct: f64,
    pub phosphorus_pct: f64,
    pub potassium_pct: f64,
    /// Rupees per 100 kg
    pub price: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub application_method: String,
    #[serde(default)]
    pub timings: HashMap<GrowthStage, String>,
}

impl FertilizerProduct {
    pub fn nutrient_content(&self) -> NutrientContent {
        NutrientContent::new(self.nitrogen_pct, self.phosphorus_pct, self.potassium_pct)
    }

    pub fn timing_for(&self, stage: GrowthStage) -> &str {
        self.timings
            .get(&stage)
            .map(String::as_str)
            .unwrap_or("As per crop requirement")
    }
}

/// Fixed pH-correction bundle appended when soil is too acidic or alkaline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionBundle {
    pub name: String,
    pub application_rate: String,
    pub application_timing: String,
    pub cost_per_acre: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub application_method: String,
}

/// Crop N/P/K demand in kg/ha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropNutrientRequirement {
    pub crop: String,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    /// kg per acre at full nutrition
    pub base_yield: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanKind {
    Primary,
    Secondary,
    Potassium,
    Correction,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Primary => "Primary",
            PlanKind::Secondary => "Secondary",
            PlanKind::Potassium => "Potassium",
            PlanKind::Correction => "Micronutrient",
        }
    }
}

impl std::fmt::Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientContent {
    #[serde(rename = "N")]
    pub nitrogen_pct: f64,
    #[serde(rename = "P")]
    pub phosphorus_pct: f64,
    #[serde(rename = "K")]
    pub potassium_pct: f64,
}

impl NutrientContent {
    pub fn new(nitrogen_pct: f64, phosphorus_pct: f64, potassium_pct: f64) -> Self {
        Self {
            nitrogen_pct,
            phosphorus_pct,
            potassium_pct,
        }
    }

    pub fn none() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// One line of a fertilizer application plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerPlan {
    pub fertilizer_name: String,
    pub fertilizer_type: PlanKind,
    pub application_rate: String,
    /// Product mass in kg/acre, absent for fixed bundles
    pub rate_kg_per_acre: Option<f64>,
    pub application_timing: String,
    pub cost_per_acre: f64,
    pub nutrient_content: NutrientContent,
    pub benefits: Vec<String>,
    pub application_method: String,
}

impl FertilizerPlan {
    pub fn from_product(
        product: &FertilizerProduct,
        kind: PlanKind,
        rate_kg: f64,
        cost: f64,
        stage: GrowthStage,
    ) -> Self {
        Self {
            fertilizer_name: product.display_name.clone(),
            fertilizer_type: kind,
            application_rate: format!("{} kg/acre", rate_kg),
            rate_kg_per_acre: Some(rate_kg),
            application_timing: product.timing_for(stage).to_string(),
            cost_per_acre: cost,
            nutrient_content: product.nutrient_content(),
            benefits: product.benefits.clone(),
            application_method: product.application_method.clone(),
        }
    }

    pub fn from_bundle(bundle: &CorrectionBundle) -> Self {
        Self {
            fertilizer_name: bundle.name.clone(),
            fertilizer_type: PlanKind::Correction,
            application_rate: bundle.application_rate.clone(),
            rate_kg_per_acre: None,
            application_timing: bundle.application_timing.clone(),
            cost_per_acre: bundle.cost_per_acre,
            nutrient_content: NutrientContent::none(),
            benefits: bundle.benefits.clone(),
            application_method: bundle.application_method.clone(),
        }
    }

    pub fn with_method(mut self, method: Option<&str>) -> Self {
        if let Some(m) = method.filter(|m| !m.trim().is_empty()) {
            self.application_method = m.to_string();
        }
        self
    }
}

/// Crop section of a fertilizer request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropInfo {
    pub crop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_variety: Option<String>,
    pub growth_stage: Option<String>,
    pub cultivation_area: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_fertilizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_per_acre: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_method: Option<String>,
}
