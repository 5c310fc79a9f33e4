use crate::error::{AdvisorError, Result};
use crate::models::{
    FertilityRating, NutrientLevel, NutrientLevels, NutrientStatus, PhStatus, SoilAnalysis,
    SoilInput, SoilReport, SoilStatus,
};

/// Field-test scale: Medium and High lower bounds.
const FIELD_NITROGEN: (f64, f64) = (40.0, 80.0);
const FIELD_PHOSPHORUS: (f64, f64) = (20.0, 50.0);
const FIELD_POTASSIUM: (f64, f64) = (200.0, 400.0);

/// Lab scale (kg/ha) used in fertilizer summaries.
const LAB_NITROGEN: (f64, f64) = (240.0, 480.0);
const LAB_PHOSPHORUS: (f64, f64) = (11.0, 22.0);
const LAB_POTASSIUM: (f64, f64) = (120.0, 280.0);

const PH_OPTIMUM: f64 = 6.75;
const POINTS_PER_FACTOR: f64 = 25.0;

/// Analyze a field soil test and produce advice.
pub fn analyze(input: &SoilInput) -> Result<SoilReport> {
    let nutrients = NutrientLevels::new(
        positive(input.nitrogen, "nitrogen")?,
        positive(input.phosphorus, "phosphorus")?,
        positive(input.potassium, "potassium")?,
    );
    let ph = positive(input.ph, "ph")?;

    let soil_analysis = analyze_levels(&nutrients, ph, input.moisture);
    let recommendations = soil_recommendations(&soil_analysis);

    Ok(SoilReport {
        soil_analysis,
        recommendations,
        input_values: input.clone(),
    })
}

pub fn analyze_levels(nutrients: &NutrientLevels, ph: f64, moisture: Option<f64>) -> SoilAnalysis {
    let nutrient_status = NutrientStatus {
        nitrogen: NutrientLevel::classify(nutrients.nitrogen, FIELD_NITROGEN.0, FIELD_NITROGEN.1),
        phosphorus: NutrientLevel::classify(
            nutrients.phosphorus,
            FIELD_PHOSPHORUS.0,
            FIELD_PHOSPHORUS.1,
        ),
        potassium: NutrientLevel::classify(
            nutrients.potassium,
            FIELD_POTASSIUM.0,
            FIELD_POTASSIUM.1,
        ),
    };

    let score = fertility_score(nutrients, ph);

    SoilAnalysis {
        nutrient_status,
        ph_status: PhStatus::from_ph(ph),
        moisture_status: moisture.map(|m| moisture_status(m).to_string()),
        fertility_score: score.round(),
        overall_quality: FertilityRating::from_score(score),
    }
}

/// Field-test fertility, 0-100 before rounding.
pub fn fertility_score(nutrients: &NutrientLevels, ph: f64) -> f64 {
    above_points(nutrients.nitrogen, FIELD_NITROGEN.0)
        + above_points(nutrients.phosphorus, FIELD_PHOSPHORUS.0)
        + above_points(nutrients.potassium, FIELD_POTASSIUM.0)
        + ph_points(ph, 10.0)
}

/// Lab-scale soil status block for fertilizer advice.
pub fn soil_status(nutrients: &NutrientLevels, ph: f64) -> SoilStatus {
    SoilStatus {
        nitrogen_status: NutrientLevel::classify(nutrients.nitrogen, LAB_NITROGEN.0, LAB_NITROGEN.1),
        phosphorus_status: NutrientLevel::classify(
            nutrients.phosphorus,
            LAB_PHOSPHORUS.0,
            LAB_PHOSPHORUS.1,
        ),
        potassium_status: NutrientLevel::classify(
            nutrients.potassium,
            LAB_POTASSIUM.0,
            LAB_POTASSIUM.1,
        ),
        ph_status: PhStatus::from_ph(ph),
        overall_fertility: overall_fertility(nutrients, ph),
    }
}

pub fn overall_fertility(nutrients: &NutrientLevels, ph: f64) -> FertilityRating {
    let score = at_least_points(nutrients.nitrogen, LAB_NITROGEN.0)
        + at_least_points(nutrients.phosphorus, LAB_PHOSPHORUS.0)
        + at_least_points(nutrients.potassium, LAB_POTASSIUM.0)
        + ph_points(ph, 5.0);
    FertilityRating::from_score(score)
}

pub fn soil_recommendations(analysis: &SoilAnalysis) -> Vec<String> {
    let mut recommendations = Vec::new();
    let status = &analysis.nutrient_status;

    if status.nitrogen == NutrientLevel::Low {
        recommendations.push("Apply nitrogen-rich fertilizers like urea or ammonium sulfate".into());
    }
    if status.phosphorus == NutrientLevel::Low {
        recommendations.push("Add phosphorus fertilizer or bone meal to improve P levels".into());
    }
    if status.potassium == NutrientLevel::Low {
        recommendations.push("Use potassium sulfate or wood ash to boost K levels".into());
    }

    match analysis.ph_status {
        PhStatus::Acidic => {
            recommendations.push("Add lime to raise soil pH and reduce acidity".into())
        }
        PhStatus::Alkaline => {
            recommendations.push("Add sulfur or organic matter to lower soil pH".into())
        }
        PhStatus::Neutral => {}
    }

    recommendations
}

fn moisture_status(moisture: f64) -> &'static str {
    if moisture < 20.0 {
        "Dry"
    } else if moisture <= 60.0 {
        "Adequate"
    } else {
        "Waterlogged"
    }
}

/// Full points strictly above `threshold`, proportional otherwise.
fn above_points(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        POINTS_PER_FACTOR
    } else {
        value / threshold * POINTS_PER_FACTOR
    }
}

fn at_least_points(value: f64, threshold: f64) -> f64 {
    if value >= threshold {
        POINTS_PER_FACTOR
    } else {
        value / threshold * POINTS_PER_FACTOR
    }
}

fn ph_points(ph: f64, penalty_per_unit: f64) -> f64 {
    if (6.0..=7.5).contains(&ph) {
        POINTS_PER_FACTOR
    } else {
        (POINTS_PER_FACTOR - (ph - PH_OPTIMUM).abs() * penalty_per_unit).max(0.0)
    }
}

fn positive(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(AdvisorError::invalid(format!(
            "{} must be a positive number (got {})",
            field, v
        ))),
        None => Err(AdvisorError::invalid(
            "Required soil parameters missing: N, P, K, pH",
        )),
    }
}
