use crate::models::{FertilizerPlan, GrowthStage, NutrientLevels};

/// Product mass (kg/acre) that supplies `need` kg of a nutrient at `percent` content.
///
/// Formula: need × 100 ÷ nutrient percentage, rounded to whole kg.
pub fn fertilizer_rate(need: f64, percent: f64) -> f64 {
    (need * 100.0 / percent).round()
}

/// Cost in rupees of `rate` kg at `price_per_100kg`, rounded.
pub fn application_cost(rate: f64, price_per_100kg: f64) -> f64 {
    (rate * price_per_100kg / 100.0).round()
}

/// Deficiency scaled by the share a growth stage should receive now.
pub fn adjusted_need(deficiency: &NutrientLevels, stage: GrowthStage) -> NutrientLevels {
    let m = stage.multipliers();
    NutrientLevels::new(
        deficiency.nitrogen * m.nitrogen,
        deficiency.phosphorus * m.phosphorus,
        deficiency.potassium * m.potassium,
    )
}

pub fn cost_per_acre(plans: &[FertilizerPlan]) -> f64 {
    plans.iter().map(|p| p.cost_per_acre).sum()
}

/// Plan cost over the whole cultivated area.
pub fn total_cost(plans: &[FertilizerPlan], area_acres: f64) -> f64 {
    cost_per_acre(plans) * area_acres
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_whole_kg() {
        assert_eq!(fertilizer_rate(50.0, 46.0), 109.0);
        assert_eq!(fertilizer_rate(50.0, 18.0), 278.0);
        assert_eq!(fertilizer_rate(0.0, 60.0), 0.0);
    }

    #[test]
    fn cost_uses_price_per_hundred_kg() {
        assert_eq!(application_cost(278.0, 400.0), 1112.0);
        assert_eq!(application_cost(109.0, 300.0), 327.0);
    }

    #[test]
    fn vegetative_adjustment() {
        let deficiency = NutrientLevels::new(100.0, 50.0, 0.0);
        let need = adjusted_need(&deficiency, GrowthStage::Vegetative);
        assert_eq!(need.nitrogen, 50.0);
        assert!((need.phosphorus - 15.0).abs() < 1e-9);
        assert_eq!(need.potassium, 0.0);
    }
}
