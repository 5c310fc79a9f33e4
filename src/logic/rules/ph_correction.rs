use super::{PlanContext, PlanRule};
use crate::models::{FertilizerPlan, PhStatus};

/// Soil amendment for acidic or alkaline soil
///
/// Acidic (pH < 6.0): zinc sulfate with lime. Alkaline (pH > 7.5): iron
/// sulfate with sulfur. Both are fixed bundles from the catalog.
pub struct PhCorrectionRule;

impl PlanRule for PhCorrectionRule {
    fn id(&self) -> &'static str {
        "ph_correction"
    }

    fn name(&self) -> &'static str {
        "pH Correction"
    }

    fn evaluate(&self, ctx: &PlanContext) -> Option<FertilizerPlan> {
        let bundle = match PhStatus::from_ph(ctx.ph) {
            PhStatus::Acidic => &ctx.catalog.acid_correction,
            PhStatus::Alkaline => &ctx.catalog.alkaline_correction,
            PhStatus::Neutral => return None,
        };
        Some(FertilizerPlan::from_bundle(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{GrowthStage, NutrientLevels, PlanKind};

    fn ctx(catalog: &Catalog, ph: f64) -> PlanContext<'_> {
        PlanContext {
            catalog,
            need: NutrientLevels::default(),
            ph,
            stage: GrowthStage::Seedling,
        }
    }

    #[test]
    fn lime_for_acidic_soil() {
        let catalog = Catalog::builtin();
        let plan = PhCorrectionRule.evaluate(&ctx(&catalog, 5.2)).unwrap();
        assert_eq!(plan.fertilizer_name, "Zinc Sulfate + Lime");
        assert_eq!(plan.cost_per_acre, 350.0);
        assert_eq!(plan.fertilizer_type, PlanKind::Correction);
        assert_eq!(plan.rate_kg_per_acre, None);
    }

    #[test]
    fn sulfur_for_alkaline_soil() {
        let catalog = Catalog::builtin();
        let plan = PhCorrectionRule.evaluate(&ctx(&catalog, 8.1)).unwrap();
        assert_eq!(plan.fertilizer_name, "Iron Sulfate + Sulfur");
        assert_eq!(plan.cost_per_acre, 400.0);
    }

    #[test]
    fn nothing_for_neutral_soil() {
        let catalog = Catalog::builtin();
        assert!(PhCorrectionRule.evaluate(&ctx(&catalog, 6.0)).is_none());
        assert!(PhCorrectionRule.evaluate(&ctx(&catalog, 7.5)).is_none());
    }
}
