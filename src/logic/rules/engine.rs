use super::{
    balanced::BalancedRule, ph_correction::PhCorrectionRule, potassium::PotassiumRule,
    primary::PrimaryRule, PlanContext, PlanRule,
};
use crate::catalog::Catalog;
use crate::error::{AdvisorError, Result};
use crate::logic::calculations::adjusted_need;
use crate::models::{FertilizerPlan, GrowthStage, NutrientLevels};
use tracing::debug;

pub const DEFAULT_MAX_PLANS: usize = 4;

/// Runs the plan rules in their fixed order and keeps the first `max_plans` entries.
pub struct FertilizerPlanner {
    rules: Vec<Box<dyn PlanRule>>,
    max_plans: usize,
}

impl FertilizerPlanner {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn PlanRule>> = vec![
            Box::new(PrimaryRule),
            Box::new(BalancedRule),
            Box::new(PotassiumRule),
            Box::new(PhCorrectionRule),
        ];

        Self {
            rules,
            max_plans: DEFAULT_MAX_PLANS,
        }
    }

    pub fn with_max_plans(mut self, max_plans: usize) -> Self {
        self.max_plans = max_plans;
        self
    }

    pub fn evaluate(&self, ctx: &PlanContext) -> Vec<FertilizerPlan> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let plan = rule.evaluate(ctx);
                if plan.is_some() {
                    debug!("Rule '{}' matched", rule.id());
                }
                plan
            })
            .take(self.max_plans)
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }

    /// Turn a crop requirement and a soil test into an ordered plan.
    pub fn resolve(
        &self,
        catalog: &Catalog,
        requirement: &NutrientLevels,
        measured: &NutrientLevels,
        ph: f64,
        stage: GrowthStage,
    ) -> Result<Vec<FertilizerPlan>> {
        requirement.validate("requirement")?;
        measured.validate("soil")?;
        if !ph.is_finite() {
            return Err(AdvisorError::invalid("pH must be a finite number"));
        }

        let deficiency = requirement.deficiency(measured);
        let need = adjusted_need(&deficiency, stage);
        debug!(
            "Adjusted need at {}: N {:.1}, P {:.1}, K {:.1}",
            stage, need.nitrogen, need.phosphorus, need.potassium
        );

        let ctx = PlanContext {
            catalog,
            need,
            ph,
            stage,
        };
        Ok(self.evaluate(&ctx))
    }
}

impl Default for FertilizerPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a plan with the default rule set and cap.
pub fn resolve_fertilizer_plan(
    catalog: &Catalog,
    requirement: &NutrientLevels,
    measured: &NutrientLevels,
    ph: f64,
    stage: GrowthStage,
) -> Result<Vec<FertilizerPlan>> {
    FertilizerPlanner::new().resolve(catalog, requirement, measured, ph, stage)
}
