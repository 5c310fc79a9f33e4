pub mod balanced;
pub mod engine;
pub mod ph_correction;
pub mod potassium;
pub mod primary;

pub use engine::{FertilizerPlanner, DEFAULT_MAX_PLANS};

use crate::catalog::Catalog;
use crate::models::{FertilizerPlan, GrowthStage, NutrientLevels};

/// Inputs shared by every plan rule.
pub struct PlanContext<'a> {
    pub catalog: &'a Catalog,
    /// Deficiency already scaled by the growth-stage multipliers (kg/ha)
    pub need: NutrientLevels,
    pub ph: f64,
    pub stage: GrowthStage,
}

/// One branch of the fertilizer decision tree
pub trait PlanRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Return a plan entry if this branch applies
    fn evaluate(&self, ctx: &PlanContext) -> Option<FertilizerPlan>;
}
