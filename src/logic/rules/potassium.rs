use super::{PlanContext, PlanRule};
use crate::logic::calculations::{application_cost, fertilizer_rate};
use crate::models::{FertilizerPlan, PlanKind, ProductRole};

pub const POTASSIUM_THRESHOLD: f64 = 15.0;

/// Straight potash when the potassium need is high
pub struct PotassiumRule;

impl PlanRule for PotassiumRule {
    fn id(&self) -> &'static str {
        "potassium"
    }

    fn name(&self) -> &'static str {
        "Potassium Supplement"
    }

    fn evaluate(&self, ctx: &PlanContext) -> Option<FertilizerPlan> {
        if ctx.need.potassium <= POTASSIUM_THRESHOLD {
            return None;
        }

        let product = ctx.catalog.product_for(ProductRole::Potassium)?;
        let rate = fertilizer_rate(ctx.need.potassium, product.potassium_pct);
        let cost = application_cost(rate, product.price);

        Some(FertilizerPlan::from_product(
            product,
            PlanKind::Potassium,
            rate,
            cost,
            ctx.stage,
        ))
    }
}
