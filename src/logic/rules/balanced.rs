use super::{PlanContext, PlanRule};
use crate::logic::calculations::{application_cost, fertilizer_rate};
use crate::models::{FertilizerPlan, PlanKind, ProductRole};

pub const BALANCED_THRESHOLD: f64 = 5.0;

/// Balanced N-P-K blend
///
/// Added whenever all three nutrients are short, even if the primary rule
/// already matched. Sized to the largest per-nutrient mass.
pub struct BalancedRule;

impl PlanRule for BalancedRule {
    fn id(&self) -> &'static str {
        "balanced"
    }

    fn name(&self) -> &'static str {
        "Balanced NPK"
    }

    fn evaluate(&self, ctx: &PlanContext) -> Option<FertilizerPlan> {
        let need = &ctx.need;
        if need.nitrogen <= BALANCED_THRESHOLD
            || need.phosphorus <= BALANCED_THRESHOLD
            || need.potassium <= BALANCED_THRESHOLD
        {
            return None;
        }

        let product = ctx.catalog.product_for(ProductRole::Balanced)?;
        let rate = fertilizer_rate(need.nitrogen, product.nitrogen_pct)
            .max(fertilizer_rate(need.phosphorus, product.phosphorus_pct))
            .max(fertilizer_rate(need.potassium, product.potassium_pct));
        let cost = application_cost(rate, product.price);

        Some(FertilizerPlan::from_product(
            product,
            PlanKind::Secondary,
            rate,
            cost,
            ctx.stage,
        ))
    }
}
