use super::{PlanContext, PlanRule};
use crate::logic::calculations::{application_cost, fertilizer_rate};
use crate::models::{FertilizerPlan, PlanKind, ProductRole};

/// Need above which a nutrient drives the primary product choice
pub const PRIMARY_THRESHOLD: f64 = 10.0;

/// Primary nitrogen source
///
/// - N and P both short: combined N+P product (DAP), sized so that neither
///   nutrient falls short, i.e. the larger of the two per-nutrient masses
/// - only N short: straight nitrogen product (urea)
pub struct PrimaryRule;

impl PlanRule for PrimaryRule {
    fn id(&self) -> &'static str {
        "primary"
    }

    fn name(&self) -> &'static str {
        "Primary Nitrogen Source"
    }

    fn evaluate(&self, ctx: &PlanContext) -> Option<FertilizerPlan> {
        let need = &ctx.need;
        if need.nitrogen <= PRIMARY_THRESHOLD {
            return None;
        }

        if need.phosphorus > PRIMARY_THRESHOLD {
            let product = ctx.catalog.product_for(ProductRole::NitrogenPhosphorus)?;
            let rate = fertilizer_rate(need.nitrogen, product.nitrogen_pct)
                .max(fertilizer_rate(need.phosphorus, product.phosphorus_pct));
            let cost = application_cost(rate, product.price);
            return Some(FertilizerPlan::from_product(
                product,
                PlanKind::Primary,
                rate,
                cost,
                ctx.stage,
            ));
        }

        let product = ctx.catalog.product_for(ProductRole::Nitrogen)?;
        let rate = fertilizer_rate(need.nitrogen, product.nitrogen_pct);
        let cost = application_cost(rate, product.price);
        Some(FertilizerPlan::from_product(
            product,
            PlanKind::Primary,
            rate,
            cost,
            ctx.stage,
        ))
    }
}
