use super::calculations;
use super::ranking::{recommend_crops, RankingOptions};
use super::rules::FertilizerPlanner;
use super::soil;
use crate::catalog::Catalog;
use crate::error::{AdvisorError, Result};
use crate::models::{
    ClimateSummary, CropAdvice, CropAnalysisSummary, CropRequest, FertilityRating,
    FertilizerAdvice, FertilizerRequest, FertilizerSummary, GrowthStage, MarketSummary,
    MeasuredConditions, NutrientLevels, PlanKind, Season,
};
use tracing::{debug, info};

pub const EXPECTED_YIELD_INCREASE: &str = "15-25%";

/// Rank crops for a request and summarize the conditions behind the ranking.
pub fn crop_advice(
    catalog: &Catalog,
    options: &RankingOptions,
    request: &CropRequest,
) -> Result<CropAdvice> {
    let (soil_data, climate, market) = match (
        request.soil_data.as_ref(),
        request.climate_data.as_ref(),
        request.market_data.as_ref(),
    ) {
        (Some(s), Some(c), Some(m)) => (s, c, m),
        _ => {
            return Err(AdvisorError::invalid(
                "Missing required data: soil, climate, or market information",
            ))
        }
    };

    let conditions = MeasuredConditions::from_inputs(soil_data, climate)?;

    let season_text = market
        .season
        .as_deref()
        .ok_or_else(|| AdvisorError::invalid("missing required field marketData.season"))?;
    let season = Season::from_str(season_text).ok_or_else(|| {
        AdvisorError::invalid(format!(
            "unknown season '{}' (expected Kharif, Rabi or Zaid)",
            season_text
        ))
    })?;

    let farm_size = market
        .farm_size
        .ok_or_else(|| AdvisorError::invalid("missing required field marketData.farm_size"))?;
    if !farm_size.is_finite() || farm_size <= 0.0 {
        return Err(AdvisorError::invalid(format!(
            "farm_size must be a positive number (got {})",
            farm_size
        )));
    }

    let recommendations = recommend_crops(&catalog.crops, &conditions, season, farm_size, options);
    info!(
        "Ranked {} crop(s) for {} season on {} acre(s)",
        recommendations.len(),
        season,
        farm_size
    );

    let nutrients = NutrientLevels::new(
        conditions.nitrogen,
        conditions.phosphorus,
        conditions.potassium,
    );
    let soil_quality = FertilityRating::from_score(soil::fertility_score(&nutrients, conditions.ph));

    let climate_suitability = ClimateSummary {
        season_suitability: if recommendations.is_empty() {
            "Unsuitable".into()
        } else {
            "Suitable".into()
        },
        irrigation_requirement: if conditions.rainfall < 500.0 {
            "High".into()
        } else {
            "Medium".into()
        },
        climate_risks: climate_risks(&conditions),
    };

    let market_factors = MarketSummary {
        optimal_farm_size: if farm_size >= 2.0 {
            "Good".into()
        } else {
            "Small".into()
        },
        season: season.as_str().to_string(),
        investment_capacity: if market.budget.is_some_and(|b| b > 0.0) {
            "Available".into()
        } else {
            "Limited".into()
        },
    };

    Ok(CropAdvice {
        recommendations,
        analysis_summary: CropAnalysisSummary {
            soil_quality,
            climate_suitability,
            market_factors,
        },
    })
}

fn climate_risks(conditions: &MeasuredConditions) -> Vec<String> {
    let mut risks = Vec::new();
    if conditions.temperature > 35.0 {
        risks.push("Heat stress".to_string());
    } else if conditions.temperature < 10.0 {
        risks.push("Cold stress".to_string());
    }
    if conditions.rainfall < 500.0 {
        risks.push("Drought".to_string());
    }
    if conditions.humidity > 85.0 {
        risks.push("Fungal disease pressure".to_string());
    }
    risks
}

/// Build a fertilizer plan for a request, with costs over the cultivated area.
pub fn fertilizer_advice(
    catalog: &Catalog,
    planner: &FertilizerPlanner,
    request: &FertilizerRequest,
) -> Result<FertilizerAdvice> {
    let (crop_info, soil_data, farm) = match (
        request.crop_info.as_ref(),
        request.soil_data.as_ref(),
        request.farm_details.as_ref(),
    ) {
        (Some(c), Some(s), Some(f)) => (c, s, f),
        _ => {
            return Err(AdvisorError::invalid(
                "Missing required data: cropInfo, soilData, or farmDetails",
            ))
        }
    };

    let crop = crop_info
        .crop_type
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AdvisorError::invalid("missing required field cropInfo.crop_type"))?;
    let stage = GrowthStage::parse(
        crop_info
            .growth_stage
            .as_deref()
            .ok_or_else(|| AdvisorError::invalid("missing required field cropInfo.growth_stage"))?,
    )?;
    let area = crop_info.cultivation_area.ok_or_else(|| {
        AdvisorError::invalid("missing required field cropInfo.cultivation_area")
    })?;
    if !area.is_finite() || area <= 0.0 {
        return Err(AdvisorError::invalid(format!(
            "cultivation_area must be a positive number (got {})",
            area
        )));
    }

    let measured = soil_data.nutrients()?;
    let ph = soil_data.ph()?;

    let requirement = catalog.nutrient_requirement_or_default(crop).ok_or_else(|| {
        AdvisorError::Catalog(format!(
            "no nutrient requirements for '{}' or the default crop",
            crop
        ))
    })?;
    let required = NutrientLevels::new(
        requirement.nitrogen,
        requirement.phosphorus,
        requirement.potassium,
    );

    let preferred_method = farm.application_method.as_deref();
    let recommendations: Vec<_> = planner
        .resolve(catalog, &required, &measured, ph, stage)?
        .into_iter()
        .map(|plan| {
            if plan.fertilizer_type == PlanKind::Correction {
                plan
            } else {
                plan.with_method(preferred_method)
            }
        })
        .collect();

    let total_cost = calculations::total_cost(&recommendations, area);
    debug!(
        "{} plan(s) for {} at {}, total ₹{}",
        recommendations.len(),
        crop,
        stage,
        total_cost
    );

    Ok(FertilizerAdvice {
        recommendations,
        total_cost,
        expected_yield_increase: EXPECTED_YIELD_INCREASE.to_string(),
        analysis_summary: FertilizerSummary {
            soil_status: soil::soil_status(&measured, ph),
            nutrient_requirements: required.deficiency(&measured).into(),
            cost_per_acre: (total_cost / area).round(),
        },
    })
}
