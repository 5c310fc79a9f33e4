use super::suitability;
use crate::models::{CropProfile, CropRecommendation, MeasuredConditions, RequirementBand, Season};
use tracing::debug;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_COST_RATIO: f64 = 0.6;

/// Anything that can be scored against measured conditions.
pub trait Candidate {
    fn name(&self) -> &str;
    fn requirements(&self) -> &RequirementBand;
}

impl Candidate for CropProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &RequirementBand {
        &self.requirements
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a, C> {
    pub candidate: &'a C,
    /// Clamped but unrounded
    pub score: f64,
}

/// Score every candidate, sort best first and keep `top_n`.
///
/// The sort is stable, so equal scores keep catalog order.
pub fn score_and_rank<'a, C: Candidate>(
    candidates: impl IntoIterator<Item = &'a C>,
    conditions: &MeasuredConditions,
    top_n: usize,
) -> Vec<Scored<'a, C>>
where
    C: 'a,
{
    let mut scored: Vec<Scored<'a, C>> = candidates
        .into_iter()
        .map(|candidate| {
            let score = suitability::score(candidate.requirements(), conditions);
            debug!("{} scored {:.2}", candidate.name(), score);
            Scored { candidate, score }
        })
        .collect();

    // Order on the unrounded score. Candidates whose rounded confidence ties
    // (84.6 and 84.9 both report 85) still come out best first.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

/// Like [`score_and_rank`], considering only candidates accepted by `filter`.
pub fn rank<'a, C, F>(
    candidates: &'a [C],
    conditions: &MeasuredConditions,
    filter: F,
    top_n: usize,
) -> Vec<Scored<'a, C>>
where
    C: Candidate,
    F: Fn(&C) -> bool,
{
    score_and_rank(candidates.iter().filter(|c| filter(*c)), conditions, top_n)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    pub top_n: usize,
    /// Share of revenue assumed to go to cultivation costs
    pub cost_ratio: f64,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            cost_ratio: DEFAULT_COST_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropEconomics {
    pub expected_yield: f64,
    pub revenue: f64,
    pub profit: f64,
}

pub fn economics(crop: &CropProfile, farm_size: f64, cost_ratio: f64) -> CropEconomics {
    let revenue = crop.yield_per_acre * crop.market_price * farm_size;
    CropEconomics {
        expected_yield: crop.yield_per_acre * farm_size,
        revenue,
        profit: revenue - revenue * cost_ratio,
    }
}

/// Rank the crops grown in `season` and attach per-farm economics.
///
/// An empty result means no crop is grown in that season.
pub fn recommend_crops(
    crops: &[CropProfile],
    conditions: &MeasuredConditions,
    season: Season,
    farm_size: f64,
    options: &RankingOptions,
) -> Vec<CropRecommendation> {
    rank(crops, conditions, |c| c.grows_in(season), options.top_n)
        .into_iter()
        .map(|scored| {
            let crop = scored.candidate;
            let econ = economics(crop, farm_size, options.cost_ratio);
            CropRecommendation {
                crop_name: crop.name.clone(),
                confidence_score: scored.score.round(),
                expected_yield: econ.expected_yield,
                profit_margin: econ.profit,
                growing_tips: crop.growing_tips.clone(),
                market_price: crop.market_price,
                season_suitability: crop.seasons.clone(),
            }
        })
        .collect()
}
