use crate::models::{MeasuredConditions, RequirementBand};

pub const TEMPERATURE_WEIGHT: f64 = 20.0;
pub const HUMIDITY_WEIGHT: f64 = 15.0;
pub const RAINFALL_WEIGHT: f64 = 15.0;
pub const PH_WEIGHT: f64 = 20.0;
pub const NUTRIENT_WEIGHT: f64 = 10.0;

/// Points lost per pH unit outside the band
const PH_PENALTY_PER_UNIT: f64 = 5.0;

/// Score how well `conditions` fit a crop's growing envelope, 0-100.
///
/// | Factor      | Weight | Partial credit                          |
/// |-------------|--------|-----------------------------------------|
/// | Temperature | 20     | 20 minus °C to nearest bound, floor 0   |
/// | Humidity    | 15     | proportional to the minimum             |
/// | Rainfall    | 15     | proportional to the minimum             |
/// | pH          | 20     | 20 minus 5 per unit outside, floor 0    |
/// | N, P, K     | 10 each| proportional to the minimum, capped     |
///
/// Any finite input gives a score in range. Catalog validation guarantees
/// the minimums used as divisors are positive.
pub fn score(requirements: &RequirementBand, conditions: &MeasuredConditions) -> f64 {
    let total = temperature_points(requirements, conditions.temperature)
        + at_least_points(conditions.humidity, requirements.humidity_min, HUMIDITY_WEIGHT)
        + at_least_points(conditions.rainfall, requirements.rainfall_min, RAINFALL_WEIGHT)
        + ph_points(requirements, conditions.ph)
        + nutrient_points(conditions.nitrogen, requirements.nitrogen_min)
        + nutrient_points(conditions.phosphorus, requirements.phosphorus_min)
        + nutrient_points(conditions.potassium, requirements.potassium_min);

    total.clamp(0.0, 100.0)
}

fn temperature_points(requirements: &RequirementBand, temperature: f64) -> f64 {
    (TEMPERATURE_WEIGHT - requirements.temperature.distance(temperature)).max(0.0)
}

fn ph_points(requirements: &RequirementBand, ph: f64) -> f64 {
    (PH_WEIGHT - PH_PENALTY_PER_UNIT * requirements.ph.distance(ph)).max(0.0)
}

/// Full weight at or above `min`, proportional below it.
fn at_least_points(value: f64, min: f64, weight: f64) -> f64 {
    if value >= min {
        weight
    } else {
        (value / min) * weight
    }
}

fn nutrient_points(measured: f64, min: f64) -> f64 {
    (measured / min).min(1.0) * NUTRIENT_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Band;

    fn rice() -> RequirementBand {
        RequirementBand {
            temperature: Band::new(20.0, 35.0),
            humidity_min: 70.0,
            rainfall_min: 1000.0,
            ph: Band::new(5.5, 7.0),
            nitrogen_min: 30.0,
            phosphorus_min: 15.0,
            potassium_min: 100.0,
        }
    }

    fn conditions(
        n: f64,
        p: f64,
        k: f64,
        ph: f64,
        temperature: f64,
        humidity: f64,
        rainfall: f64,
    ) -> MeasuredConditions {
        MeasuredConditions {
            nitrogen: n,
            phosphorus: p,
            potassium: k,
            ph,
            temperature,
            humidity,
            rainfall,
        }
    }

    #[test]
    fn all_requirements_met_scores_100() {
        let c = conditions(35.0, 20.0, 120.0, 6.2, 28.0, 80.0, 1200.0);
        assert_eq!(score(&rice(), &c), 100.0);
    }

    #[test]
    fn poor_conditions_lose_points_on_every_factor() {
        let c = conditions(5.0, 5.0, 5.0, 9.0, 10.0, 30.0, 200.0);
        // 10 + 6.43 + 3 + 10 + 1.67 + 3.33 + 0.5
        let s = score(&rice(), &c);
        assert!((s - 34.93).abs() < 0.01, "score was {}", s);
    }

    #[test]
    fn very_poor_conditions_score_below_30() {
        let c = conditions(3.0, 1.5, 10.0, 2.0, 0.0, 10.0, 100.0);
        let s = score(&rice(), &c);
        assert!(s < 30.0, "score was {}", s);
    }

    #[test]
    fn temperature_partial_credit() {
        let req = rice();
        assert_eq!(temperature_points(&req, 28.0), 20.0);
        assert_eq!(temperature_points(&req, 15.0), 15.0);
        assert_eq!(temperature_points(&req, 38.0), 17.0);
        assert_eq!(temperature_points(&req, -10.0), 0.0);
    }

    #[test]
    fn ph_partial_credit() {
        let req = rice();
        assert_eq!(ph_points(&req, 6.0), 20.0);
        assert_eq!(ph_points(&req, 8.0), 15.0);
        assert_eq!(ph_points(&req, 4.5), 15.0);
        assert_eq!(ph_points(&req, 14.0), 0.0);
    }

    #[test]
    fn humidity_and_rainfall_are_proportional() {
        assert_eq!(at_least_points(35.0, 70.0, HUMIDITY_WEIGHT), 7.5);
        assert_eq!(at_least_points(500.0, 1000.0, RAINFALL_WEIGHT), 7.5);
        assert_eq!(at_least_points(2000.0, 1000.0, RAINFALL_WEIGHT), 15.0);
    }

    #[test]
    fn nutrient_points_are_capped() {
        assert_eq!(nutrient_points(15.0, 30.0), 5.0);
        assert_eq!(nutrient_points(300.0, 30.0), 10.0);
        assert_eq!(nutrient_points(0.0, 30.0), 0.0);
    }

    #[test]
    fn score_stays_in_range_for_extreme_inputs() {
        let req = rice();
        let extremes = [-1.0e9, -50.0, -1.0, 0.0, 1.0, 7.0, 50.0, 1.0e9];
        for &a in &extremes {
            for &b in &extremes {
                let c = conditions(a, b, a, b, a, b, a);
                let s = score(&req, &c);
                assert!((0.0..=100.0).contains(&s), "{} out of range for {}, {}", s, a, b);
            }
        }
    }

    #[test]
    fn more_nitrogen_never_lowers_score() {
        let req = rice();
        let mut previous = 0.0;
        for n in [0.0, 5.0, 15.0, 29.0, 30.0, 60.0] {
            let s = score(&req, &conditions(n, 20.0, 120.0, 6.2, 28.0, 80.0, 1200.0));
            assert!(s >= previous);
            previous = s;
        }
    }
}
