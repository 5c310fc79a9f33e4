use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

/// Soil and climate snapshot a crop is scored against.
///
/// Nutrients are kg/ha, temperature °C, humidity %, rainfall mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredConditions {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

impl MeasuredConditions {
    /// Build conditions from the request payloads, failing on any missing field.
    pub fn from_inputs(soil: &SoilInput, climate: &ClimateInput) -> Result<Self> {
        let conditions = Self {
            nitrogen: required(soil.nitrogen, "soilData.nitrogen")?,
            phosphorus: required(soil.phosphorus, "soilData.phosphorus")?,
            potassium: required(soil.potassium, "soilData.potassium")?,
            ph: required(soil.ph, "soilData.ph")?,
            temperature: required(climate.temperature, "climateData.temperature")?,
            humidity: required(climate.humidity, "climateData.humidity")?,
            rainfall: required(climate.rainfall, "climateData.rainfall")?,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("ph", self.ph),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("rainfall", self.rainfall),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AdvisorError::invalid(format!("{} must be a finite number", name)));
        }

        for (name, value) in [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("rainfall", self.rainfall),
        ] {
            if value < 0.0 {
                return Err(AdvisorError::invalid(format!(
                    "{} cannot be negative (got {})",
                    name, value
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(AdvisorError::invalid(format!(
                "humidity must be between 0 and 100 (got {})",
                self.humidity
            )));
        }

        Ok(())
    }
}

/// N/P/K quantities in kg/ha, used both for crop requirements and measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientLevels {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
}

impl NutrientLevels {
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    /// Shortfall of `measured` below `self`, never negative.
    pub fn deficiency(&self, measured: &NutrientLevels) -> NutrientLevels {
        NutrientLevels {
            nitrogen: (self.nitrogen - measured.nitrogen).max(0.0),
            phosphorus: (self.phosphorus - measured.phosphorus).max(0.0),
            potassium: (self.potassium - measured.potassium).max(0.0),
        }
    }

    pub fn validate(&self, label: &str) -> Result<()> {
        for (name, value) in [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AdvisorError::invalid(format!(
                    "{} {} must be a non-negative number (got {})",
                    label, name, value
                )));
            }
        }
        Ok(())
    }
}

/// Soil test section of a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilInput {
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_matter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
}

impl SoilInput {
    pub fn nutrients(&self) -> Result<NutrientLevels> {
        let levels = NutrientLevels {
            nitrogen: required(self.nitrogen, "soilData.nitrogen")?,
            phosphorus: required(self.phosphorus, "soilData.phosphorus")?,
            potassium: required(self.potassium, "soilData.potassium")?,
        };
        levels.validate("soil")?;
        Ok(levels)
    }

    pub fn ph(&self) -> Result<f64> {
        let ph = required(self.ph, "soilData.ph")?;
        if !ph.is_finite() {
            return Err(AdvisorError::invalid("soilData.ph must be a finite number"));
        }
        Ok(ph)
    }
}

/// Climate section of a request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimateInput {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunlight_hours: Option<f64>,
}

fn required(value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| AdvisorError::invalid(format!("missing required field {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soil() -> SoilInput {
        SoilInput {
            nitrogen: Some(35.0),
            phosphorus: Some(20.0),
            potassium: Some(120.0),
            ph: Some(6.2),
            ..Default::default()
        }
    }

    fn climate() -> ClimateInput {
        ClimateInput {
            temperature: Some(28.0),
            humidity: Some(80.0),
            rainfall: Some(1200.0),
            sunlight_hours: None,
        }
    }

    #[test]
    fn builds_conditions_from_complete_inputs() {
        let c = MeasuredConditions::from_inputs(&soil(), &climate()).unwrap();
        assert_eq!(c.nitrogen, 35.0);
        assert_eq!(c.ph, 6.2);
        assert_eq!(c.rainfall, 1200.0);
    }

    #[test]
    fn missing_field_is_invalid_input() {
        let mut s = soil();
        s.potassium = None;
        let err = MeasuredConditions::from_inputs(&s, &climate()).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(ref m) if m.contains("potassium")));
    }

    #[test]
    fn negative_nutrient_is_invalid_input() {
        let mut s = soil();
        s.nitrogen = Some(-1.0);
        assert!(matches!(
            MeasuredConditions::from_inputs(&s, &climate()),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn humidity_out_of_range_is_invalid_input() {
        let mut c = climate();
        c.humidity = Some(140.0);
        assert!(MeasuredConditions::from_inputs(&soil(), &c).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        let mut c = climate();
        c.temperature = Some(f64::NAN);
        assert!(MeasuredConditions::from_inputs(&soil(), &c).is_err());
    }

    #[test]
    fn deficiency_is_never_negative() {
        let required = NutrientLevels::new(120.0, 60.0, 40.0);
        let measured = NutrientLevels::new(20.0, 10.0, 200.0);
        let d = required.deficiency(&measured);
        assert_eq!(d, NutrientLevels::new(100.0, 50.0, 0.0));
    }

    #[test]
    fn nutrient_levels_use_npk_keys() {
        let json = serde_json::to_value(NutrientLevels::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json["N"], 1.0);
        assert_eq!(json["P"], 2.0);
        assert_eq!(json["K"], 3.0);
    }
}
