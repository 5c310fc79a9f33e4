mod builtin;

use crate::error::{AdvisorError, Result};
use crate::models::{
    CorrectionBundle, CropNutrientRequirement, CropProfile, DiseaseInfo, FertilizerProduct,
    NutrientLevels, ProductRole,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Reference tables the advisors read from.
///
/// Built once at startup and shared read-only. Every instance handed to the
/// advisors has passed [`Catalog::validate`], so band bounds are ordered and
/// every sizing denominator is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub crops: Vec<CropProfile>,
    pub nutrient_requirements: Vec<CropNutrientRequirement>,
    /// Crop whose requirements apply when a request names an unknown crop
    pub default_nutrient_crop: String,
    pub fertilizers: Vec<FertilizerProduct>,
    pub acid_correction: CorrectionBundle,
    pub alkaline_correction: CorrectionBundle,
    #[serde(default)]
    pub diseases: Vec<DiseaseInfo>,
}

impl Catalog {
    /// The built-in tables.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Load the built-in tables, or the YAML override at `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(p) => {
                info!("Loading catalog from {:?}", p);
                Self::from_yaml_file(p)?
            }
            None => Self::builtin(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AdvisorError::Catalog(format!("Failed to read catalog {:?}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crops.is_empty() {
            return Err(AdvisorError::Catalog("no crop profiles defined".into()));
        }

        let mut names = HashSet::new();
        for crop in &self.crops {
            if !names.insert(crop.name.to_lowercase()) {
                return Err(AdvisorError::Catalog(format!(
                    "duplicate crop profile '{}'",
                    crop.name
                )));
            }
            let req = &crop.requirements;
            if !req.temperature.is_ordered() {
                return Err(band_error(&crop.name, "temperature"));
            }
            if !req.ph.is_ordered() {
                return Err(band_error(&crop.name, "pH"));
            }
            for (field, value) in [
                ("humidity_min", req.humidity_min),
                ("rainfall_min", req.rainfall_min),
                ("nitrogen_min", req.nitrogen_min),
                ("phosphorus_min", req.phosphorus_min),
                ("potassium_min", req.potassium_min),
            ] {
                positive(&crop.name, field, value)?;
            }
            if crop.yield_per_acre < 0.0 || crop.market_price < 0.0 {
                return Err(AdvisorError::Catalog(format!(
                    "crop '{}' has negative yield or price",
                    crop.name
                )));
            }
            if crop.seasons.is_empty() {
                return Err(AdvisorError::Catalog(format!(
                    "crop '{}' lists no seasons",
                    crop.name
                )));
            }
        }

        for req in &self.nutrient_requirements {
            NutrientLevels::new(req.nitrogen, req.phosphorus, req.potassium)
                .validate(&req.crop)
                .map_err(|e| AdvisorError::Catalog(e.to_string()))?;
        }
        if self.nutrient_requirement(&self.default_nutrient_crop).is_none() {
            return Err(AdvisorError::Catalog(format!(
                "default nutrient crop '{}' has no requirement entry",
                self.default_nutrient_crop
            )));
        }

        for product in &self.fertilizers {
            if product.price < 0.0 {
                return Err(AdvisorError::Catalog(format!(
                    "fertilizer '{}' has a negative price",
                    product.name
                )));
            }
            for (field, pct) in [
                ("nitrogen_pct", product.nitrogen_pct),
                ("phosphorus_pct", product.phosphorus_pct),
                ("potassium_pct", product.potassium_pct),
            ] {
                if !(0.0..=100.0).contains(&pct) {
                    return Err(AdvisorError::Catalog(format!(
                        "fertilizer '{}' {} must be between 0 and 100",
                        product.name, field
                    )));
                }
            }
        }

        // Each role's sizing nutrients become divisors in the resolver.
        for role in [
            ProductRole::Nitrogen,
            ProductRole::NitrogenPhosphorus,
            ProductRole::Balanced,
            ProductRole::Potassium,
        ] {
            let matching: Vec<_> = self
                .fertilizers
                .iter()
                .filter(|p| p.role == Some(role))
                .collect();
            let product = match matching.as_slice() {
                [one] => *one,
                [] => {
                    return Err(AdvisorError::Catalog(format!(
                        "no fertilizer assigned the {} role",
                        role.as_str()
                    )))
                }
                _ => {
                    return Err(AdvisorError::Catalog(format!(
                        "more than one fertilizer assigned the {} role",
                        role.as_str()
                    )))
                }
            };
            let divisors: &[(&str, f64)] = match role {
                ProductRole::Nitrogen => &[("nitrogen_pct", product.nitrogen_pct)],
                ProductRole::NitrogenPhosphorus => &[
                    ("nitrogen_pct", product.nitrogen_pct),
                    ("phosphorus_pct", product.phosphorus_pct),
                ],
                ProductRole::Balanced => &[
                    ("nitrogen_pct", product.nitrogen_pct),
                    ("phosphorus_pct", product.phosphorus_pct),
                    ("potassium_pct", product.potassium_pct),
                ],
                ProductRole::Potassium => &[("potassium_pct", product.potassium_pct)],
            };
            for (field, value) in divisors {
                positive(&product.name, field, *value)?;
            }
        }

        let mut disease_names = HashSet::new();
        for disease in &self.diseases {
            if disease.name.trim().is_empty() {
                return Err(AdvisorError::Catalog("disease entry with empty name".into()));
            }
            if !disease_names.insert(disease.name.to_lowercase()) {
                return Err(AdvisorError::Catalog(format!(
                    "duplicate disease entry '{}'",
                    disease.name
                )));
            }
        }

        Ok(())
    }

    pub fn crop(&self, name: &str) -> Option<&CropProfile> {
        self.crops
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn nutrient_requirement(&self, crop: &str) -> Option<&CropNutrientRequirement> {
        self.nutrient_requirements
            .iter()
            .find(|r| r.crop.eq_ignore_ascii_case(crop.trim()))
    }

    /// Requirement for `crop`, or the default crop's when it is not listed.
    ///
    /// Returns `None` only for a catalog that never passed validation.
    pub fn nutrient_requirement_or_default(
        &self,
        crop: &str,
    ) -> Option<&CropNutrientRequirement> {
        self.nutrient_requirement(crop).or_else(|| {
            warn!(
                "No nutrient requirements for crop '{}', using {}",
                crop, self.default_nutrient_crop
            );
            self.nutrient_requirement(&self.default_nutrient_crop)
        })
    }

    pub fn product_for(&self, role: ProductRole) -> Option<&FertilizerProduct> {
        self.fertilizers.iter().find(|p| p.role == Some(role))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn band_error(crop: &str, factor: &str) -> AdvisorError {
    AdvisorError::Catalog(format!("crop '{}' has an inverted {} band", crop, factor))
}

fn positive(owner: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AdvisorError::Catalog(format!(
            "'{}' {} must be greater than zero (got {})",
            owner, field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, Season};

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.crops.len(), 6);
        assert_eq!(catalog.nutrient_requirements.len(), 10);
        assert_eq!(catalog.diseases.len(), 4);
    }

    #[test]
    fn every_role_has_a_product() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.product_for(ProductRole::Nitrogen).unwrap().name, "Urea");
        assert_eq!(
            catalog.product_for(ProductRole::NitrogenPhosphorus).unwrap().name,
            "DAP"
        );
        assert_eq!(
            catalog.product_for(ProductRole::Balanced).unwrap().name,
            "NPK 20:20:20"
        );
        assert_eq!(catalog.product_for(ProductRole::Potassium).unwrap().name, "MOP");
    }

    #[test]
    fn crop_lookup_ignores_case() {
        let catalog = Catalog::builtin();
        let rice = catalog.crop("rice").unwrap();
        assert_eq!(rice.requirements.temperature, Band::new(20.0, 35.0));
        assert!(rice.grows_in(Season::Kharif));
        assert!(catalog.crop("Barley").is_none());
    }

    #[test]
    fn unknown_crop_falls_back_to_rice() {
        let catalog = Catalog::builtin();
        let req = catalog.nutrient_requirement_or_default("Quinoa").unwrap();
        assert_eq!(req.crop, "Rice");
        let req = catalog.nutrient_requirement_or_default("tomato").unwrap();
        assert_eq!(req.crop, "Tomato");
    }

    #[test]
    fn rejects_inverted_band() {
        let mut catalog = Catalog::builtin();
        catalog.crops[0].requirements.ph = Band::new(7.0, 5.5);
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, AdvisorError::Catalog(ref m) if m.contains("pH")));
    }

    #[test]
    fn rejects_zero_denominator() {
        let mut catalog = Catalog::builtin();
        catalog.crops[1].requirements.humidity_min = 0.0;
        assert!(matches!(catalog.validate(), Err(AdvisorError::Catalog(_))));

        let mut catalog = Catalog::builtin();
        let urea = catalog
            .fertilizers
            .iter_mut()
            .find(|p| p.role == Some(ProductRole::Nitrogen))
            .unwrap();
        urea.nitrogen_pct = 0.0;
        assert!(matches!(catalog.validate(), Err(AdvisorError::Catalog(_))));
    }

    #[test]
    fn rejects_missing_role() {
        let mut catalog = Catalog::builtin();
        catalog
            .fertilizers
            .retain(|p| p.role != Some(ProductRole::Potassium));
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, AdvisorError::Catalog(ref m) if m.contains("Potassium")));
    }

    #[test]
    fn rejects_unknown_default_crop() {
        let mut catalog = Catalog::builtin();
        catalog.default_nutrient_crop = "Millet".into();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_preserves_tables() {
        let catalog = Catalog::builtin();
        let yaml = catalog.to_yaml().unwrap();
        let parsed = Catalog::from_yaml(&yaml).unwrap();
        parsed.validate().unwrap();
        assert_eq!(parsed.crops, catalog.crops);
        assert_eq!(parsed.fertilizers, catalog.fertilizers);
    }
}
