use super::Catalog;
use crate::models::{
    Band, CorrectionBundle, CropNutrientRequirement, CropProfile, DiseaseInfo,
    FertilizerProduct, GrowthStage, ProductRole, RequirementBand, Season, TreatmentProduct,
};
use std::collections::HashMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn crop(
    name: &str,
    temperature: (f64, f64),
    humidity_min: f64,
    rainfall_min: f64,
    ph: (f64, f64),
    npk_min: (f64, f64, f64),
    yield_per_acre: f64,
    market_price: f64,
    seasons: &[Season],
    tips: &[&str],
) -> CropProfile {
    CropProfile {
        name: name.to_string(),
        requirements: RequirementBand {
            temperature: Band::new(temperature.0, temperature.1),
            humidity_min,
            rainfall_min,
            ph: Band::new(ph.0, ph.1),
            nitrogen_min: npk_min.0,
            phosphorus_min: npk_min.1,
            potassium_min: npk_min.2,
        },
        yield_per_acre,
        market_price,
        seasons: seasons.to_vec(),
        growing_tips: strings(tips),
    }
}

pub fn crops() -> Vec<CropProfile> {
    vec![
        crop(
            "Rice",
            (20.0, 35.0),
            70.0,
            1000.0,
            (5.5, 7.0),
            (30.0, 15.0, 100.0),
            2.5,
            1800.0,
            &[Season::Kharif],
            &[
                "Maintain water level of 2-3 cm in early stages",
                "Apply nitrogen fertilizer in 3 splits",
                "Monitor for blast and brown spot diseases",
            ],
        ),
        crop(
            "Wheat",
            (10.0, 25.0),
            50.0,
            400.0,
            (6.0, 7.5),
            (40.0, 20.0, 150.0),
            2.0,
            2000.0,
            &[Season::Rabi],
            &[
                "Sow seeds at 2-3 cm depth",
                "Irrigate at crown root initiation stage",
                "Apply fungicides to prevent rust diseases",
            ],
        ),
        crop(
            "Maize",
            (21.0, 30.0),
            60.0,
            600.0,
            (6.0, 7.0),
            (50.0, 25.0, 200.0),
            3.0,
            1600.0,
            &[Season::Kharif, Season::Rabi],
            &[
                "Plant seeds 3-4 cm deep with 60cm row spacing",
                "Side-dress with nitrogen at knee-high stage",
                "Control weeds in first 6 weeks",
            ],
        ),
        crop(
            "Cotton",
            (25.0, 35.0),
            50.0,
            700.0,
            (6.5, 8.0),
            (60.0, 30.0, 300.0),
            1.5,
            5000.0,
            &[Season::Kharif],
            &[
                "Maintain plant population of 50,000-60,000 per hectare",
                "Apply potash before flowering",
                "Regular monitoring for bollworm",
            ],
        ),
        crop(
            "Sugarcane",
            (26.0, 32.0),
            80.0,
            1200.0,
            (6.0, 7.5),
            (80.0, 40.0, 400.0),
            40.0,
            350.0,
            &[Season::Kharif],
            &[
                "Plant healthy seed canes in furrows",
                "Earthing up at 90-120 days after planting",
                "Adequate irrigation throughout growing period",
            ],
        ),
        crop(
            "Tomato",
            (18.0, 27.0),
            60.0,
            500.0,
            (6.0, 7.0),
            (35.0, 18.0, 120.0),
            8.0,
            1500.0,
            &[Season::Rabi, Season::Zaid],
            &[
                "Transplant seedlings after 4-5 weeks",
                "Provide support stakes for indeterminate varieties",
                "Regular pruning of suckers",
            ],
        ),
    ]
}

pub fn nutrient_requirements() -> Vec<CropNutrientRequirement> {
    [
        ("Rice", 120.0, 60.0, 40.0, 2500.0),
        ("Wheat", 120.0, 60.0, 40.0, 2000.0),
        ("Maize", 150.0, 75.0, 60.0, 3000.0),
        ("Cotton", 160.0, 80.0, 80.0, 1500.0),
        ("Sugarcane", 200.0, 100.0, 120.0, 40000.0),
        ("Tomato", 180.0, 100.0, 150.0, 8000.0),
        ("Potato", 150.0, 75.0, 150.0, 12000.0),
        ("Onion", 100.0, 50.0, 50.0, 15000.0),
        // N-fixing legumes need little nitrogen
        ("Soybean", 30.0, 75.0, 45.0, 1800.0),
        ("Groundnut", 25.0, 50.0, 75.0, 2000.0),
    ]
    .into_iter()
    .map(
        |(crop, nitrogen, phosphorus, potassium, base_yield)| CropNutrientRequirement {
            crop: crop.to_string(),
            nitrogen,
            phosphorus,
            potassium,
            base_yield,
        },
    )
    .collect()
}

fn timings(entries: [(GrowthStage, &str); 4]) -> HashMap<GrowthStage, String> {
    entries
        .into_iter()
        .map(|(stage, text)| (stage, text.to_string()))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn product(
    name: &str,
    display_name: &str,
    role: Option<ProductRole>,
    npk: (f64, f64, f64),
    price: f64,
    benefits: &[&str],
    method: &str,
    timings: HashMap<GrowthStage, String>,
) -> FertilizerProduct {
    FertilizerProduct {
        name: name.to_string(),
        display_name: display_name.to_string(),
        role,
        nitrogen_pct: npk.0,
        phosphorus_pct: npk.1,
        potassium_pct: npk.2,
        price,
        benefits: strings(benefits),
        application_method: method.to_string(),
        timings,
    }
}

pub fn fertilizers() -> Vec<FertilizerProduct> {
    use GrowthStage::*;

    vec![
        product(
            "Urea",
            "Urea",
            Some(ProductRole::Nitrogen),
            (46.0, 0.0, 0.0),
            300.0,
            &[
                "Highest nitrogen content",
                "Cost-effective nitrogen source",
                "Quick plant response",
                "Widely available",
            ],
            "Side dressing and incorporation",
            timings([
                (Seedling, "15 days after sowing"),
                (Vegetative, "30 days after sowing"),
                (Flowering, "Split application during flowering"),
                (Fruiting, "Light application only"),
            ]),
        ),
        product(
            "DAP",
            "DAP (Diammonium Phosphate)",
            Some(ProductRole::NitrogenPhosphorus),
            (18.0, 46.0, 0.0),
            400.0,
            &[
                "High phosphorus for root development",
                "Nitrogen for vegetative growth",
                "Ideal for flowering stage",
                "Quick nutrient release",
            ],
            "Band placement near seed furrow",
            timings([
                (Seedling, "At planting time"),
                (Vegetative, "20-25 days after sowing"),
                (Flowering, "At flower initiation"),
                (Fruiting, "Not recommended at this stage"),
            ]),
        ),
        product(
            "NPK 20:20:20",
            "NPK 20:20:20",
            Some(ProductRole::Balanced),
            (20.0, 20.0, 20.0),
            450.0,
            &[
                "Balanced nutrition",
                "Suitable for all growth stages",
                "Prevents nutrient deficiency",
                "Improves overall plant health",
            ],
            "Broadcasting and incorporation",
            timings([
                (Seedling, "At planting time"),
                (Vegetative, "25-30 days after sowing"),
                (Flowering, "At flower initiation"),
                (Fruiting, "At fruit setting"),
            ]),
        ),
        product(
            "NPK 10:26:26",
            "NPK 10:26:26",
            None,
            (10.0, 26.0, 26.0),
            420.0,
            &["Phosphorus and potash rich basal dose"],
            "Broadcasting and incorporation",
            HashMap::new(),
        ),
        product(
            "MOP",
            "MOP (Muriate of Potash)",
            Some(ProductRole::Potassium),
            (0.0, 0.0, 60.0),
            280.0,
            &[
                "High potassium content",
                "Improves fruit quality",
                "Enhances disease resistance",
                "Better water regulation",
            ],
            "Broadcasting before planting",
            timings([
                (Seedling, "Before sowing"),
                (Vegetative, "20 days after sowing"),
                (Flowering, "At flower initiation"),
                (Fruiting, "At fruit development"),
            ]),
        ),
        product(
            "SSP",
            "SSP (Single Super Phosphate)",
            None,
            (0.0, 16.0, 0.0),
            250.0,
            &["Phosphorus with sulphur and calcium"],
            "Broadcasting",
            HashMap::new(),
        ),
        product(
            "Complex 12:32:16",
            "Complex 12:32:16",
            None,
            (12.0, 32.0, 16.0),
            480.0,
            &["Complex fertilizer for basal application"],
            "Broadcasting",
            HashMap::new(),
        ),
    ]
}

pub fn acid_correction() -> CorrectionBundle {
    CorrectionBundle {
        name: "Zinc Sulfate + Lime".into(),
        application_rate: "10 kg/acre ZnSO4 + 200 kg/acre Lime".into(),
        application_timing: "Before sowing".into(),
        cost_per_acre: 350.0,
        benefits: strings(&[
            "Corrects soil acidity",
            "Zinc deficiency correction",
            "Improves nutrient availability",
            "Better root development",
        ]),
        application_method: "Broadcasting and incorporation".into(),
    }
}

pub fn alkaline_correction() -> CorrectionBundle {
    CorrectionBundle {
        name: "Iron Sulfate + Sulfur".into(),
        application_rate: "15 kg/acre FeSO4 + 100 kg/acre Sulfur".into(),
        application_timing: "Before sowing".into(),
        cost_per_acre: 400.0,
        benefits: strings(&[
            "Reduces soil alkalinity",
            "Iron deficiency correction",
            "Improves chlorophyll synthesis",
            "Better nutrient uptake",
        ]),
        application_method: "Broadcasting and incorporation".into(),
    }
}

pub fn diseases() -> Vec<DiseaseInfo> {
    vec![
        DiseaseInfo {
            name: "Apple scab".into(),
            description: "Apple scab is a fungal disease caused by Venturia inaequalis that affects apple trees.".into(),
            symptoms: strings(&["Dark, scaly lesions on leaves", "Premature leaf drop", "Fruit spotting and cracking"]),
            treatment: strings(&["Apply fungicides during spring", "Remove fallen leaves", "Prune for air circulation"]),
            prevention: strings(&["Plant resistant varieties", "Avoid overhead watering", "Apply preventive sprays"]),
            recommended_products: vec![
                TreatmentProduct::new("Captan 50% WP", "2g/L", "₹180/250g"),
                TreatmentProduct::new("Mancozeb 75% WP", "2.5g/L", "₹180/500g"),
            ],
        },
        DiseaseInfo {
            name: "Late blight".into(),
            description: "Late blight is a destructive disease caused by Phytophthora infestans affecting tomatoes and potatoes.".into(),
            symptoms: strings(&["Dark brown lesions with white fungal growth", "Rapid plant death", "Fruit rot"]),
            treatment: strings(&["Apply copper fungicides immediately", "Remove infected plants", "Improve drainage"]),
            prevention: strings(&["Use resistant varieties", "Avoid overhead irrigation", "Apply preventive fungicides"]),
            recommended_products: vec![
                TreatmentProduct::new("Copper Oxychloride 50% WP", "2-3g/L", "₹120/250g"),
                TreatmentProduct::new("Metalaxyl + Mancozeb", "2g/L", "₹250/250g"),
            ],
        },
        DiseaseInfo {
            name: "Early blight".into(),
            description: "Early blight is caused by Alternaria solani and affects tomatoes, potatoes, and other solanaceous crops.".into(),
            symptoms: strings(&["Circular spots with concentric rings", "Yellowing leaves", "Premature defoliation"]),
            treatment: strings(&["Apply Mancozeb or Chlorothalonil", "Remove affected leaves", "Improve air circulation"]),
            prevention: strings(&["Space plants properly", "Avoid overhead watering", "Use mulch"]),
            recommended_products: vec![
                TreatmentProduct::new("Mancozeb 75% WP", "2.5g/L", "₹180/500g"),
                TreatmentProduct::new("Chlorothalonil 75% WP", "2g/L", "₹200/250g"),
            ],
        },
        DiseaseInfo {
            name: "Bacterial spot".into(),
            description: "Bacterial spot is caused by Xanthomonas species and affects various crops including tomatoes and peppers.".into(),
            symptoms: strings(&["Small dark spots with yellow halos", "Leaf yellowing and drop", "Fruit lesions"]),
            treatment: strings(&["Apply copper bactericides", "Remove infected material", "Improve air flow"]),
            prevention: strings(&["Use pathogen-free seeds", "Avoid wet conditions", "Practice crop rotation"]),
            recommended_products: vec![
                TreatmentProduct::new("Copper Hydroxide 77% WP", "3g/L", "₹140/500g"),
                TreatmentProduct::new("Streptocycline", "0.5g/L", "₹85/10g"),
            ],
        },
    ]
}

pub fn catalog() -> Catalog {
    Catalog {
        crops: crops(),
        nutrient_requirements: nutrient_requirements(),
        default_nutrient_crop: "Rice".into(),
        fertilizers: fertilizers(),
        acid_correction: acid_correction(),
        alkaline_correction: alkaline_correction(),
        diseases: diseases(),
    }
}
