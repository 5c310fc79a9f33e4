use serde::{Deserialize, Serialize};

/// One classifier output: a `Crop___Disease` label and a confidence percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentProduct {
    pub name: String,
    pub dosage: String,
    pub price: String,
}

impl TreatmentProduct {
    pub fn new(name: &str, dosage: &str, price: &str) -> Self {
        Self {
            name: name.to_string(),
            dosage: dosage.to_string(),
            price: price.to_string(),
        }
    }
}

/// Reference information for a known disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    #[serde(default)]
    pub recommended_products: Vec<TreatmentProduct>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiseaseSeverity {
    None,
    Low,
    Medium,
    High,
}

impl DiseaseSeverity {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 80.0 {
            DiseaseSeverity::High
        } else if confidence > 60.0 {
            DiseaseSeverity::Medium
        } else {
            DiseaseSeverity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseSeverity::None => "None",
            DiseaseSeverity::Low => "Low",
            DiseaseSeverity::Medium => "Medium",
            DiseaseSeverity::High => "High",
        }
    }
}

impl std::fmt::Display for DiseaseSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseReport {
    pub disease_name: String,
    pub confidence: f64,
    pub severity: DiseaseSeverity,
    pub crop_affected: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub recommended_products: Vec<TreatmentProduct>,
}

impl DiseaseReport {
    pub const HEALTHY: &'static str = "Healthy Plant";

    pub fn healthy(crop: &str, confidence: f64, description: String) -> Self {
        Self {
            disease_name: Self::HEALTHY.to_string(),
            confidence,
            severity: DiseaseSeverity::None,
            crop_affected: crop.to_string(),
            description,
            symptoms: vec!["No disease symptoms detected".into()],
            treatment: vec!["Continue regular plant care".into()],
            prevention: vec!["Maintain good growing conditions".into()],
            recommended_products: Vec::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.disease_name == Self::HEALTHY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ImageQuality {
    pub fn from_size(bytes: usize) -> Self {
        if bytes > 500_000 {
            ImageQuality::Excellent
        } else if bytes > 200_000 {
            ImageQuality::Good
        } else if bytes > 100_000 {
            ImageQuality::Fair
        } else {
            ImageQuality::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_diseases_found: usize,
    pub primary_disease: String,
    pub overall_severity: DiseaseSeverity,
    pub confidence_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseAnalysis {
    pub detected_diseases: Vec<DiseaseReport>,
    pub analysis_summary: AnalysisSummary,
    pub image_quality: ImageQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
}

/// Metadata kept about an uploaded leaf image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds_are_exclusive() {
        assert_eq!(DiseaseSeverity::from_confidence(81.0), DiseaseSeverity::High);
        assert_eq!(DiseaseSeverity::from_confidence(80.0), DiseaseSeverity::Medium);
        assert_eq!(DiseaseSeverity::from_confidence(61.0), DiseaseSeverity::Medium);
        assert_eq!(DiseaseSeverity::from_confidence(60.0), DiseaseSeverity::Low);
    }

    #[test]
    fn image_quality_by_size() {
        assert_eq!(ImageQuality::from_size(600_000), ImageQuality::Excellent);
        assert_eq!(ImageQuality::from_size(500_000), ImageQuality::Good);
        assert_eq!(ImageQuality::from_size(150_000), ImageQuality::Fair);
        assert_eq!(ImageQuality::from_size(1_000), ImageQuality::Poor);
    }

    #[test]
    fn healthy_report_has_no_products() {
        let r = DiseaseReport::healthy("Tomato", 92.0, "fine".into());
        assert!(r.is_healthy());
        assert_eq!(r.severity, DiseaseSeverity::None);
        assert!(r.recommended_products.is_empty());
    }
}
