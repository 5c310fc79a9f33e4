use crate::models::{
    AnalysisSummary, DiseaseAnalysis, DiseaseInfo, DiseaseReport, DiseaseSeverity, ImageQuality,
    Prediction, TreatmentProduct,
};
use std::borrow::Cow;
use tracing::debug;

/// Predictions at or below this confidence (percent) are ignored
pub const MIN_CONFIDENCE: f64 = 10.0;
pub const TOP_PREDICTIONS: usize = 3;

const UNKNOWN_CROP: &str = "Unknown";

/// Crop and disease parsed from a `Crop___Disease_name` classifier label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    pub crop: String,
    pub disease: String,
}

impl ParsedLabel {
    pub fn parse(label: &str) -> Self {
        match label.split_once("___") {
            Some((crop, disease)) => Self {
                crop: humanize(crop),
                disease: humanize(disease),
            },
            None => Self {
                crop: UNKNOWN_CROP.to_string(),
                disease: humanize(label),
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.disease.eq_ignore_ascii_case("healthy")
    }
}

fn humanize(part: &str) -> String {
    part.replace('_', " ").trim().to_string()
}

/// Lowercase, underscores to spaces, runs of whitespace collapsed.
fn normalize(s: &str) -> String {
    s.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One step of the disease lookup chain.
pub trait LabelMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn find<'a>(
        &self,
        label: &ParsedLabel,
        known: &'a [DiseaseInfo],
    ) -> Option<Cow<'a, DiseaseInfo>>;
}

/// Disease name equals a catalog key.
pub struct ExactMatcher;

impl LabelMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find<'a>(
        &self,
        label: &ParsedLabel,
        known: &'a [DiseaseInfo],
    ) -> Option<Cow<'a, DiseaseInfo>> {
        known
            .iter()
            .find(|info| info.name == label.disease)
            .map(Cow::Borrowed)
    }
}

/// Normalized catalog key contained in the normalized disease name; first
/// catalog entry wins.
pub struct SubstringMatcher;

impl LabelMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "normalized_substring"
    }

    fn find<'a>(
        &self,
        label: &ParsedLabel,
        known: &'a [DiseaseInfo],
    ) -> Option<Cow<'a, DiseaseInfo>> {
        let disease = normalize(&label.disease);
        known
            .iter()
            .find(|info| disease.contains(&normalize(&info.name)))
            .map(Cow::Borrowed)
    }
}

/// Generic advice for diseases the catalog does not describe.
pub struct FallbackMatcher;

impl LabelMatcher for FallbackMatcher {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn find<'a>(
        &self,
        label: &ParsedLabel,
        _known: &'a [DiseaseInfo],
    ) -> Option<Cow<'a, DiseaseInfo>> {
        Some(Cow::Owned(DiseaseInfo {
            name: label.disease.clone(),
            description: format!("{} affecting {} plants.", label.disease, label.crop),
            symptoms: vec!["Visible disease symptoms on plant".into()],
            treatment: vec![
                "Consult local agricultural expert".into(),
                "Apply appropriate fungicide".into(),
            ],
            prevention: vec![
                "Follow good agricultural practices".into(),
                "Monitor plants regularly".into(),
            ],
            recommended_products: vec![TreatmentProduct::new(
                "General Fungicide",
                "As per label",
                "₹200/250g",
            )],
        }))
    }
}

/// Turns classifier predictions into a disease report.
pub struct Diagnoser {
    matchers: Vec<Box<dyn LabelMatcher>>,
}

impl Diagnoser {
    pub fn new() -> Self {
        let matchers: Vec<Box<dyn LabelMatcher>> = vec![
            Box::new(ExactMatcher),
            Box::new(SubstringMatcher),
            Box::new(FallbackMatcher),
        ];
        Self { matchers }
    }

    pub fn lookup<'a>(
        &self,
        label: &ParsedLabel,
        known: &'a [DiseaseInfo],
    ) -> Option<Cow<'a, DiseaseInfo>> {
        self.matchers.iter().find_map(|m| {
            let found = m.find(label, known);
            if found.is_some() {
                debug!("'{}' resolved by {} matcher", label.disease, m.name());
            }
            found
        })
    }

    pub fn report(&self, prediction: &Prediction, known: &[DiseaseInfo]) -> Option<DiseaseReport> {
        let label = ParsedLabel::parse(&prediction.label);
        let confidence = prediction.confidence.round();

        if label.is_healthy() {
            let description = format!(
                "The {} plant appears to be healthy with no visible signs of disease.",
                label.crop
            );
            return Some(DiseaseReport::healthy(&label.crop, confidence, description));
        }

        let info = self.lookup(&label, known)?;
        Some(DiseaseReport {
            disease_name: label.disease,
            confidence,
            severity: DiseaseSeverity::from_confidence(confidence),
            crop_affected: label.crop,
            description: info.description.clone(),
            symptoms: info.symptoms.clone(),
            treatment: info.treatment.clone(),
            prevention: info.prevention.clone(),
            recommended_products: info.recommended_products.clone(),
        })
    }

    /// Diagnose from raw predictions and the uploaded image size.
    pub fn diagnose(
        &self,
        predictions: &[Prediction],
        known: &[DiseaseInfo],
        image_bytes: usize,
    ) -> DiseaseAnalysis {
        let mut ranked: Vec<&Prediction> = predictions.iter().collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(TOP_PREDICTIONS);

        let mut reports: Vec<DiseaseReport> = ranked
            .iter()
            .filter(|p| p.confidence > MIN_CONFIDENCE)
            .filter_map(|p| self.report(p, known))
            .collect();

        if reports.is_empty() {
            let best = ranked.first().map(|p| p.confidence.round()).unwrap_or(0.0);
            reports.push(DiseaseReport::healthy(
                UNKNOWN_CROP,
                best,
                "The plant appears to be healthy with no visible signs of disease.".into(),
            ));
        }

        DiseaseAnalysis {
            analysis_summary: summarize(&reports),
            detected_diseases: reports,
            image_quality: ImageQuality::from_size(image_bytes),
            processing_time: None,
        }
    }
}

impl Default for Diagnoser {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(reports: &[DiseaseReport]) -> AnalysisSummary {
    let average = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.confidence).sum::<f64>() / reports.len() as f64
    };

    AnalysisSummary {
        total_diseases_found: reports.iter().filter(|r| !r.is_healthy()).count(),
        primary_disease: reports
            .first()
            .map(|r| r.disease_name.clone())
            .unwrap_or_else(|| "Unknown".into()),
        overall_severity: reports
            .first()
            .map(|r| r.severity)
            .unwrap_or(DiseaseSeverity::Low),
        confidence_average: average.round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn known() -> Vec<DiseaseInfo> {
        Catalog::builtin().diseases
    }

    #[test]
    fn parses_crop_and_disease() {
        let label = ParsedLabel::parse("Tomato___Late_blight");
        assert_eq!(label.crop, "Tomato");
        assert_eq!(label.disease, "Late blight");

        let label = ParsedLabel::parse("Corn_(maize)___Common_rust_");
        assert_eq!(label.crop, "Corn (maize)");
        assert_eq!(label.disease, "Common rust");

        let label = ParsedLabel::parse("mystery");
        assert_eq!(label.crop, "Unknown");
    }

    #[test]
    fn exact_match_wins() {
        let known = known();
        let label = ParsedLabel::parse("Potato___Early_blight");
        let info = ExactMatcher.find(&label, &known).unwrap();
        assert_eq!(info.name, "Early blight");
    }

    #[test]
    fn substring_match_is_normalized() {
        let known = known();
        let label = ParsedLabel {
            crop: "Tomato".into(),
            disease: "Severe  LATE_Blight stage".into(),
        };
        assert!(ExactMatcher.find(&label, &known).is_none());
        let info = SubstringMatcher.find(&label, &known).unwrap();
        assert_eq!(info.name, "Late blight");
    }

    #[test]
    fn unknown_disease_falls_back() {
        let diagnoser = Diagnoser::new();
        let known = known();
        let label = ParsedLabel::parse("Grape___Black_rot");
        let info = diagnoser.lookup(&label, &known).unwrap();
        assert!(matches!(info, Cow::Owned(_)));
        assert_eq!(info.description, "Black rot affecting Grape plants.");
        assert_eq!(info.recommended_products.len(), 1);
    }

    #[test]
    fn chain_prefers_earlier_matcher() {
        let mut known = known();
        // "Late blight" would also match as a substring of this entry's key
        known.insert(
            0,
            DiseaseInfo {
                name: "blight".into(),
                description: "generic blight".into(),
                symptoms: vec![],
                treatment: vec![],
                prevention: vec![],
                recommended_products: vec![],
            },
        );
        let diagnoser = Diagnoser::new();
        let info = diagnoser
            .lookup(&ParsedLabel::parse("Tomato___Late_blight"), &known)
            .unwrap();
        assert_eq!(info.name, "Late blight");

        let info = diagnoser
            .lookup(&ParsedLabel::parse("Tomato___Blight_complex"), &known)
            .unwrap();
        assert_eq!(info.name, "blight");
    }

    #[test]
    fn diagnose_reports_confident_predictions() {
        let predictions = vec![
            Prediction::new("Tomato___Early_blight", 12.2),
            Prediction::new("Tomato___Late_blight", 85.4),
            Prediction::new("Tomato___healthy", 2.4),
        ];
        let analysis = Diagnoser::new().diagnose(&predictions, &known(), 250_000);

        assert_eq!(analysis.detected_diseases.len(), 2);
        let first = &analysis.detected_diseases[0];
        assert_eq!(first.disease_name, "Late blight");
        assert_eq!(first.confidence, 85.0);
        assert_eq!(first.severity, DiseaseSeverity::High);
        assert_eq!(analysis.detected_diseases[1].severity, DiseaseSeverity::Low);

        let summary = &analysis.analysis_summary;
        assert_eq!(summary.total_diseases_found, 2);
        assert_eq!(summary.primary_disease, "Late blight");
        assert_eq!(summary.overall_severity, DiseaseSeverity::High);
        assert_eq!(summary.confidence_average, 49.0);
        assert_eq!(analysis.image_quality, ImageQuality::Good);
    }

    #[test]
    fn only_top_three_predictions_are_considered() {
        let predictions = vec![
            Prediction::new("Apple___Apple_scab", 30.0),
            Prediction::new("Tomato___Late_blight", 25.0),
            Prediction::new("Tomato___Early_blight", 20.0),
            Prediction::new("Tomato___Bacterial_spot", 15.0),
        ];
        let analysis = Diagnoser::new().diagnose(&predictions, &known(), 10);
        assert_eq!(analysis.detected_diseases.len(), 3);
        assert!(analysis
            .detected_diseases
            .iter()
            .all(|d| d.disease_name != "Bacterial spot"));
    }

    #[test]
    fn healthy_label_gives_healthy_report() {
        let predictions = vec![Prediction::new("Apple___healthy", 97.6)];
        let analysis = Diagnoser::new().diagnose(&predictions, &known(), 600_000);
        let report = &analysis.detected_diseases[0];
        assert!(report.is_healthy());
        assert_eq!(report.crop_affected, "Apple");
        assert_eq!(report.severity, DiseaseSeverity::None);
        assert_eq!(analysis.analysis_summary.total_diseases_found, 0);
        assert_eq!(analysis.analysis_summary.primary_disease, "Healthy Plant");
    }

    #[test]
    fn low_confidence_everywhere_is_healthy_unknown() {
        let predictions = vec![
            Prediction::new("Tomato___Late_blight", 9.6),
            Prediction::new("Tomato___Early_blight", 4.0),
        ];
        let analysis = Diagnoser::new().diagnose(&predictions, &known(), 50_000);
        assert_eq!(analysis.detected_diseases.len(), 1);
        let report = &analysis.detected_diseases[0];
        assert!(report.is_healthy());
        assert_eq!(report.crop_affected, "Unknown");
        assert_eq!(report.confidence, 10.0);
        assert_eq!(analysis.image_quality, ImageQuality::Poor);
    }

    #[test]
    fn no_predictions_is_healthy_with_zero_confidence() {
        let analysis = Diagnoser::new().diagnose(&[], &known(), 0);
        assert_eq!(analysis.detected_diseases[0].confidence, 0.0);
        assert_eq!(analysis.analysis_summary.overall_severity, DiseaseSeverity::None);
    }
}
