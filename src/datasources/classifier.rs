use crate::config::ClassifierConfig;
use crate::error::{AdvisorError, Result};
use crate::models::Prediction;
use async_trait::async_trait;
use serde::Deserialize;

/// Predictions kept from a single classification.
pub const MAX_PREDICTIONS: usize = 3;

/// Remote plant-disease image classifier.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Classify an image, returning up to three predictions with
    /// confidence in percent, highest first.
    async fn classify(&self, image: &[u8], mime_type: &str) -> Result<Vec<Prediction>>;
}

/// Posts raw image bytes to an inference endpoint returning
/// `[{"label": ..., "score": 0..1}]`.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    label: String,
    score: f64,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.endpoint.is_empty()
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let response =
            self.client.get(&self.config.endpoint).send().await.map_err(|e| {
                AdvisorError::DataSourceUnavailable(format!("Classifier: {}", e))
            })?;

        // Inference endpoints commonly reject GET; anything but a server error means it is up.
        Ok(!response.status().is_server_error())
    }
}

#[async_trait]
impl ImageClassifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify(&self, image: &[u8], mime_type: &str) -> Result<Vec<Prediction>> {
        if !self.is_enabled() {
            return Err(AdvisorError::DataSourceUnavailable(
                "Image classifier is not configured".into(),
            ));
        }

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(image.to_vec());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("Classifier: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "Classifier returned {}: {}",
                status, body
            )));
        }

        let raw: Vec<RawPrediction> = response.json().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!(
                "Failed to parse classifier response: {}",
                e
            ))
        })?;

        Ok(to_predictions(raw))
    }
}

fn to_predictions(raw: Vec<RawPrediction>) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = raw
        .into_iter()
        .filter(|p| p.score.is_finite())
        .map(|p| Prediction::new(p.label, p.score * 100.0))
        .collect();
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(MAX_PREDICTIONS);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_become_percent_top_three() {
        let raw: Vec<RawPrediction> = serde_json::from_str(
            r#"[
                {"label": "Tomato___healthy", "score": 0.05},
                {"label": "Tomato___Late_blight", "score": 0.71},
                {"label": "Tomato___Early_blight", "score": 0.2},
                {"label": "Potato___Late_blight", "score": 0.04}
            ]"#,
        )
        .unwrap();

        let predictions = to_predictions(raw);
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[0].label, "Tomato___Late_blight");
        assert!((predictions[0].confidence - 71.0).abs() < 1e-9);
        assert_eq!(predictions[2].label, "Tomato___healthy");
    }

    #[tokio::test]
    async fn unconfigured_classifier_is_unavailable() {
        let classifier = HttpClassifier::new(ClassifierConfig {
            endpoint: String::new(),
            token: None,
            enabled: true,
        });
        let err = classifier.classify(&[1, 2, 3], "image/jpeg").await.unwrap_err();
        assert!(matches!(err, AdvisorError::DataSourceUnavailable(_)));
    }
}
