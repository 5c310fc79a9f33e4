mod error;
mod handlers;
mod state;

pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Room for multipart boundaries and the text fields around the image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/crop/recommend", post(handlers::recommend_crops))
        .route("/api/crop/history", get(handlers::crop_history))
        .route(
            "/api/fertilizer/recommend",
            post(handlers::recommend_fertilizer),
        )
        .route("/api/fertilizer/history", get(handlers::fertilizer_history))
        .route("/api/soil/analyze", post(handlers::analyze_soil))
        .route("/api/weather/current", get(handlers::current_weather))
        .route(
            "/api/disease/detect",
            post(handlers::detect_disease).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/disease/history", get(handlers::disease_history))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::datasources::ImageClassifier;
    use crate::db::Database;
    use crate::error::Result;
    use crate::models::Prediction;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedClassifier(Vec<Prediction>);

    #[async_trait]
    impl ImageClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn classify(&self, _image: &[u8], _mime_type: &str) -> Result<Vec<Prediction>> {
            Ok(self.0.clone())
        }
    }

    fn test_state(upload_dir: &std::path::Path) -> AppState {
        AppState::new(
            Database::open_in_memory().unwrap(),
            Arc::new(Catalog::builtin()),
            upload_dir.to_path_buf(),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(mime: &str, image: &[u8], user_id: Option<&str>) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        if let Some(user) = user_id {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"userId\"\r\n\r\n{user}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"leaf.jpg\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post("/api/disease/detect")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn crop_body() -> Value {
        json!({
            "userId": "farmer-1",
            "soilData": {"nitrogen": 35, "phosphorus": 20, "potassium": 120, "ph": 6.2},
            "climateData": {"temperature": 28, "humidity": 80, "rainfall": 1200},
            "marketData": {"season": "Kharif", "farm_size": 2, "budget": 50000}
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn crop_recommendation_is_saved_and_listed() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(post_json("/api/crop/recommend", crop_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["recommendations"][0]["crop_name"], "Rice");
        assert_eq!(
            body["data"]["analysis_summary"]["market_factors"]["optimal_farm_size"],
            "Good"
        );
        let id = body["data"]["recommendation_id"].as_i64().unwrap();

        let response = app
            .oneshot(
                Request::get("/api/crop/history?userId=farmer-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["id"], id);
    }

    #[tokio::test]
    async fn crop_request_missing_sections_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let response = app
            .oneshot(post_json(
                "/api/crop/recommend",
                json!({"soilData": {"nitrogen": 35, "phosphorus": 20, "potassium": 120, "ph": 6.2}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Missing required data"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let request = Request::post("/api/soil/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn fertilizer_recommendation() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let response = app
            .oneshot(post_json(
                "/api/fertilizer/recommend",
                json!({
                    "cropInfo": {"crop_type": "Rice", "growth_stage": "Vegetative", "cultivation_area": 2},
                    "soilData": {"nitrogen": 20, "phosphorus": 10, "potassium": 200, "ph": 6.5},
                    "farmDetails": {"application_method": "Broadcasting"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["recommendations"][0]["fertilizer_name"], "DAP (Diammonium Phosphate)");
        assert_eq!(body["data"]["expected_yield_increase"], "15-25%");
    }

    #[tokio::test]
    async fn soil_analysis_requires_all_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let response = app
            .clone()
            .oneshot(post_json("/api/soil/analyze", json!({"nitrogen": 50, "phosphorus": 25})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json(
                "/api/soil/analyze",
                json!({"nitrogen": 90, "phosphorus": 60, "potassium": 450, "ph": 6.8}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["soil_analysis"]["overall_quality"], "Excellent");
    }

    #[tokio::test]
    async fn weather_requires_coordinates_and_client() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let response = app
            .clone()
            .oneshot(Request::get("/api/weather/current?lat=12.9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(
                Request::get("/api/weather/current?lat=12.9&lon=77.6")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn disease_detection_saves_upload_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = FixedClassifier(vec![
            Prediction::new("Tomato___Late_blight", 87.4),
            Prediction::new("Tomato___healthy", 8.0),
        ]);
        let state = test_state(dir.path()).with_classifier(Arc::new(classifier));
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(multipart_request("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0], Some("farmer-9")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["analysis_summary"]["primary_disease"], "Late blight");
        assert_eq!(body["data"]["analysis_summary"]["overall_severity"], "High");
        assert!(body["detection_id"].as_i64().is_some());

        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);

        let response = app
            .oneshot(
                Request::get("/api/disease/history?userId=farmer-9&limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["image"]["original_name"], "leaf.jpg");
    }

    #[tokio::test]
    async fn disease_detection_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).with_classifier(Arc::new(FixedClassifier(vec![])));
        let app = build_router(state);
        let response = app
            .oneshot(multipart_request("text/plain", b"hello", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn disease_detection_requires_multipart_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).with_classifier(Arc::new(FixedClassifier(vec![])));
        let response = build_router(state)
            .oneshot(post_json("/api/disease/detect", json!({"image": "leaf.jpg"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn disease_detection_without_classifier_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));
        let response = app
            .oneshot(multipart_request("image/png", &[1, 2, 3], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
