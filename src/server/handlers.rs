use super::state::AppState;
use crate::db::{Database, DEFAULT_HISTORY_LIMIT};
use crate::error::{AdvisorError, Result};
use crate::logic::{advisory, soil};
use crate::models::{
    user_or_anonymous, CropAdvice, CropRecord, CropRequest, DiseaseAnalysis, DiseaseRecord,
    Document, FertilizerAdvice, FertilizerRecord, FertilizerRequest, ImageInfo, SoilInput,
    SoilReport, Stored, WeatherReport,
};
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            count: None,
        })
    }
}

/// Advice plus the id of the stored record.
#[derive(Debug, Serialize)]
pub struct Saved<T> {
    #[serde(flatten)]
    pub advice: T,
    pub recommendation_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub data: DiseaseAnalysis,
    pub detection_id: i64,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    fn user(&self) -> String {
        user_or_anonymous(self.user_id.as_deref())
    }

    fn limit(&self) -> usize {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT)
    }
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cropadvisor"
    }))
}

/// POST /api/crop/recommend
pub async fn recommend_crops(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CropRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Saved<CropAdvice>>>> {
    let Json(request) = payload?;
    let advice = advisory::crop_advice(&state.catalog, &state.ranking, &request)?;

    let user = request.user();
    let record = CropRecord {
        request,
        advice: advice.clone(),
    };
    let id = {
        let user = user.clone();
        with_store(&state.db, move |db| db.save_crop_recommendation(&user, &record)).await?
    };
    info!("Crop recommendation {} saved for {}", id, user);

    Ok(ApiResponse::ok(Saved {
        advice,
        recommendation_id: id,
    }))
}

/// POST /api/fertilizer/recommend
pub async fn recommend_fertilizer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FertilizerRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Saved<FertilizerAdvice>>>> {
    let Json(request) = payload?;
    let advice = advisory::fertilizer_advice(&state.catalog, &state.planner, &request)?;

    let user = request.user();
    let record = FertilizerRecord {
        request,
        advice: advice.clone(),
    };
    let id = {
        let user = user.clone();
        with_store(&state.db, move |db| db.save_fertilizer_recommendation(&user, &record)).await?
    };
    info!("Fertilizer recommendation {} saved for {}", id, user);

    Ok(ApiResponse::ok(Saved {
        advice,
        recommendation_id: id,
    }))
}

/// POST /api/soil/analyze
pub async fn analyze_soil(
    payload: std::result::Result<Json<SoilInput>, JsonRejection>,
) -> Result<Json<ApiResponse<SoilReport>>> {
    let Json(input) = payload?;
    Ok(ApiResponse::ok(soil::analyze(&input)?))
}

/// GET /api/weather/current?lat&lon
pub async fn current_weather(
    State(state): State<AppState>,
    query: std::result::Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<WeatherReport>>> {
    let Query(query) = query?;
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(AdvisorError::invalid("Latitude and longitude required")),
    };

    let client = state.weather.as_ref().ok_or_else(|| {
        AdvisorError::DataSourceUnavailable("OpenWeatherMap is not configured".into())
    })?;

    Ok(ApiResponse::ok(client.fetch_current(lat, lon).await?))
}

struct Upload {
    original_name: String,
    mime_type: String,
    bytes: Bytes,
}

/// POST /api/disease/detect (multipart: `image`, optional `userId`)
pub async fn detect_disease(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>> {
    let started = Instant::now();
    let mut multipart = multipart.map_err(|e| AdvisorError::invalid(e.body_text()))?;

    let mut upload = None;
    let mut user_id = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            Some("userId") => user_id = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AdvisorError::invalid("No image uploaded"))?;
    validate_upload(&upload, state.max_upload_bytes)?;

    let classifier = state.classifier.as_ref().ok_or_else(|| {
        AdvisorError::DataSourceUnavailable("Image classifier is not configured".into())
    })?;

    let filename = stored_filename(&upload.original_name);
    tokio::fs::create_dir_all(&state.upload_dir).await?;
    tokio::fs::write(state.upload_dir.join(&filename), &upload.bytes).await?;
    debug!("Saved upload {} ({} bytes)", filename, upload.bytes.len());

    let predictions = classifier
        .classify(&upload.bytes, &upload.mime_type)
        .await?;
    debug!("{} classifier returned {} predictions", classifier.name(), predictions.len());
    let mut analysis =
        state
            .diagnoser
            .diagnose(&predictions, &state.catalog.diseases, upload.bytes.len());
    analysis.processing_time = Some(format!(
        "{:.1} seconds",
        started.elapsed().as_secs_f64()
    ));

    let user = user_or_anonymous(user_id.as_deref());
    let record = DiseaseRecord {
        image: ImageInfo {
            filename,
            original_name: upload.original_name,
            size: upload.bytes.len(),
            mime_type: upload.mime_type,
        },
        analysis: analysis.clone(),
    };
    let id = {
        let user = user.clone();
        with_store(&state.db, move |db| db.save_disease_detection(&user, &record)).await?
    };
    info!(
        "Disease detection {} saved for {}: {}",
        id, user, analysis.analysis_summary.primary_disease
    );

    Ok(Json(DetectionResponse {
        success: true,
        data: analysis,
        detection_id: id,
        message: "Disease analysis completed successfully",
    }))
}

fn multipart_error(e: MultipartError) -> AdvisorError {
    AdvisorError::invalid(e.body_text())
}

fn validate_upload(upload: &Upload, max_bytes: usize) -> Result<()> {
    if !upload.mime_type.starts_with("image/") {
        return Err(AdvisorError::invalid(
            "Invalid file type. Please upload an image.",
        ));
    }
    if upload.bytes.len() > max_bytes {
        return Err(AdvisorError::invalid(format!(
            "Image too large. Maximum size is {}MB.",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// `disease_<millis>_<name>`, with the client name reduced to a safe file name.
fn stored_filename(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("disease_{}_{}", Utc::now().timestamp_millis(), safe)
}

/// Run a store call on the blocking pool; rusqlite calls hold the connection mutex.
async fn with_store<T, F>(db: &Database, f: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| AdvisorError::Io(std::io::Error::other(e)))?
}

async fn history<T: Document + Send + 'static>(
    state: &AppState,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Stored<T>>>>> {
    let Query(query) = query?;
    let (user, limit) = (query.user(), query.limit());
    let records =
        with_store(&state.db, move |db| db.history::<T>(Some(user.as_str()), limit)).await?;
    Ok(Json(ApiResponse {
        success: true,
        count: Some(records.len()),
        data: records,
    }))
}

/// GET /api/crop/history
pub async fn crop_history(
    State(state): State<AppState>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Stored<CropRecord>>>>> {
    history(&state, query).await
}

/// GET /api/fertilizer/history
pub async fn fertilizer_history(
    State(state): State<AppState>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Stored<FertilizerRecord>>>>> {
    history(&state, query).await
}

/// GET /api/disease/history
pub async fn disease_history(
    State(state): State<AppState>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Stored<DiseaseRecord>>>>> {
    history(&state, query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn store_calls_leave_the_runtime_thread() {
        let db = Database::open_in_memory().unwrap();
        let runtime_thread = std::thread::current().id();
        let (store_thread, count) = with_store(&db, |db| {
            Ok((
                std::thread::current().id(),
                db.count(crate::models::RecordKind::Crop)?,
            ))
        })
        .await
        .unwrap();
        assert_ne!(store_thread, runtime_thread);
        assert_eq!(count, 0);
    }

    #[test]
    fn stored_filename_strips_paths_and_odd_characters() {
        let name = stored_filename("../../etc/leaf photo?.jpg");
        assert!(name.starts_with("disease_"));
        assert!(name.ends_with("_leaf_photo_.jpg"));
        assert!(!name.contains('/'));
    }

    #[test]
    fn history_limit_defaults_and_caps() {
        let q = |limit| HistoryQuery {
            user_id: None,
            limit,
        };
        assert_eq!(q(None).limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(q(Some(0)).limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(q(Some(3)).limit(), 3);
        assert_eq!(q(Some(5000)).limit(), MAX_HISTORY_LIMIT);
        assert_eq!(q(None).user(), "anonymous");
    }

    #[test]
    fn upload_validation() {
        let upload = |mime: &str, len: usize| Upload {
            original_name: "leaf.jpg".into(),
            mime_type: mime.into(),
            bytes: Bytes::from(vec![0u8; len]),
        };
        assert!(validate_upload(&upload("image/png", 10), 100).is_ok());
        assert!(validate_upload(&upload("text/plain", 10), 100).is_err());
        assert!(validate_upload(&upload("image/png", 101), 100).is_err());
    }
}
