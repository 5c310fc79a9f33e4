use crate::catalog::Catalog;
use crate::datasources::{ImageClassifier, OpenWeatherMapClient};
use crate::db::Database;
use crate::logic::{Diagnoser, FertilizerPlanner, RankingOptions};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<Catalog>,
    pub ranking: RankingOptions,
    pub planner: Arc<FertilizerPlanner>,
    pub diagnoser: Arc<Diagnoser>,
    /// None when OpenWeatherMap is not configured.
    pub weather: Option<Arc<OpenWeatherMapClient>>,
    pub classifier: Option<Arc<dyn ImageClassifier>>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, catalog: Arc<Catalog>, upload_dir: PathBuf) -> Self {
        Self {
            db,
            catalog,
            ranking: RankingOptions::default(),
            planner: Arc::new(FertilizerPlanner::new()),
            diagnoser: Arc::new(Diagnoser::new()),
            weather: None,
            classifier: None,
            upload_dir,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn with_ranking(mut self, ranking: RankingOptions) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_planner(mut self, planner: FertilizerPlanner) -> Self {
        self.planner = Arc::new(planner);
        self
    }

    pub fn with_weather(mut self, client: OpenWeatherMapClient) -> Self {
        self.weather = Some(Arc::new(client));
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}
