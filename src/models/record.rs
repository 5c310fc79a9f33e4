use super::advice::{CropAdvice, CropRequest, FertilizerAdvice, FertilizerRequest};
use super::disease::{DiseaseAnalysis, ImageInfo};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Crop,
    Fertilizer,
    Disease,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Crop => "crop",
            RecordKind::Fertilizer => "fertilizer",
            RecordKind::Disease => "disease",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crop" | "crops" => Some(RecordKind::Crop),
            "fertilizer" | "fertilizers" => Some(RecordKind::Fertilizer),
            "disease" | "diseases" => Some(RecordKind::Disease),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted document with its envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: i64,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub document: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecord {
    pub request: CropRequest,
    pub advice: CropAdvice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilizerRecord {
    pub request: FertilizerRequest,
    pub advice: FertilizerAdvice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub image: ImageInfo,
    pub analysis: DiseaseAnalysis,
}

/// Maps a document type to the collection it is stored in.
pub trait Document: Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

impl Document for CropRecord {
    const KIND: RecordKind = RecordKind::Crop;
}

impl Document for FertilizerRecord {
    const KIND: RecordKind = RecordKind::Fertilizer;
}

impl Document for DiseaseRecord {
    const KIND: RecordKind = RecordKind::Disease;
}
