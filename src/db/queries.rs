use crate::db::Database;
use crate::error::Result;
use crate::models::{
    CropRecord, DiseaseRecord, Document, FertilizerRecord, RecordKind, Stored,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

struct RawDocument {
    id: i64,
    user_id: String,
    payload: String,
    created_at: String,
}

fn row_to_raw(row: &Row) -> rusqlite::Result<RawDocument> {
    Ok(RawDocument {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        payload: row.get("payload")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(created_at = %value, "Unparseable timestamp in database, using now");
            Utc::now()
        })
}

impl RawDocument {
    fn decode<T: Document>(self) -> Result<Stored<T>> {
        Ok(Stored {
            id: self.id,
            user_id: self.user_id,
            created_at: parse_timestamp(&self.created_at),
            document: serde_json::from_str(&self.payload)?,
        })
    }
}

// Generic document queries

impl Database {
    /// Persist a document and return its row id.
    pub fn save<T: Document>(&self, user_id: &str, document: &T) -> Result<i64> {
        let payload = serde_json::to_string(document)?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO documents (kind, user_id, payload, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![T::KIND.as_str(), user_id, payload, created_at],
            )?;
            let id = conn.last_insert_rowid();
            debug!("Saved {} document {} for {}", T::KIND, id, user_id);
            Ok(id)
        })
    }

    pub fn get<T: Document>(&self, id: i64) -> Result<Option<Stored<T>>> {
        let raw = self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM documents WHERE id = ?1 AND kind = ?2",
                params![id, T::KIND.as_str()],
                row_to_raw,
            )
            .optional()
            .map_err(Into::into)
        })?;

        raw.map(RawDocument::decode).transpose()
    }

    /// Newest documents of one kind, optionally for a single user.
    pub fn history<T: Document>(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Stored<T>>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM documents
                WHERE kind = ?1 AND (?2 IS NULL OR user_id = ?2)
                ORDER BY created_at DESC, id DESC
                LIMIT ?3
                "#,
            )?;
            let rows = stmt
                .query_map(params![T::KIND.as_str(), user_id, limit as i64], row_to_raw)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(RawDocument::decode).collect()
    }

    pub fn count(&self, kind: RecordKind) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE kind = ?1",
                [kind.as_str()],
                |row| row.get(0),
            )?)
        })
    }
}

// Named wrappers for each collection

impl Database {
    pub fn save_crop_recommendation(&self, user_id: &str, record: &CropRecord) -> Result<i64> {
        self.save(user_id, record)
    }

    pub fn save_fertilizer_recommendation(
        &self,
        user_id: &str,
        record: &FertilizerRecord,
    ) -> Result<i64> {
        self.save(user_id, record)
    }

    pub fn save_disease_detection(&self, user_id: &str, record: &DiseaseRecord) -> Result<i64> {
        self.save(user_id, record)
    }

    pub fn crop_history(&self, user_id: &str, limit: usize) -> Result<Vec<Stored<CropRecord>>> {
        self.history(Some(user_id), limit)
    }

    pub fn fertilizer_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Stored<FertilizerRecord>>> {
        self.history(Some(user_id), limit)
    }

    pub fn disease_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Stored<DiseaseRecord>>> {
        self.history(Some(user_id), limit)
    }
}

// Helper trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalysisSummary, DiseaseAnalysis, DiseaseReport, DiseaseSeverity, ImageInfo, ImageQuality,
    };

    fn disease_record(name: &str) -> DiseaseRecord {
        let report = DiseaseReport::healthy("Tomato", 90.0, format!("{} looks fine", name));
        DiseaseRecord {
            image: ImageInfo {
                filename: format!("disease_1_{}.jpg", name),
                original_name: format!("{}.jpg", name),
                size: 1234,
                mime_type: "image/jpeg".into(),
            },
            analysis: DiseaseAnalysis {
                analysis_summary: AnalysisSummary {
                    total_diseases_found: 0,
                    primary_disease: report.disease_name.clone(),
                    overall_severity: DiseaseSeverity::None,
                    confidence_average: 90.0,
                },
                detected_diseases: vec![report],
                image_quality: ImageQuality::Poor,
                processing_time: Some("0.2 seconds".into()),
            },
        }
    }

    #[test]
    fn save_and_get_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = db.save_disease_detection("farmer-1", &disease_record("leaf")).unwrap();

        let stored = db.get::<DiseaseRecord>(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.user_id, "farmer-1");
        assert_eq!(stored.document.image.original_name, "leaf.jpg");
        assert_eq!(stored.document.analysis.detected_diseases.len(), 1);
    }

    #[test]
    fn get_checks_kind() {
        let db = Database::open_in_memory().unwrap();
        let id = db.save_disease_detection("farmer-1", &disease_record("leaf")).unwrap();
        assert!(db.get::<CropRecord>(id).unwrap().is_none());
        assert!(db.get::<DiseaseRecord>(id + 100).unwrap().is_none());
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        for name in ["first", "second", "third"] {
            db.save_disease_detection("farmer-1", &disease_record(name)).unwrap();
        }
        db.save_disease_detection("farmer-2", &disease_record("other")).unwrap();

        let history = db.disease_history("farmer-1", 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].document.image.original_name, "third.jpg");
        assert_eq!(history[1].document.image.original_name, "second.jpg");

        let everyone = db.history::<DiseaseRecord>(None, DEFAULT_HISTORY_LIMIT).unwrap();
        assert_eq!(everyone.len(), 4);
    }

    #[test]
    fn history_for_unknown_user_is_empty() {
        let db = Database::open_in_memory().unwrap();
        db.save_disease_detection("farmer-1", &disease_record("leaf")).unwrap();
        assert!(db.disease_history("nobody", 10).unwrap().is_empty());
    }

    #[test]
    fn count_by_kind() {
        let db = Database::open_in_memory().unwrap();
        db.save_disease_detection("a", &disease_record("x")).unwrap();
        db.save_disease_detection("b", &disease_record("y")).unwrap();
        assert_eq!(db.count(RecordKind::Disease).unwrap(), 2);
        assert_eq!(db.count(RecordKind::Crop).unwrap(), 0);
    }
}
