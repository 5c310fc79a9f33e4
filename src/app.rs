use crate::db::Database;
use crate::error::Result;
use crate::models::{CropRecord, DiseaseRecord, FertilizerRecord, Stored};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Crops,
    Fertilizer,
    Diseases,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Crops),
            '2' => Some(Screen::Fertilizer),
            '3' => Some(Screen::Diseases),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Screen::Crops => Screen::Fertilizer,
            Screen::Fertilizer => Screen::Diseases,
            Screen::Diseases => Screen::Crops,
        }
    }
}

pub struct ListState {
    pub selected_index: usize,
}

impl ListState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }
}

/// History dashboard state.
pub struct App {
    pub db: Database,
    pub screen: Screen,
    /// None shows every user's records.
    pub user: Option<String>,
    pub limit: usize,
    pub crops: Vec<Stored<CropRecord>>,
    pub fertilizers: Vec<Stored<FertilizerRecord>>,
    pub diseases: Vec<Stored<DiseaseRecord>>,
    pub list_state: ListState,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(db: Database, user: Option<String>, limit: usize) -> Result<Self> {
        let mut app = Self {
            db,
            screen: Screen::Crops,
            user,
            limit,
            crops: Vec::new(),
            fertilizers: Vec::new(),
            diseases: Vec::new(),
            list_state: ListState::new(),
            status_message: None,
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    pub fn reload(&mut self) -> Result<()> {
        let user = self.user.as_deref();
        self.crops = self.db.history(user, self.limit)?;
        self.fertilizers = self.db.history(user, self.limit)?;
        self.diseases = self.db.history(user, self.limit)?;
        self.list_state.clamp(self.current_len());
        Ok(())
    }

    /// Reload and report the outcome in the status line.
    pub fn refresh(&mut self) {
        match self.reload() {
            Ok(()) => self.set_status(&format!(
                "Loaded {} crop, {} fertilizer, {} disease records",
                self.crops.len(),
                self.fertilizers.len(),
                self.diseases.len()
            )),
            Err(e) => self.set_status(&format!("Reload failed: {}", e)),
        }
    }

    pub fn current_len(&self) -> usize {
        match self.screen {
            Screen::Crops => self.crops.len(),
            Screen::Fertilizer => self.fertilizers.len(),
            Screen::Diseases => self.diseases.len(),
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.list_state = ListState::new();
        }
    }

    pub fn select_next(&mut self) {
        let len = self.current_len();
        self.list_state.next(len);
    }

    pub fn select_prev(&mut self) {
        self.list_state.prev();
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalysisSummary, DiseaseAnalysis, DiseaseReport, DiseaseSeverity, ImageInfo, ImageQuality,
    };

    fn disease(name: &str) -> DiseaseRecord {
        DiseaseRecord {
            image: ImageInfo {
                filename: format!("disease_0_{}", name),
                original_name: name.into(),
                size: 10,
                mime_type: "image/png".into(),
            },
            analysis: DiseaseAnalysis {
                detected_diseases: vec![DiseaseReport::healthy("Corn", 95.0, "fine".into())],
                analysis_summary: AnalysisSummary {
                    total_diseases_found: 0,
                    primary_disease: DiseaseReport::HEALTHY.into(),
                    overall_severity: DiseaseSeverity::None,
                    confidence_average: 95.0,
                },
                image_quality: ImageQuality::Poor,
                processing_time: None,
            },
        }
    }

    #[test]
    fn loads_history_and_navigates() {
        let db = Database::open_in_memory().unwrap();
        db.save_disease_detection("a", &disease("one.png")).unwrap();
        db.save_disease_detection("b", &disease("two.png")).unwrap();

        let mut app = App::new(db, None, 10).unwrap();
        assert!(app.crops.is_empty());
        assert_eq!(app.current_len(), 0);

        app.switch_screen(Screen::Diseases);
        assert_eq!(app.current_len(), 2);
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected_index, 1);
        app.select_prev();
        assert_eq!(app.list_state.selected_index, 0);
    }

    #[test]
    fn user_filter_applies() {
        let db = Database::open_in_memory().unwrap();
        db.save_disease_detection("a", &disease("one.png")).unwrap();
        db.save_disease_detection("b", &disease("two.png")).unwrap();

        let app = App::new(db, Some("b".into()), 10).unwrap();
        assert_eq!(app.diseases.len(), 1);
        assert_eq!(app.diseases[0].document.image.original_name, "two.png");
    }

    #[test]
    fn screens_cycle_and_map_keys() {
        assert_eq!(Screen::from_key('2'), Some(Screen::Fertilizer));
        assert_eq!(Screen::from_key('x'), None);
        assert_eq!(Screen::Diseases.next(), Screen::Crops);
    }

    #[test]
    fn clamp_after_shrink() {
        let mut state = ListState::new();
        state.selected_index = 5;
        state.clamp(2);
        assert_eq!(state.selected_index, 1);
        state.clamp(0);
        assert_eq!(state.selected_index, 0);
    }
}
