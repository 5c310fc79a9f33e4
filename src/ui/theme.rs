use crate::models::{DiseaseSeverity, FertilityRating};
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Green;
    pub const HIGHLIGHT: Color = Color::Cyan;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Score bands
    pub const SCORE_LOW: Color = Color::Red;
    pub const SCORE_FAIR: Color = Color::Yellow;
    pub const SCORE_GOOD: Color = Color::LightGreen;
    pub const SCORE_HIGH: Color = Color::Green;

    // Styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Color for a 0-100 score.
    pub fn score_color(score: f64) -> Color {
        if score < 40.0 {
            Self::SCORE_LOW
        } else if score < 60.0 {
            Self::SCORE_FAIR
        } else if score < 80.0 {
            Self::SCORE_GOOD
        } else {
            Self::SCORE_HIGH
        }
    }

    pub fn fertility_color(rating: FertilityRating) -> Color {
        match rating {
            FertilityRating::Poor => Self::SCORE_LOW,
            FertilityRating::Fair => Self::SCORE_FAIR,
            FertilityRating::Good => Self::SCORE_GOOD,
            FertilityRating::Excellent => Self::SCORE_HIGH,
        }
    }

    pub fn severity_color(severity: DiseaseSeverity) -> Color {
        match severity {
            DiseaseSeverity::None => Self::SUCCESS,
            DiseaseSeverity::Low => Self::HIGHLIGHT,
            DiseaseSeverity::Medium => Self::WARNING,
            DiseaseSeverity::High => Self::ERROR,
        }
    }

    pub fn nav_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_label() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }
}
