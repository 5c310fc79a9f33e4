use super::{details_block, label_value, render_frame, render_list, split_body, timestamp};
use crate::models::{CropRecord, Stored};
use crate::ui::components::{confidence_gauge, ph_gauge};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

pub struct CropHistoryScreen<'a> {
    pub records: &'a [Stored<CropRecord>],
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
}

impl<'a> CropHistoryScreen<'a> {
    pub fn new(records: &'a [Stored<CropRecord>]) -> Self {
        Self {
            records,
            selected_index: 0,
            status_message: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for CropHistoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = render_frame(
            area,
            buf,
            "Crop Recommendations",
            self.records.len(),
            self.status_message,
        );
        let (list_area, details_area) = split_body(body);

        let lines = self
            .records
            .iter()
            .map(|r| {
                let top = r
                    .document
                    .advice
                    .recommendations
                    .first()
                    .map(|c| c.crop_name.as_str())
                    .unwrap_or("no match");
                Line::from(vec![
                    Span::styled(format!("{} ", timestamp(&r.created_at)), Theme::dim()),
                    Span::styled(top.to_string(), Theme::normal()),
                    Span::styled(format!("  {}", r.user_id), Theme::dim()),
                ])
            })
            .collect();
        render_list(
            list_area,
            buf,
            lines,
            self.selected_index,
            "No crop recommendations yet",
        );

        self.render_details(details_area, buf);
    }
}

impl CropHistoryScreen<'_> {
    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let inner = details_block(area, buf);
        let Some(record) = self.records.get(self.selected_index) else {
            return;
        };
        let advice = &record.document.advice;
        let summary = &advice.analysis_summary;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(4)])
            .split(inner);

        let gauges = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        let best = advice.recommendations.first().map(|c| c.confidence_score);
        confidence_gauge("Best match", best).render(gauges[0], buf);
        let ph = record
            .document
            .request
            .soil_data
            .as_ref()
            .and_then(|s| s.ph);
        ph_gauge("Soil pH", ph).render(gauges[1], buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Soil quality: ", Theme::dim()),
                Span::styled(
                    summary.soil_quality.as_str(),
                    Style::default().fg(Theme::fertility_color(summary.soil_quality)),
                ),
            ]),
            label_value(
                "Irrigation: ",
                summary.climate_suitability.irrigation_requirement.clone(),
            ),
            label_value(
                "Season: ",
                format!(
                    "{} ({})",
                    summary.market_factors.season, summary.climate_suitability.season_suitability
                ),
            ),
        ];
        if !summary.climate_suitability.climate_risks.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Risks: {}", summary.climate_suitability.climate_risks.join(", ")),
                Theme::warning(),
            )));
        }
        lines.push(Line::from(vec![]));

        for crop in &advice.recommendations {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>4.0}% ", crop.confidence_score),
                    Style::default().fg(Theme::score_color(crop.confidence_score)),
                ),
                Span::styled(crop.crop_name.clone(), Theme::header()),
                Span::styled(
                    format!(
                        "  yield {:.1} t  profit ₹{:.0}",
                        crop.expected_yield, crop.profit_margin
                    ),
                    Theme::dim(),
                ),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}
