use super::{details_block, label_value, render_frame, render_list, split_body, timestamp};
use crate::models::{DiseaseRecord, Stored};
use crate::ui::components::confidence_gauge;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

pub struct DiseaseHistoryScreen<'a> {
    pub records: &'a [Stored<DiseaseRecord>],
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
}

impl<'a> DiseaseHistoryScreen<'a> {
    pub fn new(records: &'a [Stored<DiseaseRecord>]) -> Self {
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

impl Widget for DiseaseHistoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = render_frame(
            area,
            buf,
            "Disease Detections",
            self.records.len(),
            self.status_message,
        );
        let (list_area, details_area) = split_body(body);

        let lines = self
            .records
            .iter()
            .map(|r| {
                let summary = &r.document.analysis.analysis_summary;
                Line::from(vec![
                    Span::styled(format!("{} ", timestamp(&r.created_at)), Theme::dim()),
                    Span::styled(
                        summary.primary_disease.clone(),
                        Style::default().fg(Theme::severity_color(summary.overall_severity)),
                    ),
                ])
            })
            .collect();
        render_list(
            list_area,
            buf,
            lines,
            self.selected_index,
            "No disease detections yet",
        );

        self.render_details(details_area, buf);
    }
}

impl DiseaseHistoryScreen<'_> {
    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let inner = details_block(area, buf);
        let Some(record) = self.records.get(self.selected_index) else {
            return;
        };
        let analysis = &record.document.analysis;
        let summary = &analysis.analysis_summary;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(4)])
            .split(inner);
        confidence_gauge("Average confidence", Some(summary.confidence_average))
            .render(chunks[0], buf);

        let mut lines = vec![
            label_value(
                "Image: ",
                format!(
                    "{} ({} bytes, {:?})",
                    record.document.image.original_name,
                    record.document.image.size,
                    analysis.image_quality
                ),
            ),
            label_value("User: ", record.user_id.clone()),
            Line::from(vec![]),
        ];

        for report in &analysis.detected_diseases {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", report.severity),
                    Style::default().fg(Theme::severity_color(report.severity)),
                ),
                Span::styled(report.disease_name.clone(), Theme::header()),
                Span::styled(
                    format!("  {} {:.0}%", report.crop_affected, report.confidence),
                    Theme::dim(),
                ),
            ]));
            if let Some(step) = report.treatment.first() {
                lines.push(Line::from(Span::styled(
                    format!("  Treat: {}", step),
                    Theme::success(),
                )));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}
