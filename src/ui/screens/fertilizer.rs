use super::{details_block, label_value, render_frame, render_list, split_body, timestamp};
use crate::models::{FertilizerRecord, Stored};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

pub struct FertilizerHistoryScreen<'a> {
    pub records: &'a [Stored<FertilizerRecord>],
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
}

impl<'a> FertilizerHistoryScreen<'a> {
    pub fn new(records: &'a [Stored<FertilizerRecord>]) -> Self {
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

fn crop_name(record: &FertilizerRecord) -> String {
    record
        .request
        .crop_info
        .as_ref()
        .and_then(|c| c.crop_type.clone())
        .unwrap_or_else(|| "Unknown crop".into())
}

impl Widget for FertilizerHistoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = render_frame(
            area,
            buf,
            "Fertilizer Plans",
            self.records.len(),
            self.status_message,
        );
        let (list_area, details_area) = split_body(body);

        let lines = self
            .records
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("{} ", timestamp(&r.created_at)), Theme::dim()),
                    Span::styled(crop_name(&r.document), Theme::normal()),
                    Span::styled(
                        format!("  ₹{:.0}", r.document.advice.total_cost),
                        Theme::highlight(),
                    ),
                ])
            })
            .collect();
        render_list(
            list_area,
            buf,
            lines,
            self.selected_index,
            "No fertilizer plans yet",
        );

        self.render_details(details_area, buf);
    }
}

impl FertilizerHistoryScreen<'_> {
    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let inner = details_block(area, buf);
        let Some(record) = self.records.get(self.selected_index) else {
            return;
        };
        let advice = &record.document.advice;
        let status = &advice.analysis_summary.soil_status;
        let needs = &advice.analysis_summary.nutrient_requirements;

        let mut lines = vec![
            Line::from(Span::styled(crop_name(&record.document), Theme::header())),
            label_value(
                "Soil N/P/K: ",
                format!(
                    "{} / {} / {}  pH {}",
                    status.nitrogen_status,
                    status.phosphorus_status,
                    status.potassium_status,
                    status.ph_status
                ),
            ),
            Line::from(vec![
                Span::styled("Fertility: ", Theme::dim()),
                Span::styled(
                    status.overall_fertility.as_str(),
                    Style::default().fg(Theme::fertility_color(status.overall_fertility)),
                ),
            ]),
            label_value(
                "Needed N/P/K: ",
                format!(
                    "{:.0} / {:.0} / {:.0} kg/acre",
                    needs.nitrogen_needed, needs.phosphorus_needed, needs.potassium_needed
                ),
            ),
            label_value(
                "Cost: ",
                format!(
                    "₹{:.0} total, ₹{:.0}/acre",
                    advice.total_cost, advice.analysis_summary.cost_per_acre
                ),
            ),
            Line::from(vec![]),
        ];

        if advice.recommendations.is_empty() {
            lines.push(Line::from(Span::styled(
                "Soil already meets this crop's needs",
                Theme::success(),
            )));
        }
        for plan in &advice.recommendations {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", plan.fertilizer_type), Theme::dim()),
                Span::styled(plan.fertilizer_name.clone(), Theme::highlight()),
            ]));
            lines.push(Line::from(Span::styled(
                format!(
                    "  {}  ₹{:.0}/acre  {}",
                    plan.application_rate, plan.cost_per_acre, plan.application_timing
                ),
                Theme::normal(),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
