pub mod crops;
pub mod diseases;
pub mod fertilizer;

pub use crops::CropHistoryScreen;
pub use diseases::DiseaseHistoryScreen;
pub use fertilizer::FertilizerHistoryScreen;

use crate::ui::Theme;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

/// Title, body, status and nav rows shared by every history screen.
/// Returns the body area.
fn render_frame(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    count: usize,
    status: Option<&str>,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(8),    // Content
            Constraint::Length(1), // Status message
            Constraint::Length(1), // Nav
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(title.to_string(), Theme::title()),
        Span::styled(format!(" ({} records)", count), Theme::dim()),
    ]);
    Paragraph::new(title).render(chunks[0], buf);

    if let Some(msg) = status {
        Paragraph::new(Span::styled(msg.to_string(), Theme::warning())).render(chunks[2], buf);
    }

    let nav = Line::from(vec![
        Span::styled("[1]", Theme::nav_key()),
        Span::styled("Crops ", Theme::nav_label()),
        Span::styled("[2]", Theme::nav_key()),
        Span::styled("Fertilizer ", Theme::nav_label()),
        Span::styled("[3]", Theme::nav_key()),
        Span::styled("Diseases ", Theme::nav_label()),
        Span::styled("[↑↓]", Theme::nav_key()),
        Span::styled("Navigate ", Theme::nav_label()),
        Span::styled("[r]", Theme::nav_key()),
        Span::styled("Reload ", Theme::nav_label()),
        Span::styled("[q]", Theme::nav_key()),
        Span::styled("Quit", Theme::nav_label()),
    ]);
    Paragraph::new(nav).render(chunks[3], buf);

    chunks[1]
}

/// Split the body into a record list and a details pane.
fn split_body(area: Rect) -> (Rect, Rect) {
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    (content[0], content[1])
}

fn render_list(area: Rect, buf: &mut Buffer, lines: Vec<Line<'_>>, selected: usize, empty: &str) {
    let block = Block::default()
        .title("History")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    block.render(area, buf);

    if lines.is_empty() {
        Paragraph::new(Span::styled(empty.to_string(), Theme::dim())).render(inner, buf);
        return;
    }

    let items: Vec<ListItem> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == selected {
                Theme::selected()
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    List::new(items).render(inner, buf);
}

fn details_block(area: Rect, buf: &mut Buffer) -> Rect {
    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

fn timestamp(created_at: &DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn label_value<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Theme::dim()),
        Span::styled(value, Theme::normal()),
    ])
}
