use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use cstracker_core::utils::{format_hours, progress_bar};

use crate::app::App;
use crate::ui::styles;

use super::render_notice;

/// Width of the text bar under the gauge.
const BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let progress = match app.progress.as_ref() {
        Some(p) if app.progress_error.is_none() => p,
        _ => {
            render_notice(
                frame,
                area,
                "Dashboard",
                app.progress_loading,
                app.progress_error.as_deref(),
                Some("No progress recorded yet."),
            );
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let ratio = progress.ratio();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Service Hours ")
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .gauge_style(styles::success_style())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, chunks[0]);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), styles::highlight_style()),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        stat("Completed", format!("{} hours", format_hours(progress.completed()))),
        stat("Required", format!("{} hours", format_hours(progress.required()))),
        stat("Remaining", format!("{} hours", format_hours(progress.remaining()))),
        Line::from(""),
        Line::from(Span::styled(progress_bar(ratio, BAR_WIDTH), styles::muted_style())),
        Line::from(""),
    ];
    if progress.remaining() <= 0.0 {
        lines.push(Line::from(Span::styled(
            "All required service hours completed.",
            styles::success_style(),
        )));
    }

    let block = Block::default()
        .title(" Progress ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}
