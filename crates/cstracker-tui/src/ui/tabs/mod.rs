//! Tab-specific content rendering.

pub mod accreditation;
pub mod dashboard;
pub mod programs;
pub mod submissions;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;

/// Replace a list with a loading / error / empty notice.
/// Returns false when there is data to show.
pub(crate) fn render_notice(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    loading: bool,
    error: Option<&str>,
    empty: Option<&str>,
) -> bool {
    let line = if let Some(error) = error {
        Line::from(vec![
            Span::styled(error.to_string(), styles::error_style()),
            Span::styled("  [u] try again", styles::muted_style()),
        ])
    } else if loading {
        Line::from(Span::styled("Loading...", styles::muted_style()))
    } else if let Some(empty) = empty {
        Line::from(Span::styled(empty.to_string(), styles::muted_style()))
    } else {
        return false;
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]).block(block), area);
    true
}

/// Tree marker for a program row.
pub(crate) fn expander(expanded: bool) -> &'static str {
    if expanded {
        "▾"
    } else {
        "▸"
    }
}
