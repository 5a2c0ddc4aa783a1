use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use cstracker_core::models::ApplicationRequest;

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{accreditation, dashboard, programs, submissions};

const LOGO: [&str; 3] = [
    "    ╔═╗╔═╗  ╔╦╗╦═╗╔═╗╔═╗╦╔═╔═╗╦═╗",
    "    ║  ╚═╗   ║ ╠╦╝╠═╣║  ╠╩╗║╣ ╠╦╝",
    "    ╚═╝╚═╝   ╩ ╩╚═╩ ╩╚═╝╩ ╩╚═╝╩╚═",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::Applying => render_application_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  CS Tracker";
    let user = match app.context.snapshot() {
        Some(data) => format!("{} ({})  [?] Help", data.username, data.role),
        None => "[?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + user.chars().count() + 4),
        )),
        Span::styled(user, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in app.tabs().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if !app.is_authenticated() {
        return;
    }
    match app.current_tab {
        Tab::Submissions => submissions::render(frame, app, area),
        Tab::Accreditation => accreditation::render(frame, app, area),
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Programs => programs::render(frame, app, area),
    }
}

fn shortcuts(tab: Tab) -> &'static str {
    match tab {
        Tab::Submissions => "[a]pprove [r]eject | [u]pdate | [L]ogout | [q]uit",
        Tab::Accreditation => "[a]pprove | [u]pdate | [L]ogout | [q]uit",
        Tab::Programs => "[Enter] apply | [u]pdate | [L]ogout | [q]uit",
        Tab::Dashboard => "[u]pdate | [L]ogout | [q]uit",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match (&app.status_message, app.context.snapshot()) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(data)) => format!(" Signed in {} ", data.age_display()),
        (None, None) => " Not signed in ".to_string(),
    };
    let right_text = format!(" {} ", shortcuts(app.current_tab));

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect_fixed(52, 26, frame.area());
    frame.render_widget(Clear, area);

    let mut help_text = logo_lines();
    help_text.push(Line::from(Span::styled(
        format!("              version {}", env!("CARGO_PKG_VERSION")),
        styles::muted_style(),
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-2", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("↑/↓", "Navigate list"),
        help_line("Enter", "Expand / collapse, apply to program"),
        help_line("Esc", "Collapse"),
        Line::from(""),
        Line::from(Span::styled(" Review", styles::highlight_style())),
        help_line("a", "Approve the open submission or log"),
        help_line("r", "Reject the open submission"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("u", "Reload from the server"),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// One `Label: [value▌]` form line.
fn form_field(label: &str, value: &str, focused: bool, label_width: usize) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:>width$}: [", label, width = label_width), styles::muted_style()),
        Span::styled(format!("{:<18}{}", value, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));

    let username = input_tail(&app.login_username, 18);
    lines.push(form_field(
        "Username",
        &username,
        app.login_focus == LoginFocus::Username,
        10,
    ));
    let masked = "*".repeat(app.login_password.chars().count().min(18));
    lines.push(form_field(
        "Password",
        &masked,
        app.login_focus == LoginFocus::Password,
        10,
    ));

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_application_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.application.as_ref() else {
        return;
    };
    let height = ApplicationRequest::FIELDS.len() as u16 + if form.error.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Apply for {}", form.program_name),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    for (i, label) in ApplicationRequest::FIELDS.iter().enumerate() {
        let value = form.request.field(i).map(|v| input_tail(v, 18)).unwrap_or_default();
        lines.push(form_field(label, &value, form.focus == i, 23));
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("  Submitting...", styles::muted_style())));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Enter", styles::help_key_style()),
            Span::styled(" next / submit on last field  ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]));
    }

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Last `max` characters of an input, so the cursor end stays visible.
fn input_tail(value: &str, max: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(max)).collect()
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));
        // Clamped to the available area
        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect_fixed(46, 10, small), Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_input_tail() {
        assert_eq!(input_tail("short", 18), "short");
        assert_eq!(input_tail("abcdefghij", 4), "ghij");
    }
}
