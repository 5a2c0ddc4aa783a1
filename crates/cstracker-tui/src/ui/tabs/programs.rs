use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use cstracker_core::models::Program;
use cstracker_core::utils::format_hours;

use crate::app::App;
use crate::ui::styles;

use super::render_notice;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let empty = app
        .programs
        .is_empty()
        .then_some("No programs are open for applications.");
    if render_notice(
        frame,
        area,
        "Programs",
        app.programs_loading && app.programs.is_empty(),
        app.programs_error.as_deref(),
        empty,
    ) {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_program_table(frame, app, chunks[0]);
    render_program_detail(frame, app.programs.get(app.selection), chunks[1]);
}

fn remaining_cell(program: &Program) -> Cell<'static> {
    match program.remaining_slots() {
        Some(0) => Cell::from("Full").style(styles::error_style()),
        Some(n) => Cell::from(n.to_string()),
        None => Cell::from("-").style(styles::muted_style()),
    }
}

fn render_program_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([Cell::from("Program"), Cell::from("Date"), Cell::from("Left")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .programs
        .iter()
        .enumerate()
        .map(|(i, program)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(program.name.clone()),
                Cell::from(program.date.clone().unwrap_or_else(|| "TBD".to_string())),
                remaining_cell(program),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Programs ({}) ", app.programs.len()))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_program_detail(frame: &mut Frame, program: Option<&Program>, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(program) = program else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(program.name.clone(), styles::title_style())),
        Line::from(""),
    ];
    if let Some(ref description) = program.description {
        lines.push(Line::from(description.clone()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(program.venue_line()));
    lines.push(Line::from(program.schedule_line()));
    lines.push(Line::from(vec![
        Span::styled("Credit: ", styles::highlight_style()),
        Span::raw(
            program
                .hours
                .map(|h| format!("{} hours", format_hours(h)))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]));
    lines.push(Line::from(program.capacity_line()));
    lines.push(Line::from(""));

    if program.is_full() {
        lines.push(Line::from(Span::styled(
            "This program is full.",
            styles::error_style(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" Apply", styles::help_desc_style()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
