use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cstracker_core::models::ServiceLog;
use cstracker_core::review::{ProgramGroup, Row};
use cstracker_core::utils::{format_hours, truncate_string};

use crate::app::{source_label, App};
use crate::ui::styles;

use super::{expander, render_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.logs;
    let title = format!("Accreditation ({})", source_label(app.accreditation_source()));
    let blocking_error = if board.is_empty() { board.error.as_deref() } else { None };
    let empty = board.is_empty().then_some("No service logs awaiting accreditation.");
    if render_notice(
        frame,
        area,
        &title,
        board.loading && board.is_empty(),
        blocking_error,
        empty,
    ) {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_tree(frame, app, &title, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_tree(frame: &mut Frame, app: &App, title: &str, area: Rect) {
    let board = &app.logs;
    let width = area.width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = board
        .rows()
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let line = match row {
                Row::Program(id) => {
                    let group = board.program(id)?;
                    Line::from(vec![
                        Span::styled(
                            format!("{} ", expander(board.expansion.is_program_expanded(id))),
                            styles::muted_style(),
                        ),
                        Span::raw(truncate_string(group.program_name(), width.saturating_sub(12))),
                        Span::styled(
                            format!("  {} log(s)", group.applicants.len()),
                            styles::muted_style(),
                        ),
                    ])
                }
                Row::Member {
                    program_id,
                    member_id,
                } => {
                    let log = board.member(program_id, member_id)?;
                    log_line(log, board.expansion.is_student_expanded(member_id), width)
                }
            };
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Some(ListItem::new(line).style(style))
        })
        .collect();

    let mut block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    if let Some(ref error) = board.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", error),
            styles::error_style(),
        )));
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn log_line(log: &ServiceLog, expanded: bool, width: usize) -> Line<'static> {
    let marker = if expanded { "•" } else { " " };
    let check = if log.is_approved() { "✓" } else { " " };
    Line::from(vec![
        Span::raw(format!("   {} ", marker)),
        Span::styled(format!("{} ", check), styles::success_style()),
        Span::styled(
            truncate_string(&log.label(), width.saturating_sub(8)),
            styles::status_style(&log.status),
        ),
    ])
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.logs;

    let (title, lines) = match board.expanded_member() {
        Some((_, log)) => {
            let row = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", label), styles::highlight_style()),
                    Span::raw(value),
                ])
            };
            let student = log
                .student
                .as_ref()
                .map(|s| s.display_name().to_string())
                .unwrap_or_else(|| "-".to_string());

            let mut lines = vec![
                row("Program", log.program_name().to_string()),
                row("Student", student),
                row(
                    "Facilitator",
                    log.facilitator.clone().unwrap_or_else(|| "-".to_string()),
                ),
                row("Date", log.date.clone().unwrap_or_else(|| "-".to_string())),
                row(
                    "Hours",
                    log.hours.map(format_hours).unwrap_or_else(|| "-".to_string()),
                ),
                Line::from(vec![
                    Span::styled(format!("{:<14}", "Status"), styles::highlight_style()),
                    Span::styled(log.status.to_string(), styles::status_style(&log.status)),
                ]),
                Line::from(""),
            ];

            if log.is_approved() {
                lines.push(Line::from(Span::styled(
                    "Approved",
                    styles::success_style(),
                )));
            } else if app.action_in_flight {
                lines.push(Line::from(Span::styled("Approving...", styles::muted_style())));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("[a]", styles::help_key_style()),
                    Span::styled(" Approve", styles::success_style()),
                ]));
            }

            (format!(" Service Log #{} ", log.id), lines)
        }
        None => (
            " No Log Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Expand a program and select a service log",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
