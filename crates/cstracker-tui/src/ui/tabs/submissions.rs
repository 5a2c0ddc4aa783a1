use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cstracker_core::models::Submission;
use cstracker_core::review::{GroupedProgram, Row};
use cstracker_core::utils::{format_phone, truncate_string};

use crate::app::App;
use crate::ui::styles;

use super::{expander, render_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.submissions;
    let blocking_error = if board.is_empty() { board.error.as_deref() } else { None };
    let empty = board.is_empty().then_some("No submissions to review.");
    if render_notice(
        frame,
        area,
        "Review Submissions",
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

    render_tree(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_tree(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.submissions;
    let width = area.width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = board
        .rows()
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let line = match row {
                Row::Program(id) => {
                    let group = board.program(id)?;
                    program_line(group, board.expansion.is_program_expanded(id), width)
                }
                Row::Member {
                    program_id,
                    member_id,
                } => {
                    let submission = board.member(program_id, member_id)?;
                    member_line(submission, board.expansion.is_student_expanded(member_id), width)
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

    let mut title = format!(" Programs ({}) ", board.programs.len());
    if board.loading {
        title.push_str("- refreshing ");
    }
    let mut block = Block::default()
        .title(title)
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

fn program_line(group: &GroupedProgram, expanded: bool, width: usize) -> Line<'static> {
    let program = &group.program;
    Line::from(vec![
        Span::styled(format!("{} ", expander(expanded)), styles::muted_style()),
        Span::raw(truncate_string(&program.name, width.saturating_sub(16))),
        Span::styled(
            format!("  {} applicant(s)", group.submissions.len()),
            styles::muted_style(),
        ),
    ])
}

fn member_line(submission: &Submission, expanded: bool, width: usize) -> Line<'static> {
    let marker = if expanded { "•" } else { " " };
    Line::from(vec![
        Span::raw(format!("   {} ", marker)),
        Span::raw(truncate_string(
            &submission.student_line(),
            width.saturating_sub(16),
        )),
        Span::raw("  "),
        Span::styled(
            submission.status.to_string(),
            styles::status_style(&submission.status),
        ),
    ])
}

fn labelled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<20}", label), styles::highlight_style()),
        Span::raw(value),
    ])
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.submissions;

    let (title, lines) = match board.expanded_member() {
        Some((group, submission)) => {
            let program = &group.program;
            let (contact_name, contact_phone) = submission.emergency_contact();
            let cys = submission
                .student()
                .and_then(|s| s.cys.clone())
                .unwrap_or_else(|| "-".to_string());

            let mut lines = vec![
                labelled("Student", submission.student_name().to_string()),
                labelled("Course/Year/Section", cys),
                Line::from(vec![
                    Span::styled(format!("{:<20}", "Status"), styles::highlight_style()),
                    Span::styled(
                        submission.status.to_string(),
                        styles::status_style(&submission.status),
                    ),
                ]),
                Line::from(""),
                Line::from(Span::styled("Emergency contact", styles::title_style())),
                labelled("Name", contact_name.unwrap_or("-").to_string()),
                labelled(
                    "Phone",
                    contact_phone.map(format_phone).unwrap_or_else(|| "-".to_string()),
                ),
                Line::from(""),
                Line::from(Span::styled(program.name.clone(), styles::title_style())),
                labelled("Venue", program.venue_line()),
                labelled("Schedule", program.schedule_line()),
                labelled("Capacity", program.capacity_line()),
                Line::from(""),
            ];

            if app.action_in_flight {
                lines.push(Line::from(Span::styled(
                    "Sending decision...",
                    styles::muted_style(),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("[a]", styles::help_key_style()),
                    Span::styled(" Approve   ", styles::success_style()),
                    Span::styled("[r]", styles::help_key_style()),
                    Span::styled(" Reject", styles::error_style()),
                ]));
            }

            (format!(" Submission #{} ", submission.id), lines)
        }
        None => (
            " No Student Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Expand a program and select a student",
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
