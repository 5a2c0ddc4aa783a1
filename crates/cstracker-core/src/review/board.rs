use tracing::debug;

use crate::models::{ProgramLogs, ServiceLog, Submission};

use super::{ExpansionState, GroupedProgram};

/// A program entry that owns a list of reviewable members.
pub trait ProgramGroup {
    type Member;

    fn program_id(&self) -> i64;
    fn program_name(&self) -> &str;
    fn members(&self) -> &[Self::Member];
    fn member_id(member: &Self::Member) -> i64;
}

impl ProgramGroup for GroupedProgram {
    type Member = Submission;

    fn program_id(&self) -> i64 {
        self.program.id
    }

    fn program_name(&self) -> &str {
        &self.program.name
    }

    fn members(&self) -> &[Submission] {
        &self.submissions
    }

    fn member_id(member: &Submission) -> i64 {
        member.id
    }
}

impl ProgramGroup for ProgramLogs {
    type Member = ServiceLog;

    fn program_id(&self) -> i64 {
        self.id
    }

    fn program_name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> &[ServiceLog] {
        &self.applicants
    }

    fn member_id(member: &ServiceLog) -> i64 {
        member.id
    }
}

/// One visible line of a review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Program(i64),
    Member { program_id: i64, member_id: i64 },
}

/// State of one review screen: the grouped data, what is expanded and
/// whether a load is running or failed.
///
/// Every load and every action that ends in a reload takes a ticket from
/// the board. A result carrying an older ticket than the newest one already
/// applied is dropped, so a slow fetch cannot overwrite the list re-fetched
/// after a decision. A successful fetch replaces the data wholesale but keeps
/// the expansion state; a failed fetch keeps the previous data.
#[derive(Debug, Clone)]
pub struct Board<P> {
    pub programs: Vec<P>,
    pub expansion: ExpansionState,
    pub loading: bool,
    pub error: Option<String>,
    issued: u64,
    applied: u64,
    pending_load: u64,
}

impl<P> Default for Board<P> {
    fn default() -> Self {
        Self {
            programs: Vec::new(),
            expansion: ExpansionState::Collapsed,
            loading: false,
            error: None,
            issued: 0,
            applied: 0,
            pending_load: 0,
        }
    }
}

impl<P: ProgramGroup> Board<P> {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Start a fetch; returns its ticket.
    pub fn begin_load(&mut self) -> u64 {
        let ticket = self.issue();
        self.pending_load = ticket;
        self.loading = true;
        self.error = None;
        ticket
    }

    /// Ticket for an action whose result carries a fresh list.
    pub fn begin_action(&mut self) -> u64 {
        self.issue()
    }

    fn is_stale(&self, ticket: u64) -> bool {
        ticket < self.applied
    }

    /// Apply the list fetched under `ticket`. Returns false if a newer list
    /// was already applied.
    pub fn replace(&mut self, ticket: u64, programs: Vec<P>) -> bool {
        if self.is_stale(ticket) {
            debug!(ticket, applied = self.applied, "Dropped out-of-order list");
            return false;
        }
        self.applied = ticket;
        self.programs = programs;
        self.error = None;
        if ticket >= self.pending_load {
            self.loading = false;
        }
        true
    }

    /// Record a failed fetch. Ignored when a newer fetch or list superseded it.
    pub fn fail(&mut self, ticket: u64, message: String) -> bool {
        if self.is_stale(ticket) || ticket < self.pending_load {
            debug!(ticket, "Dropped superseded fetch error");
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Rows in display order: every program, plus the members of the
    /// expanded one directly below it.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for program in &self.programs {
            let program_id = program.program_id();
            rows.push(Row::Program(program_id));
            if self.expansion.is_program_expanded(program_id) {
                rows.extend(program.members().iter().map(|m| Row::Member {
                    program_id,
                    member_id: P::member_id(m),
                }));
            }
        }
        rows
    }

    /// Toggle whatever `row` points at.
    pub fn activate(&mut self, row: Row) {
        match row {
            Row::Program(id) => self.expansion.toggle_program(id),
            Row::Member { member_id, .. } => self.expansion.toggle_student(member_id),
        }
    }

    pub fn program(&self, program_id: i64) -> Option<&P> {
        self.programs.iter().find(|p| p.program_id() == program_id)
    }

    pub fn member(&self, program_id: i64, member_id: i64) -> Option<&P::Member> {
        self.program(program_id)?
            .members()
            .iter()
            .find(|m| P::member_id(m) == member_id)
    }

    /// The member whose detail panel is open, if any.
    pub fn expanded_member(&self) -> Option<(&P, &P::Member)> {
        let program = self.program(self.expansion.expanded_program()?)?;
        let member_id = self.expansion.expanded_student()?;
        let member = program
            .members()
            .iter()
            .find(|m| P::member_id(m) == member_id)?;
        Some((program, member))
    }
}
