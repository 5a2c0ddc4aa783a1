//! Application state management for the cstracker terminal front end.
//!
//! This module contains the core `App` struct: UI state, the signed-in
//! session, the per-screen review boards and the background task plumbing
//! that carries fetch and decision results back to the UI loop.

use std::future::Future;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use cstracker_core::config::AccreditationSource;
use cstracker_core::models::{
    ApplicationRequest, Decision, Program, ProgramLogs, ProgressSummary, Role,
};
use cstracker_core::review::{
    decision_message, AccreditationDispatcher, Board, DecisionDispatcher, DecisionOutcome,
    GroupedProgram, Row, ScreenScope, Scoped,
};
use cstracker_core::{ApiClient, ApiError, Config, CredentialStore, Session, SessionContext};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background result channel.
/// A screen has at most a fetch and one action in flight.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for an application form field.
const MAX_FIELD_LENGTH: usize = 100;

/// Environment variables prefilling the login form
const USERNAME_ENV: &str = "CSTRACKER_USERNAME";
const PASSWORD_ENV: &str = "CSTRACKER_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs. Which ones are shown depends on the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Submissions,
    Accreditation,
    Dashboard,
    Programs,
}

const ADMIN_TABS: [Tab; 2] = [Tab::Submissions, Tab::Accreditation];
const STUDENT_TABS: [Tab; 2] = [Tab::Dashboard, Tab::Programs];

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Submissions => "Submissions",
            Tab::Accreditation => "Accreditation",
            Tab::Dashboard => "Dashboard",
            Tab::Programs => "Programs",
        }
    }

    pub fn for_role(role: Role) -> &'static [Tab] {
        match role {
            Role::Admin => &ADMIN_TABS,
            Role::Student => &STUDENT_TABS,
        }
    }

    /// Next tab for `role` (wrapping around)
    pub fn next(&self, role: Role) -> Self {
        let tabs = Self::for_role(role);
        match tabs.iter().position(|t| t == self) {
            Some(i) => tabs[(i + 1) % tabs.len()],
            None => tabs[0],
        }
    }

    /// Previous tab for `role` (wrapping around)
    pub fn prev(&self, role: Role) -> Self {
        let tabs = Self::for_role(role);
        match tabs.iter().position(|t| t == self) {
            Some(i) => tabs[(i + tabs.len() - 1) % tabs.len()],
            None => tabs[0],
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    LoggingIn,
    Applying,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Program application form shown over the Programs tab.
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    pub program_name: String,
    pub request: ApplicationRequest,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ApplicationForm {
    pub fn new(program: &Program) -> Self {
        Self {
            program_name: program.name.clone(),
            request: ApplicationRequest::for_program(program.id),
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn field_count(&self) -> usize {
        ApplicationRequest::FIELDS.len()
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.field_count();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.field_count() - 1) % self.field_count();
    }

    pub fn on_last_field(&self) -> bool {
        self.focus + 1 == self.field_count()
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.request.field_mut(self.focus) {
            if can_add_field_char(field.chars().count(), c) {
                field.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.request.field_mut(self.focus) {
            field.pop();
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results posted back by background tasks, one variant per operation.
///
/// Each message is stamped with the screen epoch it was started in; results
/// from a screen the user already left are dropped unread.
///
/// Results that carry a review list also carry the board ticket they were
/// requested under, so an older list never replaces a newer one.
enum ScreenResult {
    Submissions {
        ticket: u64,
        result: Result<Vec<GroupedProgram>>,
    },
    Decided {
        ticket: u64,
        student: String,
        program: String,
        result: Result<DecisionOutcome>,
    },
    Logs {
        ticket: u64,
        result: Result<Vec<ProgramLogs>>,
    },
    Approved {
        ticket: u64,
        label: String,
        result: Result<Vec<ProgramLogs>>,
    },
    Programs(Result<Vec<Program>>),
    Progress(Result<ProgressSummary>),
    Applied {
        program: String,
        result: Result<()>,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub context: SessionContext,
    pub api: ApiClient,
    decisions: DecisionDispatcher,
    accreditation: AccreditationDispatcher,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub selection: usize,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Admin screens
    pub submissions: Board<GroupedProgram>,
    pub logs: Board<ProgramLogs>,

    // Student screens
    pub programs: Vec<Program>,
    pub programs_loading: bool,
    pub programs_error: Option<String>,
    pub progress: Option<ProgressSummary>,
    pub progress_loading: bool,
    pub progress_error: Option<String>,
    pub application: Option<ApplicationForm>,

    /// Set while a decision or approval is on its way to the server;
    /// action keys are ignored until its result arrives.
    pub action_in_flight: bool,

    // Background task plumbing
    scope: ScreenScope,
    result_rx: mpsc::Receiver<Scoped<ScreenResult>>,
    result_tx: mpsc::Sender<Scoped<ScreenResult>>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(api = config.base_url(), source = ?config.accreditation_source, "Config loaded");

        let data_dir = config.data_dir()?;
        let mut session = Session::new(data_dir);
        match session.load() {
            Ok(found) => debug!(found, "Session loaded"),
            Err(e) => warn!(error = %e, "Failed to load session"),
        }

        let api = ApiClient::from_config(&config)?;
        Ok(Self::with_services(config, session, api))
    }

    /// Assemble the app around already-built services.
    pub fn with_services(config: Config, session: Session, api: ApiClient) -> Self {
        let context = SessionContext::new(session.data.clone());
        let decisions = DecisionDispatcher::new(api.clone(), context.clone());
        let accreditation = AccreditationDispatcher::new(
            api.clone(),
            context.clone(),
            config.accreditation_source,
        );
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var(USERNAME_ENV)
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();

        let current_tab = context
            .role()
            .map(|role| Tab::for_role(role)[0])
            .unwrap_or(Tab::Submissions);

        Self {
            config,
            session,
            context,
            api,
            decisions,
            accreditation,

            state: AppState::Normal,
            current_tab,
            selection: 0,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            submissions: Board::default(),
            logs: Board::default(),

            programs: Vec::new(),
            programs_loading: false,
            programs_error: None,
            progress: None,
            progress_loading: false,
            progress_error: None,
            application: None,

            action_in_flight: false,

            scope: ScreenScope::new(),
            result_rx: rx,
            result_tx: tx,

            status_message: None,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.context.is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.context.role()
    }

    /// Endpoint family the accreditation screen reads from.
    pub fn accreditation_source(&self) -> AccreditationSource {
        self.accreditation.source()
    }

    pub fn tabs(&self) -> &'static [Tab] {
        self.role().map(Tab::for_role).unwrap_or(&[])
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        if self.login_password.is_empty() && !self.login_username.is_empty() {
            if let Ok(password) = CredentialStore::get_password(&self.login_username) {
                self.login_password = password;
            }
        }
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.api.login(&username, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                let role = session_data.role;
                self.context.set(session_data.clone());
                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!(%role, "Login successful");
                self.enter_tab(Tab::for_role(role)[0]);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(ApiError::user_message(
                    &e,
                    "Invalid username or password",
                ));
                Err(e)
            }
        }
    }

    /// Forget the session on disk and in memory, then show the login overlay.
    pub fn logout(&mut self) {
        self.scope.cancel();
        self.context.clear();
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.reset_screens();
        self.status_message = None;
        self.login_error = None;
        info!("Logged out");
        self.start_login();
    }

    /// The server rejected our token: back to the login overlay.
    fn session_expired(&mut self, message: String) {
        warn!("Session rejected by server");
        self.scope.cancel();
        self.context.clear();
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.action_in_flight = false;
        self.application = None;
        self.start_login();
        self.login_error = Some(message);
    }

    // =========================================================================
    // Screens
    // =========================================================================

    fn reset_screens(&mut self) {
        self.submissions = Board::default();
        self.logs = Board::default();
        self.programs.clear();
        self.programs_error = None;
        self.programs_loading = false;
        self.progress = None;
        self.progress_error = None;
        self.progress_loading = false;
        self.application = None;
        self.action_in_flight = false;
        self.selection = 0;
    }

    /// Leave the current screen and open `tab` fresh.
    ///
    /// Work still running for the old screen is aborted and its results are
    /// ignored; the new screen starts collapsed and loads its data.
    pub fn enter_tab(&mut self, tab: Tab) {
        self.scope.cancel();
        self.reset_screens();
        self.current_tab = tab;
        self.load_current_tab();
    }

    /// Spawn `work` in the current screen scope and post its result back.
    fn spawn_screen<F>(&mut self, work: F)
    where
        F: Future<Output = ScreenResult> + Send + 'static,
    {
        let tx = self.result_tx.clone();
        let epoch = self.scope.epoch();
        self.scope.spawn(async move {
            let value = work.await;
            if tx.send(Scoped { epoch, value }).await.is_err() {
                debug!("Result channel closed");
            }
        });
    }

    /// Client carrying the current token, if there is one.
    fn authorized_api(&self) -> Option<ApiClient> {
        self.context.token().map(|t| self.api.with_token(t))
    }

    /// (Re)load the data shown on the current tab.
    pub fn load_current_tab(&mut self) {
        match self.current_tab {
            Tab::Submissions => {
                let ticket = self.submissions.begin_load();
                let dispatcher = self.decisions.clone();
                self.spawn_screen(async move {
                    let result = dispatcher.fetch().await;
                    ScreenResult::Submissions { ticket, result }
                });
            }
            Tab::Accreditation => {
                let ticket = self.logs.begin_load();
                let dispatcher = self.accreditation.clone();
                self.spawn_screen(async move {
                    let result = dispatcher.fetch().await;
                    ScreenResult::Logs { ticket, result }
                });
            }
            Tab::Dashboard => {
                self.progress_loading = true;
                self.progress_error = None;
                let Some(api) = self.authorized_api() else {
                    self.progress_loading = false;
                    self.session_expired("You must be logged in.".to_string());
                    return;
                };
                self.spawn_screen(async move {
                    ScreenResult::Progress(api.fetch_progress_summary().await)
                });
            }
            Tab::Programs => {
                self.programs_loading = true;
                self.programs_error = None;
                let api = self.authorized_api().unwrap_or_else(|| self.api.clone());
                self.spawn_screen(async move { ScreenResult::Programs(api.fetch_programs().await) });
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Rows of the review board on the current tab.
    pub fn rows(&self) -> Vec<Row> {
        match self.current_tab {
            Tab::Submissions => self.submissions.rows(),
            Tab::Accreditation => self.logs.rows(),
            _ => Vec::new(),
        }
    }

    fn row_count(&self) -> usize {
        match self.current_tab {
            Tab::Submissions | Tab::Accreditation => self.rows().len(),
            Tab::Programs => self.programs.len(),
            Tab::Dashboard => 0,
        }
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        if count > 0 {
            self.selection = (self.selection + 1).min(count - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.row_count().saturating_sub(1));
    }

    /// Expand or collapse the selected row.
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.rows().get(self.selection).copied() else {
            return;
        };
        match self.current_tab {
            Tab::Submissions => self.submissions.activate(row),
            Tab::Accreditation => self.logs.activate(row),
            _ => return,
        }
        // Keep the cursor on the toggled row as rows appear or vanish above it.
        if let Some(pos) = self.rows().iter().position(|r| *r == row) {
            self.selection = pos;
        }
        self.clamp_selection();
    }

    /// Collapse the open student, or the open program.
    pub fn collapse(&mut self) {
        let board_expansion = match self.current_tab {
            Tab::Submissions => &mut self.submissions.expansion,
            Tab::Accreditation => &mut self.logs.expansion,
            _ => return,
        };
        match board_expansion.expanded_student() {
            Some(student) => board_expansion.toggle_student(student),
            None => board_expansion.collapse(),
        }
        self.clamp_selection();
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Approve or reject the submission whose details are open.
    pub fn decide_expanded(&mut self, decision: Decision) {
        if self.action_in_flight {
            debug!("Decision ignored, another is in flight");
            return;
        }
        let Some((group, submission)) = self.submissions.expanded_member() else {
            self.status_message = Some("Open a student to decide on their application.".to_string());
            return;
        };
        let submission_id = submission.id;
        let student = submission.student_name().to_string();
        let program = group.program.name.clone();

        self.action_in_flight = true;
        self.status_message = Some(format!("Sending decision for {}...", student));
        let ticket = self.submissions.begin_action();
        let dispatcher = self.decisions.clone();
        self.spawn_screen(async move {
            let result = dispatcher.decide(submission_id, decision).await;
            ScreenResult::Decided {
                ticket,
                student,
                program,
                result,
            }
        });
    }

    /// Approve the service log whose details are open.
    pub fn approve_expanded(&mut self) {
        if self.action_in_flight {
            debug!("Approval ignored, another is in flight");
            return;
        }
        let Some((_, log)) = self.logs.expanded_member() else {
            self.status_message = Some("Open a service log to approve it.".to_string());
            return;
        };
        if log.is_approved() {
            self.status_message = Some("This service log is already approved.".to_string());
            return;
        }
        let log = log.clone();
        let label = log.label();

        self.action_in_flight = true;
        self.status_message = Some(format!("Approving {}...", label));
        let ticket = self.logs.begin_action();
        let dispatcher = self.accreditation.clone();
        self.spawn_screen(async move {
            let result = dispatcher.approve(&log).await;
            ScreenResult::Approved {
                ticket,
                label,
                result,
            }
        });
    }

    /// Open the application form for the selected program.
    pub fn open_application(&mut self) {
        let Some(program) = self.programs.get(self.selection) else {
            return;
        };
        if program.is_full() {
            self.status_message = Some(format!("{} has no slots left.", program.name));
            return;
        }
        self.application = Some(ApplicationForm::new(program));
        self.state = AppState::Applying;
    }

    pub fn close_application(&mut self) {
        self.application = None;
        self.state = AppState::Normal;
    }

    /// Send the open application form.
    pub fn submit_application(&mut self) {
        let Some(form) = self.application.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        let Some(api) = self.context.token().map(|t| self.api.with_token(t)) else {
            form.error = Some("Authentication token is missing. Please log in again.".to_string());
            return;
        };

        form.submitting = true;
        form.error = None;
        let request = form.request.clone();
        let program = form.program_name.clone();
        self.spawn_screen(async move {
            let result = api.submit_application(&request).await;
            ScreenResult::Applied { program, result }
        });
    }

    // =========================================================================
    // Background Results
    // =========================================================================

    /// Drain finished background work and apply it to the UI state.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(scoped) = self.result_rx.try_recv() {
            results.push(scoped);
        }

        for scoped in results {
            if let Some(result) = self.scope.accept(scoped) {
                self.process_result(result);
            }
        }
    }

    fn process_result(&mut self, result: ScreenResult) {
        match result {
            ScreenResult::Submissions {
                ticket,
                result: Ok(programs),
            } => {
                debug!(count = programs.len(), ticket, "Submissions loaded");
                if self.submissions.replace(ticket, programs) {
                    self.clamp_selection();
                }
            }
            ScreenResult::Submissions {
                ticket,
                result: Err(e),
            } => {
                let message = self.failure(&e, "Failed to load submissions.");
                self.submissions.fail(ticket, message);
            }
            ScreenResult::Decided {
                ticket,
                student,
                program,
                result,
            } => {
                self.action_in_flight = false;
                match result {
                    Ok(outcome) => {
                        self.status_message =
                            Some(decision_message(&student, &program, outcome.decision));
                        if self.submissions.replace(ticket, outcome.programs) {
                            self.clamp_selection();
                        }
                    }
                    Err(e) => {
                        let message = self.failure(&e, "Could not update submission status.");
                        self.status_message = Some(message);
                    }
                }
            }
            ScreenResult::Logs {
                ticket,
                result: Ok(programs),
            } => {
                debug!(count = programs.len(), ticket, "Service logs loaded");
                if self.logs.replace(ticket, programs) {
                    self.clamp_selection();
                }
            }
            ScreenResult::Logs {
                ticket,
                result: Err(e),
            } => {
                let message = self.failure(&e, "Failed to load service logs.");
                self.logs.fail(ticket, message);
            }
            ScreenResult::Approved {
                ticket,
                label,
                result,
            } => {
                self.action_in_flight = false;
                match result {
                    Ok(programs) => {
                        self.status_message = Some(format!("Approved service: {}", label));
                        if self.logs.replace(ticket, programs) {
                            self.clamp_selection();
                        }
                    }
                    Err(e) => {
                        let message = self.failure(&e, "Failed to approve service.");
                        self.status_message = Some(message);
                    }
                }
            }
            ScreenResult::Programs(Ok(programs)) => {
                self.programs = programs;
                self.programs_loading = false;
                self.clamp_selection();
            }
            ScreenResult::Programs(Err(e)) => {
                let message = self.failure(&e, "Failed to load programs.");
                self.programs_loading = false;
                self.programs_error = Some(message);
            }
            ScreenResult::Progress(Ok(summary)) => {
                self.progress = Some(summary);
                self.progress_loading = false;
            }
            ScreenResult::Progress(Err(e)) => {
                let message = self.failure(&e, "Could not load progress.");
                self.progress_loading = false;
                self.progress_error = Some(message);
            }
            ScreenResult::Applied { program, result } => match result {
                Ok(()) => {
                    info!(program = %program, "Application submitted");
                    self.close_application();
                    self.status_message = Some(format!("Application for {} submitted!", program));
                    self.load_current_tab();
                }
                Err(e) => {
                    error!(error = %e, "Application failed");
                    if ApiError::requires_login(&e) {
                        self.session_expired(ApiError::user_message(&e, "Please log in again."));
                        return;
                    }
                    if let Some(form) = self.application.as_mut() {
                        form.submitting = false;
                        form.error = Some(ApiError::application_message(&e));
                    }
                }
            },
        }
    }

    /// Log a failed operation and turn it into a user-facing message.
    /// A rejected token also sends the user back to the login overlay.
    fn failure(&mut self, err: &anyhow::Error, fallback: &str) -> String {
        error!(error = %err, "{}", fallback);
        let message = ApiError::user_message(err, fallback);
        if ApiError::requires_login(err) {
            self.session_expired(message.clone());
        }
        message
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if an application form character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

/// Endpoint family named in the accreditation screen title.
pub fn source_label(source: AccreditationSource) -> &'static str {
    match source {
        AccreditationSource::Logs => "logs",
        AccreditationSource::Accreditation => "accreditation",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use cstracker_core::models::ReviewStatus;
    use cstracker_core::review::group_submissions;

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Submissions.next(Role::Admin), Tab::Accreditation);
        assert_eq!(Tab::Accreditation.next(Role::Admin), Tab::Submissions); // Wraps around
        assert_eq!(Tab::Dashboard.next(Role::Student), Tab::Programs);
        assert_eq!(Tab::Programs.next(Role::Student), Tab::Dashboard);
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Submissions.prev(Role::Admin), Tab::Accreditation); // Wraps around
        assert_eq!(Tab::Dashboard.prev(Role::Student), Tab::Programs);
    }

    #[test]
    fn test_tab_outside_role_falls_back_to_first() {
        assert_eq!(Tab::Programs.next(Role::Admin), Tab::Submissions);
        assert_eq!(Tab::Accreditation.prev(Role::Student), Tab::Dashboard);
    }

    #[test]
    fn test_tabs_for_role() {
        assert_eq!(Tab::for_role(Role::Admin), &[Tab::Submissions, Tab::Accreditation]);
        assert_eq!(Tab::for_role(Role::Student), &[Tab::Dashboard, Tab::Programs]);
    }

    // -------------------------------------------------------------------------
    // Application Form Tests
    // -------------------------------------------------------------------------

    fn form() -> ApplicationForm {
        let program: Program =
            serde_json::from_str(r#"{"id": 10, "name": "Beach Cleanup"}"#).unwrap();
        ApplicationForm::new(&program)
    }

    #[test]
    fn test_application_form_fields() {
        let mut form = form();
        assert_eq!(form.request.program_id, 10);
        form.push_char('A');
        form.push_char('n');
        form.push_char('a');
        form.pop_char();
        assert_eq!(form.request.first_name, "An");

        form.next_field();
        form.push_char('R');
        assert_eq!(form.request.last_name, "R");
    }

    #[test]
    fn test_application_form_focus_wraps() {
        let mut form = form();
        form.prev_field();
        assert!(form.on_last_field());
        assert_eq!(form.focus, ApplicationRequest::FIELDS.len() - 1);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_application_form_rejects_control_chars() {
        let mut form = form();
        form.push_char('\n');
        form.push_char('\t');
        assert!(form.request.first_name.is_empty());
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(99, 'x'));
        assert!(!can_add_field_char(100, 'x'));
    }

    // -------------------------------------------------------------------------
    // Background Result Tests
    // -------------------------------------------------------------------------

    fn test_app(dir: &tempfile::TempDir) -> App {
        let config = Config::default();
        let session = Session::new(dir.path().to_path_buf());
        let api = ApiClient::from_config(&config).unwrap();
        let mut app = App::with_services(config, session, api);
        app.login_username.clear();
        app
    }

    fn grouped(status: &str) -> Vec<GroupedProgram> {
        let json = format!(
            r#"[{{"id": 7, "status": "{status}", "application": {{
                "student": {{"user": {{"full_name": "Juan Dela Cruz"}}}},
                "program": {{"id": 10, "name": "Beach Cleanup"}}}}}}]"#
        );
        group_submissions(serde_json::from_str(&json).unwrap())
    }

    fn program_logs(status: &str) -> Vec<ProgramLogs> {
        let json = format!(
            r#"[{{"id": 4, "name": "Tree Planting", "applicants": [
                {{"id": 40, "program": "Tree Planting", "status": "{status}"}}]}}]"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn post_at(app: &mut App, epoch: u64, value: ScreenResult) {
        assert!(app.result_tx.try_send(Scoped { epoch, value }).is_ok());
    }

    fn post(app: &mut App, value: ScreenResult) {
        let epoch = app.scope.epoch();
        post_at(app, epoch, value);
    }

    fn submission_status(app: &App) -> ReviewStatus {
        app.submissions.programs[0].submissions[0].status.clone()
    }

    fn server_error() -> anyhow::Error {
        anyhow::Error::new(ApiError::ServerError("boom".into()))
    }

    #[test]
    fn test_accreditation_source_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        assert_eq!(app.accreditation_source(), AccreditationSource::Logs);

        let config = Config {
            accreditation_source: AccreditationSource::Accreditation,
            ..Config::default()
        };
        let session = Session::new(dir.path().to_path_buf());
        let api = ApiClient::from_config(&config).unwrap();
        let app = App::with_services(config, session, api);
        assert_eq!(app.accreditation_source(), AccreditationSource::Accreditation);
        assert_eq!(source_label(app.accreditation_source()), "accreditation");
    }

    #[test]
    fn test_decision_list_survives_older_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.current_tab = Tab::Submissions;

        let fetch = app.submissions.begin_load();
        let decision = app.submissions.begin_action();
        app.action_in_flight = true;

        post(
            &mut app,
            ScreenResult::Decided {
                ticket: decision,
                student: "Juan Dela Cruz".into(),
                program: "Beach Cleanup".into(),
                result: Ok(DecisionOutcome {
                    submission_id: 7,
                    decision: Decision::Approved,
                    programs: grouped("approved"),
                }),
            },
        );
        post(
            &mut app,
            ScreenResult::Submissions {
                ticket: fetch,
                result: Ok(grouped("pending")),
            },
        );
        app.check_background_tasks();

        assert_eq!(submission_status(&app), ReviewStatus::Approved);
        assert!(!app.action_in_flight);
        assert!(!app.submissions.loading);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Juan Dela Cruz's application for Beach Cleanup has been approved.")
        );
    }

    #[test]
    fn test_failed_decision_keeps_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.current_tab = Tab::Submissions;
        let ticket = app.submissions.begin_load();
        app.submissions.replace(ticket, grouped("pending"));

        let decision = app.submissions.begin_action();
        app.action_in_flight = true;
        post(
            &mut app,
            ScreenResult::Decided {
                ticket: decision,
                student: "Juan Dela Cruz".into(),
                program: "Beach Cleanup".into(),
                result: Err(server_error()),
            },
        );
        app.check_background_tasks();

        assert_eq!(app.submissions.programs.len(), 1);
        assert_eq!(submission_status(&app), ReviewStatus::Pending);
        assert!(app.submissions.error.is_none());
        assert!(!app.action_in_flight);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Could not update submission status.")
        );
    }

    #[test]
    fn test_failed_approval_keeps_logs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.current_tab = Tab::Accreditation;
        let ticket = app.logs.begin_load();
        app.logs.replace(ticket, program_logs("pending"));

        let approval = app.logs.begin_action();
        app.action_in_flight = true;
        post(
            &mut app,
            ScreenResult::Approved {
                ticket: approval,
                label: "Tree Planting (Pending)".into(),
                result: Err(server_error()),
            },
        );
        app.check_background_tasks();

        assert_eq!(app.logs.programs, program_logs("pending"));
        assert!(!app.action_in_flight);
        assert_eq!(app.status_message.as_deref(), Some("Failed to approve service."));
    }

    #[tokio::test]
    async fn test_result_from_left_screen_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.current_tab = Tab::Submissions;
        let ticket = app.submissions.begin_load();
        let old_epoch = app.scope.epoch();

        app.enter_tab(Tab::Submissions);
        assert_ne!(app.scope.epoch(), old_epoch);

        post_at(
            &mut app,
            old_epoch,
            ScreenResult::Submissions {
                ticket,
                result: Ok(grouped("pending")),
            },
        );
        app.check_background_tasks();

        assert!(app.submissions.programs.is_empty());
    }
}
