//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use cstracker_core::models::Decision;

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, LoginFocus, Tab,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle application form
    if matches!(app.state, AppState::Applying) {
        handle_application_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            if let Some(&tab) = app.tabs().get(index) {
                if tab != app.current_tab {
                    app.enter_tab(tab);
                }
            }
        }
        KeyCode::Left => {
            if let Some(role) = app.role() {
                app.enter_tab(app.current_tab.prev(role));
            }
        }
        KeyCode::Right => {
            if let Some(role) = app.role() {
                app.enter_tab(app.current_tab.next(role));
            }
        }
        KeyCode::Char('u') => {
            app.load_current_tab();
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::Esc => {
            app.collapse();
        }
        _ => {
            // Tab-specific input
            match app.current_tab {
                Tab::Submissions => handle_submissions_input(app, key),
                Tab::Accreditation => handle_accreditation_input(app, key),
                Tab::Programs => handle_programs_input(app, key),
                Tab::Dashboard => {}
            }
        }
    }

    Ok(false)
}

fn handle_submissions_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('a') => app.decide_expanded(Decision::Approved),
        KeyCode::Char('r') => app.decide_expanded(Decision::Rejected),
        _ => {}
    }
}

fn handle_accreditation_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('a') => app.approve_expanded(),
        _ => {}
    }
}

fn handle_programs_input(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter) {
        app.open_application();
    }
}

fn handle_application_input(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc) {
        app.close_application();
        return;
    }

    let Some(form) = app.application.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    if form.submitting {
        // Wait for the server before accepting more edits
        return;
    }

    match key.code {
        KeyCode::Down | KeyCode::Tab => form.next_field(),
        KeyCode::Up | KeyCode::BackTab => form.prev_field(),
        KeyCode::Enter => {
            if form.on_last_field() {
                app.submit_application();
            } else {
                form.next_field();
            }
        }
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.login_focus = LoginFocus::Button,
            LoginFocus::Button => {
                // On failure login_error is set and the overlay stays up
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}
