use crate::app::{AppState, PROGRESS_STEP};
use crate::domain::UiMode;
use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: NaiveDateTime) -> bool {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key, now),
        UiMode::AddingItem => handle_input_form_mode(app, key, now),
        UiMode::PermissionPrompt => handle_permission_mode(app, key, now),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent, now: NaiveDateTime) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,

        // Section focus
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.focus_prev(),

        // Row selection
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add(),

        // Tasks: toggle done
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),

        // Goals: nudge progress
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_progress(PROGRESS_STEP),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_progress(-PROGRESS_STEP),

        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('x') | KeyCode::Delete => {
            app.remove_selected(now)
        }

        _ => {}
    }
    false
}

/// Handle keys while the add form is open
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent, now: NaiveDateTime) -> bool {
    match key.code {
        KeyCode::Enter => {
            app.submit_form(now);
        }
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(form) = app.form.as_mut() {
                form.switch_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                form.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
    false
}

/// Handle the notification permission prompt
fn handle_permission_mode(app: &mut AppState, key: KeyEvent, now: NaiveDateTime) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_permission(true, now),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_permission(false, now),
        _ => {}
    }
    false
}
