pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::{Section, UiMode};
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_permission_modal;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);

    render_list_pane(f, app, Section::Tasks, layout.tasks_area);
    render_list_pane(f, app, Section::Reminders, layout.reminders_area);
    render_list_pane(f, app, Section::Goals, layout.goals_area);

    render_status_line(f, app, layout.status_area);

    // Permission prompt takes precedence
    if app.ui_mode == UiMode::PermissionPrompt {
        render_permission_modal(f, app, size);
        return;
    }

    if app.form.is_some() {
        render_input_form(f, app, size);
    }
}
