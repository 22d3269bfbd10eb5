use crate::app::AppState;
use crate::domain::format_local_timestamp;
use crate::notifications::Permission;
use crate::ui::styles::{hint_style, toast_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ←/→ section   "),
        Span::raw("↑/↓ select   "),
        Span::raw("a add   "),
        Span::raw("space done   "),
        Span::raw("+ / - progress   "),
        Span::raw("d delete   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the bottom status line: latest fired reminder, else alarm status
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(toast) = app.toasts.last() {
        let paragraph = Paragraph::new(format!(" {} ", toast.message)).style(toast_style());
        f.render_widget(paragraph, area);
        return;
    }

    let paragraph = Paragraph::new(status_text(app)).style(hint_style());
    f.render_widget(paragraph, area);
}

fn status_text(app: &AppState) -> String {
    match app.permission {
        Permission::Granted => match app.scheduler.next_fire_at() {
            Some(next) => format!(
                " {} alarm(s) pending, next at {}",
                app.scheduler.pending_count(),
                format_local_timestamp(next)
            ),
            None => " No alarms pending".to_string(),
        },
        Permission::Denied => " Notifications are off".to_string(),
        Permission::Default => " Notifications not set up yet".to_string(),
        Permission::Unsupported => " Notifications unavailable on this system".to_string(),
    }
}
