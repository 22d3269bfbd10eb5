use crate::app::AppState;
use crate::domain::UiMode;
use crate::scheduler::REMINDER_LEAD_MINUTES;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the one-time notification permission prompt
pub fn render_permission_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::PermissionPrompt {
        return;
    }

    let modal_area = create_modal_area(area, 11);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw("  Allow desktop notifications for reminders?"),
        Line::raw(""),
        Line::raw(format!(
            "  You will be alerted {} minutes before each reminder.",
            REMINDER_LEAD_MINUTES
        )),
        Line::raw("  Alarms only fire while planboard is running."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Allow  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Don't allow"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" 🔔 Notifications ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
