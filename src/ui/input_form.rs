use crate::app::AppState;
use crate::form::{FormField, FormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the add form for the section it was opened on
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.form {
        let modal_area = create_modal_area(area, 14);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title = format!(" {} ", form.submit_label());
        let paragraph = Paragraph::new(form_lines(form))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn field_lines<'a>(label: &str, value: &'a str, editing: bool) -> [Line<'a>; 2] {
    let label = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };
    [
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value, modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]),
    ]
}

fn form_lines(form: &FormState) -> Vec<Line<'_>> {
    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines(
        form.text_label(),
        &form.text,
        form.editing_field == FormField::Text,
    ));
    lines.push(Line::raw(""));
    lines.extend(field_lines(
        form.when_label(),
        &form.when,
        form.editing_field == FormField::When,
    ));
    lines.push(Line::raw(""));

    if let Some(error) = &form.error {
        lines.push(Line::styled(error.as_str(), error_style()));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;
    use crate::form::ValidationError;

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_form_lines_show_error() {
        let mut form = FormState::new(Section::Reminders);
        form.set_error(&ValidationError::ReminderFieldsRequired);

        let text = text_of(&form_lines(&form));
        assert!(text.contains(&"Reminder: (editing)".to_string()));
        assert!(text.contains(&"Time (YYYY-MM-DD HH:MM):".to_string()));
        assert!(text.contains(&"Reminder and time are required.".to_string()));
    }

    #[test]
    fn test_form_lines_cursor_follows_field() {
        let mut form = FormState::new(Section::Tasks);
        form.switch_field();

        let text = text_of(&form_lines(&form));
        assert!(text.contains(&"New task:".to_string()));
        assert!(text.contains(&"> █".to_string()));
    }
}
