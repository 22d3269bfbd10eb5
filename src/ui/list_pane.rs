use crate::app::AppState;
use crate::domain::{
    checkbox, format_due_date, format_local_timestamp, progress_bar, transition_ratio, Goal, ItemId,
    Payload, Reminder, Section, Task, Transition,
};
use crate::lifecycle::ListController;
use crate::scheduler::ReminderAlarm;
use crate::ticker::TRANSITION_MS;
use crate::ui::styles::{
    border_style, default_style, done_style, entering_style, focused_border_style, gauge_style,
    leaving_style, meta_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use std::time::Instant;

const GAUGE_WIDTH: usize = 20;

/// Render one section's list
pub fn render_list_pane(f: &mut Frame, app: &AppState, section: Section, area: Rect) {
    let now = Instant::now();
    let use_emoji = app.settings.use_emoji;

    let rows: Vec<(ItemId, Vec<Line<'static>>)> = match section {
        Section::Tasks => app
            .tasks
            .items()
            .iter()
            .map(|item| (item.id, task_lines(&item.payload)))
            .collect(),
        Section::Reminders => app
            .reminders
            .items()
            .iter()
            .map(|item| {
                let alarm = app.scheduler.alarm_for(item.id);
                (item.id, reminder_lines(&item.payload, alarm, use_emoji))
            })
            .collect(),
        Section::Goals => app
            .goals
            .items()
            .iter()
            .map(|item| (item.id, goal_lines(&item.payload)))
            .collect(),
    };

    let focused = app.focused == section;
    let selected = app.selected_index(section);

    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, (id, lines))| {
            let (transition, ratio) = match section {
                Section::Tasks => transition_progress(&app.tasks, id, now),
                Section::Reminders => transition_progress(&app.reminders, id, now),
                Section::Goals => transition_progress(&app.goals, id, now),
            };
            let style = row_style(focused && idx == selected, transition, ratio);
            ListItem::new(lines).style(style)
        })
        .collect();

    let empty = items.is_empty();
    let title = format!(" {} ({}) ", section.title(), app.section_len(section));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border_style()
        } else {
            border_style()
        })
        .title(Span::styled(title, title_style()));

    if empty {
        let hint = List::new(vec![ListItem::new(Line::styled(
            "Nothing here yet. Press a to add.",
            meta_style(),
        ))])
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let mut state = ListState::default();
    if focused {
        state.select(Some(selected));
    }
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn transition_progress<P: Payload>(
    controller: &ListController<P>,
    id: ItemId,
    now: Instant,
) -> (Option<Transition>, f64) {
    let transition = controller.transition_of(id);
    let elapsed = controller
        .overlay()
        .started_at(id)
        .map(|started| now.saturating_duration_since(started).as_millis())
        .unwrap_or_default();
    (transition, transition_ratio(transition, elapsed, TRANSITION_MS as u128))
}

fn row_style(selected: bool, transition: Option<Transition>, ratio: f64) -> Style {
    match transition {
        Some(Transition::Leaving) => leaving_style(ratio),
        _ if selected => selected_style(),
        Some(Transition::Entering) if ratio < 1.0 => entering_style(ratio),
        _ => default_style(),
    }
}

/// Lines for a task row
/// Format: [x] Finish homework
///             Due: 2025-07-22
fn task_lines(task: &Task) -> Vec<Line<'static>> {
    let text_style = if task.done { done_style() } else { Style::default() };
    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", checkbox(task.done))),
        Span::styled(task.text.clone(), text_style),
    ])];
    if let Some(due) = task.due {
        lines.push(Line::styled(format!("    Due: {}", format_due_date(due)), meta_style()));
    }
    lines
}

/// Lines for a reminder row, marking whether its alarm is armed
fn reminder_lines(reminder: &Reminder, alarm: Option<&ReminderAlarm>, use_emoji: bool) -> Vec<Line<'static>> {
    let clock = if use_emoji { "🕒" } else { "@" };
    let armed = match (alarm, use_emoji) {
        (Some(_), true) => " 🔔",
        (Some(_), false) => " (alarm set)",
        (None, _) => "",
    };
    vec![
        Line::raw(reminder.text.clone()),
        Line::from(vec![
            Span::styled(
                format!("  {} {}", clock, format_local_timestamp(reminder.time)),
                meta_style(),
            ),
            Span::raw(armed),
        ]),
    ]
}

/// Lines for a goal row with its progress gauge
fn goal_lines(goal: &Goal) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw(goal.name.clone())];
    if let Some(due) = goal.due {
        lines.push(Line::styled(format!("  Due: {}", format_due_date(due)), meta_style()));
    }
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(progress_bar(goal.progress, GAUGE_WIDTH), gauge_style()),
        Span::raw(format!(" {:>3}%", goal.progress)),
    ]));
    lines
}
