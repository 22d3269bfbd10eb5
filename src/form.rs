use crate::domain::{parse_date, parse_local_datetime, Goal, Payload, Reminder, Section, Task};
use thiserror::Error;

/// Why a submission was rejected. The `Display` text is shown inline under the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task name is required.")]
    TaskNameRequired,
    #[error("Reminder and time are required.")]
    ReminderFieldsRequired,
    #[error("Goal name is required.")]
    GoalNameRequired,
    #[error("Due date must be YYYY-MM-DD.")]
    InvalidDate,
    #[error("Time must be YYYY-MM-DD HH:MM.")]
    InvalidTime,
    #[error("This list has run out of ids.")]
    IdsExhausted,
}

/// Uncommitted form input that validates into a payload
pub trait Draft {
    type Output: Payload;

    fn validate(&self) -> Result<Self::Output, ValidationError>;
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional_date(raw: &str) -> Result<Option<chrono::NaiveDate>, ValidationError> {
    if is_blank(raw) {
        return Ok(None);
    }
    parse_date(raw).map(Some).ok_or(ValidationError::InvalidDate)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub due: String,
}

impl Draft for TaskDraft {
    type Output = Task;

    fn validate(&self) -> Result<Task, ValidationError> {
        if is_blank(&self.text) {
            return Err(ValidationError::TaskNameRequired);
        }
        Ok(Task::new(self.text.clone(), optional_date(&self.due)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderDraft {
    pub text: String,
    pub time: String,
}

impl Draft for ReminderDraft {
    type Output = Reminder;

    fn validate(&self) -> Result<Reminder, ValidationError> {
        if is_blank(&self.text) || is_blank(&self.time) {
            return Err(ValidationError::ReminderFieldsRequired);
        }
        let time = parse_local_datetime(&self.time).ok_or(ValidationError::InvalidTime)?;
        Ok(Reminder::new(self.text.clone(), time))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalDraft {
    pub name: String,
    pub due: String,
}

impl Draft for GoalDraft {
    type Output = Goal;

    fn validate(&self) -> Result<Goal, ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::GoalNameRequired);
        }
        Ok(Goal::new(self.name.clone(), optional_date(&self.due)?))
    }
}

/// Which field of the add form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    When,
}

/// Input state of the add form for one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub section: Section,
    pub text: String,
    /// Due date (tasks, goals) or time (reminders), as typed
    pub when: String,
    pub editing_field: FormField,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            text: String::new(),
            when: String::new(),
            editing_field: FormField::Text,
            error: None,
        }
    }

    pub fn text_label(&self) -> &'static str {
        match self.section {
            Section::Tasks => "New task",
            Section::Reminders => "Reminder",
            Section::Goals => "New goal",
        }
    }

    pub fn when_label(&self) -> &'static str {
        match self.section {
            Section::Reminders => "Time (YYYY-MM-DD HH:MM)",
            Section::Tasks | Section::Goals => "Due date (YYYY-MM-DD, optional)",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.section {
            Section::Tasks => "Add Task",
            Section::Reminders => "Add Reminder",
            Section::Goals => "Add Goal",
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.editing_field {
            FormField::Text => &mut self.text,
            FormField::When => &mut self.when,
        }
    }

    /// Type a character into the focused field; any edit clears the error
    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
        self.error = None;
    }

    pub fn switch_field(&mut self) {
        self.editing_field = match self.editing_field {
            FormField::Text => FormField::When,
            FormField::When => FormField::Text,
        };
    }

    /// Reset the fields after a successful add
    pub fn clear(&mut self) {
        self.text.clear();
        self.when.clear();
        self.editing_field = FormField::Text;
        self.error = None;
    }

    pub fn set_error(&mut self, error: &ValidationError) {
        self.error = Some(error.to_string());
    }

    pub fn task_draft(&self) -> TaskDraft {
        TaskDraft {
            text: self.text.clone(),
            due: self.when.clone(),
        }
    }

    pub fn reminder_draft(&self) -> ReminderDraft {
        ReminderDraft {
            text: self.text.clone(),
            time: self.when.clone(),
        }
    }

    pub fn goal_draft(&self) -> GoalDraft {
        GoalDraft {
            name: self.text.clone(),
            due: self.when.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_task_requires_name() {
        let draft = TaskDraft::default();
        assert_eq!(draft.validate(), Err(ValidationError::TaskNameRequired));
        assert_eq!(
            ValidationError::TaskNameRequired.to_string(),
            "Task name is required."
        );

        let draft = TaskDraft {
            text: "   \t".to_string(),
            due: "2025-07-22".to_string(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::TaskNameRequired));
    }

    #[test]
    fn test_task_due_is_optional() {
        let draft = TaskDraft {
            text: "Buy milk".to_string(),
            due: String::new(),
        };
        let task = draft.validate().unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.due, None);
        assert!(!task.done);
    }

    #[test]
    fn test_task_rejects_bad_date() {
        let draft = TaskDraft {
            text: "Buy milk".to_string(),
            due: "next week".to_string(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn test_reminder_requires_text_and_time() {
        let missing_time = ReminderDraft {
            text: "Call mom".to_string(),
            time: String::new(),
        };
        assert_eq!(missing_time.validate(), Err(ValidationError::ReminderFieldsRequired));

        let missing_text = ReminderDraft {
            text: " ".to_string(),
            time: "2025-07-21T10:00".to_string(),
        };
        assert_eq!(missing_text.validate(), Err(ValidationError::ReminderFieldsRequired));

        let bad_time = ReminderDraft {
            text: "Call mom".to_string(),
            time: "soon".to_string(),
        };
        assert_eq!(bad_time.validate(), Err(ValidationError::InvalidTime));
    }

    #[test]
    fn test_goal_starts_at_zero_progress() {
        let draft = GoalDraft {
            name: "Read 12 books".to_string(),
            due: "2025-12-31".to_string(),
        };
        let goal = draft.validate().unwrap();
        assert_eq!(goal.progress, 0);
        assert_eq!(goal.due, NaiveDate::from_ymd_opt(2025, 12, 31));
        assert_eq!(GoalDraft::default().validate(), Err(ValidationError::GoalNameRequired));
    }

    #[test]
    fn test_form_edit_clears_error() {
        let mut form = FormState::new(Section::Tasks);
        form.set_error(&ValidationError::TaskNameRequired);
        assert_eq!(form.error.as_deref(), Some("Task name is required."));

        form.push_char('a');
        assert_eq!(form.error, None);
        assert_eq!(form.text, "a");
    }

    #[test]
    fn test_form_switch_field_routes_input() {
        let mut form = FormState::new(Section::Reminders);
        form.push_char('x');
        form.switch_field();
        form.push_char('2');
        form.backspace();
        form.push_char('1');
        assert_eq!(form.text, "x");
        assert_eq!(form.when, "1");

        form.clear();
        assert_eq!(form, FormState::new(Section::Reminders));
    }
}
