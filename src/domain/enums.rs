use serde::{Deserialize, Serialize};

/// One of the three lists shown side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Tasks,
    Reminders,
    Goals,
}

impl Section {
    /// Storage key the section's collection is persisted under
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Reminders => "reminders",
            Self::Goals => "goals",
        }
    }

    /// Pane title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Tasks => "To Do List",
            Self::Reminders => "Reminders",
            Self::Goals => "Goal Tracker",
        }
    }

    /// Parse a section from a CLI argument or storage key
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "tasks" | "task" | "todo" => Some(Self::Tasks),
            "reminders" | "reminder" => Some(Self::Reminders),
            "goals" | "goal" => Some(Self::Goals),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Tasks => Self::Reminders,
            Self::Reminders => Self::Goals,
            Self::Goals => Self::Tasks,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Tasks => Self::Goals,
            Self::Reminders => Self::Tasks,
            Self::Goals => Self::Reminders,
        }
    }

    pub fn all() -> &'static [Section] {
        &[Section::Tasks, Section::Reminders, Section::Goals]
    }
}

/// Presentational transition tag for a list row (never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Just added, fading in
    Entering,
    /// Delete requested, fading out until the row is reaped
    Leaving,
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingItem,
    PermissionPrompt,
}
