use crate::domain::{Goal, ItemId, Reminder, Section, Task, UiMode};
use crate::form::FormState;
use crate::lifecycle::ListController;
use crate::notifications::{effective_permission, Notification, Notifier, Permission};
use crate::persistence::{save_settings, KeyValueStore, ListStore, Settings};
use crate::scheduler::ReminderScheduler;
use crate::ticker::{toast_duration, transition_duration};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tracing::{info, warn};

/// How much one keypress moves a goal's progress
pub const PROGRESS_STEP: i64 = 10;

/// A fired notification mirrored into the status line
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

/// Main application state
pub struct AppState {
    pub tasks: ListController<Task>,
    pub reminders: ListController<Reminder>,
    pub goals: ListController<Goal>,
    pub scheduler: ReminderScheduler,
    pub notifier: Box<dyn Notifier>,
    pub permission: Permission,
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
    pub focused: Section,
    /// Selected row per section: tasks, reminders, goals
    pub selected: [usize; 3],
    pub ui_mode: UiMode,
    pub form: Option<FormState>,
    pub toasts: Vec<Toast>,
}

fn section_slot(section: Section) -> usize {
    match section {
        Section::Tasks => 0,
        Section::Reminders => 1,
        Section::Goals => 2,
    }
}

impl AppState {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        settings: Settings,
        settings_path: Option<PathBuf>,
        notifier: Box<dyn Notifier>,
        now: NaiveDateTime,
    ) -> Self {
        let permission = effective_permission(settings.notification_permission, notifier.as_ref());
        let ui_mode = if permission == Permission::Default {
            UiMode::PermissionPrompt
        } else {
            UiMode::Normal
        };
        info!(?permission, "starting");

        let mut app = Self {
            tasks: ListController::load(ListStore::new(store.clone(), Section::Tasks.key())),
            reminders: ListController::load(ListStore::new(store.clone(), Section::Reminders.key())),
            goals: ListController::load(ListStore::new(store, Section::Goals.key())),
            scheduler: ReminderScheduler::new(),
            notifier,
            permission,
            settings,
            settings_path,
            focused: Section::Tasks,
            selected: [0; 3],
            ui_mode,
            form: None,
            toasts: Vec::new(),
        };
        app.rearm_reminders(now);
        app
    }

    /// Rebuild every reminder alarm from the live reminders
    pub fn rearm_reminders(&mut self, now: NaiveDateTime) {
        self.scheduler
            .rearm(self.reminders.live_items(), self.permission, now);
    }

    /// Record the answer to the notification permission prompt
    pub fn answer_permission(&mut self, granted: bool, now: NaiveDateTime) {
        self.permission = if granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        self.settings.notification_permission = self.permission;
        self.save_settings();
        self.ui_mode = UiMode::Normal;
        info!(permission = ?self.permission, "notification permission answered");
        self.rearm_reminders(now);
    }

    fn save_settings(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(e) = save_settings(path, &self.settings) {
                warn!(error = %e, "failed to save settings");
            }
        }
    }

    /// Number of rows in a section, including rows that are leaving
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Tasks => self.tasks.len(),
            Section::Reminders => self.reminders.len(),
            Section::Goals => self.goals.len(),
        }
    }

    pub fn selected_index(&self, section: Section) -> usize {
        self.selected[section_slot(section)]
    }

    /// Id of the selected row in a section
    pub fn selected_id(&self, section: Section) -> Option<ItemId> {
        let index = self.selected_index(section);
        match section {
            Section::Tasks => self.tasks.items().get(index).map(|i| i.id),
            Section::Reminders => self.reminders.items().get(index).map(|i| i.id),
            Section::Goals => self.goals.items().get(index).map(|i| i.id),
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    pub fn move_selection_up(&mut self) {
        let slot = section_slot(self.focused);
        self.selected[slot] = self.selected[slot].saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let slot = section_slot(self.focused);
        if self.selected[slot] + 1 < self.section_len(self.focused) {
            self.selected[slot] += 1;
        }
    }

    fn clamp_selections(&mut self) {
        for section in Section::all() {
            let len = self.section_len(*section);
            let slot = section_slot(*section);
            self.selected[slot] = self.selected[slot].min(len.saturating_sub(1));
        }
    }

    /// Open the add form for the focused section
    pub fn start_add(&mut self) {
        self.form = Some(FormState::new(self.focused));
        self.ui_mode = UiMode::AddingItem;
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Submit the open form. On a validation error the form stays open with
    /// the message; on success the item is added and the form closes.
    pub fn submit_form(&mut self, now: NaiveDateTime) -> Option<ItemId> {
        let form = self.form.as_mut()?;

        let result = match form.section {
            Section::Tasks => self.tasks.add(&form.task_draft()),
            Section::Reminders => self.reminders.add(&form.reminder_draft()),
            Section::Goals => self.goals.add(&form.goal_draft()),
        };

        match result {
            Ok(id) => {
                let section = form.section;
                form.clear();
                self.form = None;
                self.ui_mode = UiMode::Normal;
                self.focused = section;
                self.selected[section_slot(section)] = self.section_len(section).saturating_sub(1);
                if section == Section::Reminders {
                    self.rearm_reminders(now);
                }
                Some(id)
            }
            Err(e) => {
                form.set_error(&e);
                None
            }
        }
    }

    /// Toggle the done flag of the selected task
    pub fn toggle_selected(&mut self) {
        if self.focused != Section::Tasks {
            return;
        }
        if let Some(id) = self.selected_id(Section::Tasks) {
            self.tasks.toggle(id);
        }
    }

    /// Nudge the selected goal's progress by `delta`
    pub fn adjust_progress(&mut self, delta: i64) {
        if self.focused != Section::Goals {
            return;
        }
        if let Some(id) = self.selected_id(Section::Goals) {
            let current = self
                .goals
                .get(id)
                .map(|goal| goal.payload.progress as i64)
                .unwrap_or_default();
            self.goals.set_progress(id, current + delta);
        }
    }

    /// Start removing the selected row of the focused section
    pub fn remove_selected(&mut self, now: NaiveDateTime) {
        let Some(id) = self.selected_id(self.focused) else {
            return;
        };
        match self.focused {
            Section::Tasks => {
                self.tasks.remove(id);
            }
            Section::Reminders => {
                if self.reminders.remove(id) {
                    self.rearm_reminders(now);
                }
            }
            Section::Goals => {
                self.goals.remove(id);
            }
        }
    }

    /// Advance time: finish row transitions, fire due alarms, expire toasts
    pub fn tick(&mut self, now: Instant, wall: NaiveDateTime) {
        let duration = transition_duration();
        self.tasks.finish_due_transitions(now, duration);
        self.goals.finish_due_transitions(now, duration);
        if self.reminders.finish_due_transitions(now, duration) {
            self.rearm_reminders(wall);
        }
        self.clamp_selections();

        for notification in self.scheduler.poll(wall) {
            self.deliver(notification, now);
        }

        let ttl = toast_duration();
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
    }

    fn deliver(&mut self, notification: Notification, now: Instant) {
        self.notifier.show(&notification);
        self.toasts.push(Toast {
            message: format!("{}: {}", notification.title, notification.body),
            shown_at: now,
        });
    }
}
