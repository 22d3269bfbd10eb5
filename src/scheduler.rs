use crate::domain::{format_local_timestamp, ItemId, ListItem, Reminder};
use crate::notifications::{Notification, Permission};
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// How long before a reminder's time its notification fires
pub const REMINDER_LEAD_MINUTES: i64 = 60;

/// Title of every reminder notification
pub const NOTIFICATION_TITLE: &str = "Reminder";

/// A pending one-shot alarm derived from a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderAlarm {
    pub reminder_id: ItemId,
    pub text: String,
    /// The reminder's own time
    pub due: NaiveDateTime,
    /// When the notification goes out (`due` minus the lead)
    pub fire_at: NaiveDateTime,
    /// Delay from arming until `fire_at`
    pub delay: Duration,
}

impl ReminderAlarm {
    pub fn notification(&self) -> Notification {
        Notification {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("{} at {}", self.text, format_local_timestamp(self.due)),
        }
    }
}

/// Owns the pending alarms, at most one per reminder id.
///
/// Every change to the reminder collection cancels everything and re-arms
/// from scratch, so an edited or removed reminder can never fire a stale alarm.
/// Alarms already due when a rebuild happens are held back and handed out by
/// the next `poll`, so a rebuild between ticks cannot swallow them.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    alarms: BTreeMap<ItemId, ReminderAlarm>,
    overdue: Vec<ReminderAlarm>,
    lead: Duration,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self {
            alarms: BTreeMap::new(),
            overdue: Vec::new(),
            lead: Duration::minutes(REMINDER_LEAD_MINUTES),
        }
    }

    /// Drop every pending alarm
    pub fn cancel_all(&mut self) {
        if !self.alarms.is_empty() {
            debug!(count = self.alarms.len(), "cancelled pending alarms");
        }
        self.alarms.clear();
    }

    /// Rebuild all alarms from `reminders`. Returns how many were armed.
    ///
    /// Nothing is armed unless `permission` is granted. Reminders whose
    /// notification time is not strictly after `now` are skipped; they never
    /// fire retroactively.
    pub fn rearm<'a, I>(&mut self, reminders: I, permission: Permission, now: NaiveDateTime) -> usize
    where
        I: IntoIterator<Item = &'a ListItem<Reminder>>,
    {
        self.retire_due(now);
        self.cancel_all();

        if !permission.is_granted() {
            debug!(?permission, "notifications not granted, scheduler inert");
            return 0;
        }

        for item in reminders {
            let fire_at = item.payload.time - self.lead;
            if fire_at <= now {
                continue;
            }

            let alarm = ReminderAlarm {
                reminder_id: item.id,
                text: item.payload.text.clone(),
                due: item.payload.time,
                fire_at,
                delay: fire_at - now,
            };
            debug!(
                id = %item.id,
                fire_at = %fire_at,
                delay_ms = alarm.delay.num_milliseconds(),
                "armed reminder alarm"
            );
            self.alarms.insert(item.id, alarm);
        }

        self.alarms.len()
    }

    /// Move alarms that are due at `now` out of the pending map
    fn retire_due(&mut self, now: NaiveDateTime) {
        let overdue = &mut self.overdue;
        self.alarms.retain(|_, alarm| {
            if alarm.fire_at <= now {
                overdue.push(alarm.clone());
                false
            } else {
                true
            }
        });
    }

    /// Fire every alarm that is due at `now`, oldest first. Each alarm fires
    /// once and is discarded.
    pub fn poll(&mut self, now: NaiveDateTime) -> Vec<Notification> {
        self.retire_due(now);
        let mut due = std::mem::take(&mut self.overdue);
        due.sort_by_key(|alarm| (alarm.fire_at, alarm.reminder_id));

        due.iter()
            .map(|alarm| {
                info!(id = %alarm.reminder_id, "reminder alarm fired");
                alarm.notification()
            })
            .collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ReminderAlarm> {
        self.alarms.values()
    }

    pub fn pending_count(&self) -> usize {
        self.alarms.len()
    }

    pub fn alarm_for(&self, id: ItemId) -> Option<&ReminderAlarm> {
        self.alarms.get(&id)
    }

    /// Earliest pending fire time
    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.alarms.values().map(|alarm| alarm.fire_at).min()
    }
}
