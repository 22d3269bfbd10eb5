use super::enums::Section;
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Highest value a goal's progress can hold
pub const MAX_PROGRESS: u8 = 100;

/// Stable identifier of a list row, unique within its collection
///
/// Persisted as a decimal string (`"3"`), but numeric ids written by hand are
/// accepted too. Stored ids above `ItemId::MAX` are rejected, which leaves the
/// counter room to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Largest id accepted from storage
    pub const MAX: u64 = u64::MAX / 2;

    pub fn next(&self) -> Option<ItemId> {
        self.0.checked_add(1).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Number(n) => n,
            RawId::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid item id: {:?}", s)))?,
        };
        if id > ItemId::MAX {
            return Err(serde::de::Error::custom(format!("item id out of range: {}", id)));
        }
        Ok(ItemId(id))
    }
}

/// Domain fields of a row. Each section stores a different payload.
pub trait Payload: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Section this payload belongs to
    const SECTION: Section;

    /// Payload of the single item a fresh collection starts with
    fn seed() -> Self;

    /// Main line of text shown for the row
    fn text(&self) -> &str;
}

/// A row in one of the lists: an id plus its section-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem<P> {
    pub id: ItemId,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> ListItem<P> {
    pub fn new(id: ItemId, payload: P) -> Self {
        Self { id, payload }
    }
}

/// A to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, with = "optional_date")]
    pub due: Option<NaiveDate>,
}

impl Task {
    pub fn new(text: String, due: Option<NaiveDate>) -> Self {
        Self {
            text,
            done: false,
            due,
        }
    }

    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }
}

impl Payload for Task {
    const SECTION: Section = Section::Tasks;

    fn seed() -> Self {
        Self {
            text: "Finish homework".to_string(),
            done: false,
            due: NaiveDate::from_ymd_opt(2025, 7, 22),
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Something to be alerted about ahead of a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub text: String,
    #[serde(with = "local_datetime")]
    pub time: NaiveDateTime,
}

impl Reminder {
    pub fn new(text: String, time: NaiveDateTime) -> Self {
        Self { text, time }
    }
}

impl Payload for Reminder {
    const SECTION: Section = Section::Reminders;

    fn seed() -> Self {
        let time = NaiveDate::from_ymd_opt(2025, 7, 21)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap_or_default();
        Self {
            text: "Dentist appointment".to_string(),
            time,
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// A goal with a 0-100 progress value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: u8,
    #[serde(default, with = "optional_date")]
    pub due: Option<NaiveDate>,
}

impl Goal {
    pub fn new(name: String, due: Option<NaiveDate>) -> Self {
        Self {
            name,
            progress: 0,
            due,
        }
    }

    /// Set progress, clamping out-of-range input into [0, 100]
    pub fn set_progress(&mut self, value: i64) {
        self.progress = clamp_progress(value);
    }
}

impl Payload for Goal {
    const SECTION: Section = Section::Goals;

    fn seed() -> Self {
        Self {
            name: "Run 5km".to_string(),
            progress: 60,
            due: NaiveDate::from_ymd_opt(2025, 8, 1),
        }
    }

    fn text(&self) -> &str {
        &self.name
    }
}

pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, MAX_PROGRESS as i64) as u8
}

fn clamped_progress<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(clamp_progress(value))
}

/// Dates stored as `YYYY-MM-DD`, with an empty string meaning "no date"
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Wall-clock timestamps stored as `YYYY-MM-DDTHH:MM` (seconds optional)
mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%Y-%m-%dT%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_local_datetime(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
    }
}

/// Parse a wall-clock timestamp as typed into a form or found in storage.
/// Accepts `T` or a space as separator, with or without seconds.
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_item_id_serializes_as_string() {
        let item = ListItem::new(ItemId(3), Task::new("Read".to_string(), None));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["text"], "Read");
        assert_eq!(json["due"], "");
    }

    #[test]
    fn test_item_id_accepts_number() {
        let item: ListItem<Task> =
            serde_json::from_str(r#"{"id": 7, "text": "Read", "done": true, "due": ""}"#).unwrap();
        assert_eq!(item.id, ItemId(7));
        assert!(item.payload.done);
        assert_eq!(item.payload.due, None);
    }

    #[test]
    fn test_item_id_rejects_garbage() {
        let result: Result<ListItem<Task>, _> =
            serde_json::from_str(r#"{"id": "abc", "text": "Read"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reminder_time_without_seconds() {
        let item: ListItem<Reminder> =
            serde_json::from_str(r#"{"id": "0", "text": "Dentist appointment", "time": "2025-07-21T10:00"}"#)
                .unwrap();
        assert_eq!(item.payload, Reminder::seed());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["time"], "2025-07-21T10:00");
    }

    #[test]
    fn test_goal_progress_clamped_on_load() {
        let item: ListItem<Goal> =
            serde_json::from_str(r#"{"id": "1", "name": "Swim", "progress": 180, "due": ""}"#).unwrap();
        assert_eq!(item.payload.progress, 100);

        let item: ListItem<Goal> =
            serde_json::from_str(r#"{"id": "1", "name": "Swim", "progress": -4}"#).unwrap();
        assert_eq!(item.payload.progress, 0);
    }

    #[test]
    fn test_goal_set_progress_clamps() {
        let mut goal = Goal::new("Swim".to_string(), None);
        goal.set_progress(-10);
        assert_eq!(goal.progress, 0);
        goal.set_progress(150);
        assert_eq!(goal.progress, 100);
        goal.set_progress(57);
        assert_eq!(goal.progress, 57);
    }

    #[test]
    fn test_task_toggle_twice_restores() {
        let mut task = Task::seed();
        task.toggle_done();
        assert!(task.done);
        task.toggle_done();
        assert!(!task.done);
    }

    #[test]
    fn test_parse_local_datetime_variants() {
        let expected = Reminder::seed().time;
        assert_eq!(parse_local_datetime("2025-07-21T10:00"), Some(expected));
        assert_eq!(parse_local_datetime("2025-07-21 10:00"), Some(expected));
        assert_eq!(parse_local_datetime(" 2025-07-21T10:00:00 "), Some(expected));
        assert_eq!(parse_local_datetime("tomorrow"), None);
    }
}
