pub mod enums;
pub mod item;
pub mod views;

pub use enums::{Section, Transition, UiMode};
pub use item::{parse_date, parse_local_datetime, Goal, ItemId, ListItem, Payload, Reminder, Task};
pub use views::{checkbox, format_due_date, format_local_timestamp, progress_bar, transition_ratio};
