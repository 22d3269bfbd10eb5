use super::store::KeyValueStore;
use crate::domain::{ItemId, ListItem, Payload};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

/// A collection as restored from storage, with the id counter reseeded past it
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<P> {
    pub items: Vec<ListItem<P>>,
    pub next_id: ItemId,
}

/// Loads and saves one ordered collection under one key
#[derive(Clone)]
pub struct ListStore {
    store: Rc<dyn KeyValueStore>,
    key: &'static str,
}

impl ListStore {
    pub fn new(store: Rc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Restore the collection. Missing or unreadable state falls back to the
    /// seed collection; this never fails.
    pub fn load<P: Payload>(&self) -> Loaded<P> {
        let items = match self.read::<P>() {
            Ok(Some(items)) => {
                debug!(key = self.key, count = items.len(), "restored collection");
                dedupe_ids(self.key, items)
            }
            Ok(None) => {
                debug!(key = self.key, "no stored collection, using seed");
                seed_items()
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "stored collection unreadable, using seed");
                seed_items()
            }
        };

        match next_id_after(&items) {
            Some(next_id) => Loaded { items, next_id },
            None => {
                warn!(key = self.key, "stored ids leave no room for new rows, using seed");
                Loaded {
                    items: seed_items(),
                    next_id: ItemId(1),
                }
            }
        }
    }

    fn read<P: Payload>(&self) -> Result<Option<Vec<ListItem<P>>>> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };
        let items = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stored {}", self.key))?;
        Ok(Some(items))
    }

    /// Overwrite the stored collection with `items`, in order
    pub fn save<P: Payload>(&self, items: &[ListItem<P>]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        self.store.set(self.key, &json)
    }
}

/// The collection a fresh install starts with
pub fn seed_items<P: Payload>() -> Vec<ListItem<P>> {
    vec![ListItem::new(ItemId(0), P::seed())]
}

/// First id guaranteed not to collide with `items`: max + 1, or 1 when empty.
/// `None` when the largest id cannot be incremented.
pub fn next_id_after<P>(items: &[ListItem<P>]) -> Option<ItemId> {
    match items.iter().map(|item| item.id).max() {
        Some(max) => max.next(),
        None => Some(ItemId(1)),
    }
}

/// Hand-edited files can repeat an id; keep the first occurrence
fn dedupe_ids<P>(key: &str, items: Vec<ListItem<P>>) -> Vec<ListItem<P>> {
    let mut seen = HashSet::new();
    let before = items.len();
    let items: Vec<_> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if items.len() != before {
        warn!(key, dropped = before - items.len(), "dropped rows with duplicate ids");
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, Reminder, Task};
    use crate::persistence::MemoryStore;
    use pretty_assertions::assert_eq;

    fn store_with(key: &'static str, value: Option<&str>) -> ListStore {
        let memory = MemoryStore::new();
        if let Some(value) = value {
            memory.set(key, value).unwrap();
        }
        ListStore::new(Rc::new(memory), key)
    }

    #[test]
    fn test_load_missing_uses_seed() {
        let store = store_with("tasks", None);
        let loaded = store.load::<Task>();
        assert_eq!(loaded.items, seed_items::<Task>());
        assert_eq!(loaded.next_id, ItemId(1));
    }

    #[test]
    fn test_load_malformed_uses_seed() {
        let store = store_with("reminders", Some("{not json"));
        let loaded = store.load::<Reminder>();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].payload.text, "Dentist appointment");

        let store = store_with("goals", Some(r#"{"name": "not a list"}"#));
        let loaded = store.load::<Goal>();
        assert_eq!(loaded.items, seed_items::<Goal>());
    }

    #[test]
    fn test_load_reseeds_counter_from_max_id() {
        let store = store_with(
            "tasks",
            Some(r#"[{"id":"0","text":"a","done":false,"due":""},{"id":"3","text":"b","done":true,"due":""}]"#),
        );
        let loaded = store.load::<Task>();
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.next_id, ItemId(4));
    }

    #[test]
    fn test_load_empty_list_is_prior_state() {
        let store = store_with("goals", Some("[]"));
        let loaded = store.load::<Goal>();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.next_id, ItemId(1));
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let store = store_with(
            "tasks",
            Some(r#"[{"id":"2","text":"first"},{"id":"2","text":"second"},{"id":"5","text":"third"}]"#),
        );
        let loaded = store.load::<Task>();
        let texts: Vec<_> = loaded.items.iter().map(|i| i.payload.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "third"]);
        assert_eq!(loaded.next_id, ItemId(6));
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let store = store_with("tasks", None);
        let items = vec![
            ListItem::new(ItemId(4), Task::new("later".to_string(), None)),
            ListItem::new(ItemId(2), Task::new("earlier".to_string(), None)),
        ];
        store.save(&items).unwrap();

        let loaded = store.load::<Task>();
        assert_eq!(loaded.items, items);
        assert_eq!(loaded.next_id, ItemId(5));
    }

    #[test]
    fn test_load_out_of_range_id_uses_seed() {
        let store = store_with("tasks", Some(r#"[{"id":"18446744073709551615","text":"a"}]"#));
        let loaded = store.load::<Task>();
        assert_eq!(loaded.items, seed_items::<Task>());
        assert_eq!(loaded.next_id, ItemId(1));

        let largest = format!(r#"[{{"id":"{}","text":"a"}}]"#, ItemId::MAX);
        let store = store_with("tasks", Some(&largest));
        let loaded = store.load::<Task>();
        assert_eq!(loaded.items[0].id, ItemId(ItemId::MAX));
        assert_eq!(loaded.next_id, ItemId(ItemId::MAX + 1));
    }

    #[test]
    fn test_next_id_after_exhausted_ids() {
        let items = vec![ListItem::new(ItemId(u64::MAX), Task::seed())];
        assert_eq!(next_id_after(&items), None);
        assert_eq!(next_id_after::<Task>(&[]), Some(ItemId(1)));
    }
}
