use crate::domain::{Goal, ItemId, ListItem, Payload, Task, Transition};
use crate::form::{Draft, ValidationError};
use crate::persistence::ListStore;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Presentation-only transition tags, keyed by item id.
/// Kept apart from the items so it can never be persisted.
#[derive(Debug, Clone, Default)]
pub struct TransitionOverlay {
    entries: HashMap<ItemId, (Transition, Instant)>,
}

impl TransitionOverlay {
    pub fn get(&self, id: ItemId) -> Option<Transition> {
        self.entries.get(&id).map(|(t, _)| *t)
    }

    /// When the current transition for `id` started
    pub fn started_at(&self, id: ItemId) -> Option<Instant> {
        self.entries.get(&id).map(|(_, started)| *started)
    }

    fn set(&mut self, id: ItemId, transition: Transition) {
        self.entries.insert(id, (transition, Instant::now()));
    }

    fn clear(&mut self, id: ItemId) {
        self.entries.remove(&id);
    }

    /// Ids whose transition has been running for at least `duration`
    pub fn due(&self, now: Instant, duration: Duration) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .entries
            .iter()
            .filter(|(_, (_, started))| now.saturating_duration_since(*started) >= duration)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sole writer of one ordered collection.
///
/// Every mutation writes the whole collection through to the store. Deleting
/// is two-phase: `remove` tags the row `Leaving`, and the row only disappears
/// once `on_transition_complete` is called for it.
pub struct ListController<P: Payload> {
    items: Vec<ListItem<P>>,
    overlay: TransitionOverlay,
    next_id: ItemId,
    store: ListStore,
}

impl<P: Payload> ListController<P> {
    /// Restore the collection from `store` and reseed the id counter past it
    pub fn load(store: ListStore) -> Self {
        let loaded = store.load::<P>();
        info!(
            key = store.key(),
            count = loaded.items.len(),
            next_id = %loaded.next_id,
            "loaded collection"
        );
        Self {
            items: loaded.items,
            overlay: TransitionOverlay::default(),
            next_id: loaded.next_id,
            store,
        }
    }

    pub fn items(&self) -> &[ListItem<P>] {
        &self.items
    }

    /// Items that are not on their way out
    pub fn live_items(&self) -> impl Iterator<Item = &ListItem<P>> {
        self.items
            .iter()
            .filter(|item| self.overlay.get(item.id) != Some(Transition::Leaving))
    }

    pub fn get(&self, id: ItemId) -> Option<&ListItem<P>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn transition_of(&self, id: ItemId) -> Option<Transition> {
        self.overlay.get(id)
    }

    pub fn overlay(&self) -> &TransitionOverlay {
        &self.overlay
    }

    /// Id the next successful `add` will assign
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Validate `draft` and append it, tagged `Entering`. Nothing changes on error.
    pub fn add<D: Draft<Output = P>>(&mut self, draft: &D) -> Result<ItemId, ValidationError> {
        let payload = draft.validate()?;

        let id = self.next_id;
        self.next_id = id.next().ok_or(ValidationError::IdsExhausted)?;
        self.items.push(ListItem::new(id, payload));
        self.overlay.set(id, Transition::Entering);
        info!(key = self.store.key(), %id, "added item");

        self.persist();
        Ok(id)
    }

    /// Mutate an item's payload in place and write through.
    /// Returns false (and does nothing) if the id is not present.
    pub fn update(&mut self, id: ItemId, f: impl FnOnce(&mut P)) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!(key = self.store.key(), %id, "update on missing item ignored");
            return false;
        };
        f(&mut item.payload);
        self.persist();
        true
    }

    /// Start removing an item: tag it `Leaving` and persist the collection
    /// with the item still in it. Returns true only on the first call for a
    /// present item.
    pub fn remove(&mut self, id: ItemId) -> bool {
        if self.get(id).is_none() {
            debug!(key = self.store.key(), %id, "remove on missing item ignored");
            return false;
        }
        if self.overlay.get(id) == Some(Transition::Leaving) {
            return false;
        }

        // Leaving overrides Entering
        self.overlay.set(id, Transition::Leaving);
        info!(key = self.store.key(), %id, "removing item");
        self.persist();
        true
    }

    /// Finish the transition of `id`. A `Leaving` item is deleted and the
    /// collection persisted; an `Entering` item just loses its tag.
    /// Returns the transition that was finished.
    pub fn on_transition_complete(&mut self, id: ItemId) -> Option<Transition> {
        let transition = self.overlay.get(id)?;
        self.overlay.clear(id);

        match transition {
            Transition::Leaving => {
                self.items.retain(|item| item.id != id);
                info!(key = self.store.key(), %id, "removed item");
                self.persist();
            }
            Transition::Entering => {
                debug!(key = self.store.key(), %id, "item settled");
            }
        }
        Some(transition)
    }

    /// Complete every transition that has run for at least `duration`.
    /// Returns true if any item was physically removed.
    pub fn finish_due_transitions(&mut self, now: Instant, duration: Duration) -> bool {
        let mut removed = false;
        for id in self.overlay.due(now, duration) {
            if self.on_transition_complete(id) == Some(Transition::Leaving) {
                removed = true;
            }
        }
        removed
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.items) {
            warn!(key = self.store.key(), error = %e, "failed to persist collection");
        }
    }
}

impl ListController<Task> {
    /// Flip a task's done flag
    pub fn toggle(&mut self, id: ItemId) -> bool {
        self.update(id, Task::toggle_done)
    }
}

impl ListController<Goal> {
    /// Set a goal's progress, clamped to [0, 100]
    pub fn set_progress(&mut self, id: ItemId, value: i64) -> bool {
        self.update(id, |goal| goal.set_progress(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reminder;
    use crate::form::{GoalDraft, ReminderDraft, TaskDraft};
    use crate::persistence::{KeyValueStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn task(text: &str) -> TaskDraft {
        TaskDraft {
            text: text.to_string(),
            due: String::new(),
        }
    }

    fn controller<P: Payload>(key: &'static str) -> (ListController<P>, Rc<MemoryStore>) {
        let memory = Rc::new(MemoryStore::new());
        let store = ListStore::new(memory.clone(), key);
        (ListController::load(store), memory)
    }

    fn persisted_tasks(memory: &MemoryStore) -> Vec<ListItem<Task>> {
        serde_json::from_str(&memory.get("tasks").unwrap().unwrap()).unwrap()
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn test_add_assigns_increasing_unique_ids() {
        let (mut tasks, _) = controller::<Task>("tasks");
        let ids: Vec<ItemId> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| tasks.add(&task(t)).unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], ItemId(1)); // seed holds id 0
        let unique: std::collections::HashSet<_> = tasks.items().iter().map(|i| i.id).collect();
        assert_eq!(tasks.len(), 5);
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_add_tags_entering_and_persists() {
        let (mut tasks, memory) = controller::<Task>("tasks");
        let id = tasks.add(&task("Water plants")).unwrap();

        assert_eq!(tasks.transition_of(id), Some(Transition::Entering));
        let stored = persisted_tasks(&memory);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].payload.text, "Water plants");
    }

    #[test]
    fn test_add_empty_text_never_mutates() {
        let (mut tasks, memory) = controller::<Task>("tasks");
        let before = tasks.items().to_vec();

        for text in ["", "   ", "\t\n"] {
            let err = tasks.add(&task(text)).unwrap_err();
            assert_eq!(err.to_string(), "Task name is required.");
        }
        assert_eq!(tasks.items(), before.as_slice());
        assert_eq!(tasks.next_id(), ItemId(1));
        assert_eq!(memory.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_remove_then_complete_deletes_everywhere() {
        let (mut tasks, memory) = controller::<Task>("tasks");
        let id = tasks.add(&task("Temporary")).unwrap();

        assert!(tasks.remove(id));
        assert_eq!(tasks.transition_of(id), Some(Transition::Leaving));
        // Still present while leaving, in memory and on disk
        assert!(tasks.get(id).is_some());
        assert!(persisted_tasks(&memory).iter().any(|i| i.id == id));
        assert_eq!(tasks.live_items().count(), 1);

        assert_eq!(tasks.on_transition_complete(id), Some(Transition::Leaving));
        assert!(tasks.get(id).is_none());
        assert!(persisted_tasks(&memory).iter().all(|i| i.id != id));
        assert_eq!(tasks.transition_of(id), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut tasks, _) = controller::<Task>("tasks");
        assert!(tasks.remove(ItemId(0)));
        let started = tasks.overlay().started_at(ItemId(0));
        assert!(!tasks.remove(ItemId(0)));
        assert_eq!(tasks.overlay().started_at(ItemId(0)), started);
        assert!(!tasks.remove(ItemId(42)));
    }

    #[test]
    fn test_remove_while_entering_takes_precedence() {
        let (mut tasks, _) = controller::<Task>("tasks");
        let id = tasks.add(&task("Oops")).unwrap();
        assert!(tasks.remove(id));
        assert_eq!(tasks.transition_of(id), Some(Transition::Leaving));

        assert_eq!(tasks.on_transition_complete(id), Some(Transition::Leaving));
        assert!(tasks.get(id).is_none());
    }

    #[test]
    fn test_complete_entering_only_clears_tag() {
        let (mut tasks, _) = controller::<Task>("tasks");
        let id = tasks.add(&task("Stay")).unwrap();

        assert_eq!(tasks.on_transition_complete(id), Some(Transition::Entering));
        assert_eq!(tasks.transition_of(id), None);
        assert!(tasks.get(id).is_some());

        // Nothing left to complete
        assert_eq!(tasks.on_transition_complete(id), None);
        assert_eq!(tasks.on_transition_complete(ItemId(99)), None);
    }

    #[test]
    fn test_toggle_twice_restores_and_ignores_missing() {
        let (mut tasks, memory) = controller::<Task>("tasks");
        assert!(tasks.toggle(ItemId(0)));
        assert!(tasks.get(ItemId(0)).unwrap().payload.done);
        assert!(persisted_tasks(&memory)[0].payload.done);

        assert!(tasks.toggle(ItemId(0)));
        assert!(!tasks.get(ItemId(0)).unwrap().payload.done);

        assert!(!tasks.toggle(ItemId(7)));
    }

    #[test]
    fn test_set_progress_clamps() {
        let (mut goals, _) = controller::<Goal>("goals");
        let id = goals
            .add(&GoalDraft {
                name: "Learn Rust".to_string(),
                due: String::new(),
            })
            .unwrap();

        for (input, stored) in [(-10, 0), (150, 100), (57, 57)] {
            assert!(goals.set_progress(id, input));
            assert_eq!(goals.get(id).unwrap().payload.progress, stored);
        }
        assert!(!goals.set_progress(ItemId(99), 10));
    }

    #[test]
    fn test_restart_reseeds_next_id() {
        let memory = Rc::new(MemoryStore::new());
        memory
            .set(
                "tasks",
                r#"[{"id":"0","text":"a","done":false,"due":""},{"id":"3","text":"b","done":false,"due":""}]"#,
            )
            .unwrap();
        let mut tasks: ListController<Task> = ListController::load(ListStore::new(memory, "tasks"));

        assert_eq!(tasks.add(&task("c")).unwrap(), ItemId(4));
    }

    #[test]
    fn test_finish_due_transitions() {
        let (mut reminders, _) = controller::<Reminder>("reminders");
        let kept = reminders
            .add(&ReminderDraft {
                text: "Call mom".to_string(),
                time: "2025-07-22 18:00".to_string(),
            })
            .unwrap();
        reminders.remove(ItemId(0));

        // Not yet
        assert!(!reminders.finish_due_transitions(Instant::now(), Duration::from_secs(60)));
        assert_eq!(reminders.len(), 2);

        assert!(reminders.finish_due_transitions(later(), Duration::from_millis(400)));
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders.items()[0].id, kept);
        assert!(reminders.overlay().is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (mut tasks, _) = controller::<Task>("tasks");
        tasks.add(&task("one")).unwrap();
        tasks.add(&task("two")).unwrap();
        tasks.remove(ItemId(1));
        tasks.on_transition_complete(ItemId(1));
        tasks.add(&task("three")).unwrap();

        let texts: Vec<_> = tasks.items().iter().map(|i| i.payload.text.as_str()).collect();
        assert_eq!(texts, vec!["Finish homework", "two", "three"]);
        assert_eq!(tasks.items()[2].id, ItemId(3));
    }
}
