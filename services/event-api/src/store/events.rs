//! Event store.

use std::collections::HashMap;

use evently_id::EventId;
use tokio::sync::RwLock;

use super::StoreError;
use crate::model::Event;

#[derive(Default)]
struct Events {
    by_id: HashMap<EventId, Event>,
    /// Ids in insertion order.
    order: Vec<EventId>,
}

/// Owns every [`Event`] record. Listing follows insertion order.
#[derive(Default)]
pub struct EventStore {
    events: RwLock<Events>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<Event> {
        let events = self.events.read().await;
        events
            .order
            .iter()
            .filter_map(|id| events.by_id.get(id))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &EventId) -> Option<Event> {
        self.events.read().await.by_id.get(id).cloned()
    }

    pub async fn insert(&self, event: Event) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        if events.by_id.contains_key(&event.id) {
            return Err(StoreError::DuplicateEvent(event.id));
        }
        events.order.push(event.id);
        events.by_id.insert(event.id, event);
        Ok(())
    }

    /// Runs `f` against the stored event while holding the write lock.
    ///
    /// Returns `None` if no event has this id. `f` must finish its checks
    /// before mutating: an `Err` does not roll back earlier writes.
    pub async fn modify<T, E>(
        &self,
        id: &EventId,
        f: impl FnOnce(&mut Event) -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        let mut events = self.events.write().await;
        events.by_id.get_mut(id).map(f)
    }

    /// Removes the event if `check` accepts it, under a single write lock.
    ///
    /// Returns `None` if no event has this id.
    pub async fn remove_if<E>(
        &self,
        id: &EventId,
        check: impl FnOnce(&Event) -> Result<(), E>,
    ) -> Option<Result<Event, E>> {
        let mut events = self.events.write().await;
        let event = events.by_id.get(id)?;
        if let Err(e) = check(event) {
            return Some(Err(e));
        }
        events.order.retain(|existing| existing != id);
        events.by_id.remove(id).map(Ok)
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use evently_id::UserId;

    use super::*;

    fn event(title: &str) -> Event {
        let now = Utc::now();
        Event {
            id: EventId::new(),
            title: title.to_string(),
            description: "D".to_string(),
            date: NaiveDate::from_ymd_opt(2999, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            created_by: UserId::new(),
            participants: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_get_list() {
        let store = EventStore::new();
        let first = event("first");
        let second = event("second");
        store.insert(second.clone()).await.unwrap();
        store.insert(first.clone()).await.unwrap();

        assert_eq!(store.get(&first.id).await, Some(first.clone()));
        let titles: Vec<_> = store.list().await.into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_within_a_millisecond() {
        let store = EventStore::new();
        let titles: Vec<String> = (0..200).map(|i| i.to_string()).collect();
        for title in &titles {
            store.insert(event(title)).await.unwrap();
        }

        let listed: Vec<_> = store.list().await.into_iter().map(|e| e.title).collect();
        assert_eq!(listed, titles);
    }

    #[tokio::test]
    async fn test_removed_event_leaves_order() {
        let store = EventStore::new();
        let (a, b, c) = (event("a"), event("b"), event("c"));
        for e in [&a, &b, &c] {
            store.insert(e.clone()).await.unwrap();
        }

        store.remove_if(&b.id, |_| Ok::<(), ()>(())).await.unwrap().unwrap();
        let titles: Vec<_> = store.list().await.into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let store = EventStore::new();
        let e = event("x");
        store.insert(e.clone()).await.unwrap();
        assert_eq!(
            store.insert(e.clone()).await,
            Err(StoreError::DuplicateEvent(e.id))
        );
    }

    #[tokio::test]
    async fn test_modify_missing_returns_none() {
        let store = EventStore::new();
        let result: Option<Result<(), ()>> = store.modify(&EventId::new(), |_| Ok(())).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_modify_applies_change() {
        let store = EventStore::new();
        let e = event("old");
        store.insert(e.clone()).await.unwrap();

        let result: Option<Result<String, ()>> = store
            .modify(&e.id, |stored| {
                stored.title = "new".to_string();
                Ok(stored.title.clone())
            })
            .await;
        assert_eq!(result, Some(Ok("new".to_string())));
        assert_eq!(store.get(&e.id).await.unwrap().title, "new");
    }

    #[tokio::test]
    async fn test_remove_if() {
        let store = EventStore::new();
        let e = event("x");
        store.insert(e.clone()).await.unwrap();

        let denied = store.remove_if(&e.id, |_| Err("nope")).await;
        assert_eq!(denied, Some(Err("nope")));
        assert_eq!(store.len().await, 1);

        let removed = store.remove_if(&e.id, |_| Ok::<(), ()>(())).await;
        assert_eq!(removed, Some(Ok(e.clone())));
        assert!(store.is_empty().await);

        let missing = store.remove_if(&e.id, |_| Ok::<(), ()>(())).await;
        assert!(missing.is_none());
    }
}
