use super::{SessionStore, StoreError, StoreKey};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

struct Slot {
    records: HashMap<StoreKey, Value>,
    touched: Instant,
}

/// Process-local store. Capacity is counted in slots; a write that would open
/// a new slot past the limit fails with `StoreError::Full`.
#[derive(Clone)]
pub struct InMemoryStore {
    slots: Arc<RwLock<HashMap<Uuid, Slot>>>,
    max_slots: usize,
}

impl InMemoryStore {
    pub fn new(max_slots: usize) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            max_slots,
        }
    }

    #[cfg(test)]
    pub async fn slot_count(&self) -> usize {
        self.slots.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn get(&self, slot: Uuid, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let slots = self.slots.read().await;
        Ok(slots.get(&slot).and_then(|s| s.records.get(&key).cloned()))
    }

    async fn put(&self, slot: Uuid, key: StoreKey, value: Value) -> Result<(), StoreError> {
        let mut slots = self.slots.write().await;
        if !slots.contains_key(&slot) && slots.len() >= self.max_slots {
            return Err(StoreError::Full);
        }
        let entry = slots.entry(slot).or_insert_with(|| Slot {
            records: HashMap::new(),
            touched: Instant::now(),
        });
        entry.records.insert(key, value);
        entry.touched = Instant::now();
        Ok(())
    }

    async fn clear(&self, slot: Uuid, key: StoreKey) -> Result<(), StoreError> {
        let mut slots = self.slots.write().await;
        if let Some(entry) = slots.get_mut(&slot) {
            entry.records.remove(&key);
            entry.touched = Instant::now();
            if entry.records.is_empty() {
                slots.remove(&slot);
            }
        }
        Ok(())
    }

    /// Drops slots untouched for longer than `max_idle`.
    async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| now.duration_since(slot.touched) < max_idle);
        let removed = before - slots.len();

        tracing::debug!("Store eviction: {} removed, {} active slots", removed, slots.len());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load, save};
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_clear() {
        let store = InMemoryStore::new(10);
        let slot = Uuid::new_v4();

        assert!(store.get(slot, StoreKey::UserProfile).await.unwrap().is_none());

        store
            .put(slot, StoreKey::UserProfile, json!({"a": 1}))
            .await
            .unwrap();
        // Overwritten wholesale, never merged
        store
            .put(slot, StoreKey::UserProfile, json!({"b": 2}))
            .await
            .unwrap();
        let value = store.get(slot, StoreKey::UserProfile).await.unwrap().unwrap();
        assert_eq!(value, json!({"b": 2}));

        store.clear(slot, StoreKey::UserProfile).await.unwrap();
        assert!(store.get(slot, StoreKey::UserProfile).await.unwrap().is_none());
        assert_eq!(store.slot_count().await, 0);
    }

    #[tokio::test]
    async fn test_slots_are_isolated() {
        let store = InMemoryStore::new(10);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.put(a, StoreKey::GameSession, json!(1)).await.unwrap();
        assert!(store.get(b, StoreKey::GameSession).await.unwrap().is_none());

        store.put(b, StoreKey::GameSession, json!(2)).await.unwrap();
        store.clear_all(a).await.unwrap();
        assert!(store.get(a, StoreKey::GameSession).await.unwrap().is_none());
        assert_eq!(store.get(b, StoreKey::GameSession).await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_capacity() {
        let store = InMemoryStore::new(1);
        let a = Uuid::new_v4();
        store.put(a, StoreKey::UserProfile, json!(1)).await.unwrap();
        // Existing slot can still be written
        store.put(a, StoreKey::FloodScenario, json!(2)).await.unwrap();

        let err = store
            .put(Uuid::new_v4(), StoreKey::UserProfile, json!(3))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Full));
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let store = InMemoryStore::new(10);
        store
            .put(Uuid::new_v4(), StoreKey::UserProfile, json!(1))
            .await
            .unwrap();

        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.evict_idle(Duration::from_millis(10)).await, 1);
        assert_eq!(store.slot_count().await, 0);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = InMemoryStore::new(10);
        let slot = Uuid::new_v4();

        save(&store, slot, StoreKey::FeedbackData, &vec![1, 2, 3])
            .await
            .unwrap();
        let back: Option<Vec<i32>> = load(&store, slot, StoreKey::FeedbackData).await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        store
            .put(slot, StoreKey::UserProfile, json!("not a profile"))
            .await
            .unwrap();
        let bad: Result<Option<Vec<i32>>, _> = load(&store, slot, StoreKey::UserProfile).await;
        assert!(matches!(bad, Err(StoreError::Corrupt { key: "userProfile", .. })));
    }
}
