pub mod memory;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

pub use memory::InMemoryStore;

/// Fixed record names, one record per name per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    UserProfile,
    FloodScenario,
    GameSession,
    FeedbackData,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::UserProfile,
        StoreKey::FloodScenario,
        StoreKey::GameSession,
        StoreKey::FeedbackData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::UserProfile => "userProfile",
            StoreKey::FloodScenario => "floodScenario",
            StoreKey::GameSession => "gameSession",
            StoreKey::FeedbackData => "feedbackData",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store is full")]
    Full,
    #[error("corrupt record under {key}: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value port standing in for the browser's local storage.
/// Writes replace the whole record; nothing is ever merged.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, slot: Uuid, key: StoreKey) -> Result<Option<Value>, StoreError>;
    async fn put(&self, slot: Uuid, key: StoreKey, value: Value) -> Result<(), StoreError>;
    async fn clear(&self, slot: Uuid, key: StoreKey) -> Result<(), StoreError>;

    async fn clear_all(&self, slot: Uuid) -> Result<(), StoreError> {
        for key in StoreKey::ALL {
            self.clear(slot, key).await?;
        }
        Ok(())
    }

    /// Housekeeping hook; stores without expiry keep everything.
    async fn evict_idle(&self, _max_idle: Duration) -> usize {
        0
    }
}

pub async fn load<T: DeserializeOwned>(
    store: &dyn SessionStore,
    slot: Uuid,
    key: StoreKey,
) -> Result<Option<T>, StoreError> {
    match store.get(slot, key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.as_str(),
                source,
            }),
        None => Ok(None),
    }
}

pub async fn save<T: Serialize>(
    store: &dyn SessionStore,
    slot: Uuid,
    key: StoreKey,
    record: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record).map_err(|source| StoreError::Corrupt {
        key: key.as_str(),
        source,
    })?;
    store.put(slot, key, value).await
}
