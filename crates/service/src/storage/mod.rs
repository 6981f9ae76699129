//! Storage abstractions for the service layer
//!
//! The message service only sees [`KvStore`]: an ordered key-value map with
//! get/insert/remove/values. Two implementations ship here, a JSON file that
//! is rewritten after every mutation and a process-local map.

use async_trait::async_trait;
use thiserror::Error;

pub mod json_map_store;
pub mod memory_map_store;

pub use json_map_store::JsonMapStore;
pub use memory_map_store::MemoryMapStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

/// Ordered key-value map used as the durable home of records.
///
/// Mutating calls take `&mut self`; callers that share a store must serialize
/// access themselves. A failed mutation leaves the map unchanged.
#[async_trait]
pub trait KvStore<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Result<Option<V>, StorageError>;

    /// Insert or replace; returns the previous value.
    async fn insert(&mut self, key: K, value: V) -> Result<Option<V>, StorageError>;

    /// Remove by key; returns the removed value.
    async fn remove(&mut self, key: &K) -> Result<Option<V>, StorageError>;

    /// All values in ascending key order.
    async fn values(&self) -> Result<Vec<V>, StorageError>;
}

#[async_trait]
impl<K, V, S> KvStore<K, V> for Box<S>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: KvStore<K, V> + ?Sized,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StorageError> { (**self).get(key).await }
    async fn insert(&mut self, key: K, value: V) -> Result<Option<V>, StorageError> { (**self).insert(key, value).await }
    async fn remove(&mut self, key: &K) -> Result<Option<V>, StorageError> { (**self).remove(key).await }
    async fn values(&self) -> Result<Vec<V>, StorageError> { (**self).values().await }
}
