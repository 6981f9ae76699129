use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{KvStore, StorageError};

/// Process-local ordered map; contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryMapStore<K, V> {
    map: BTreeMap<K, V>,
}

impl<K: Ord, V> MemoryMapStore<K, V> {
    pub fn new() -> Self { Self { map: BTreeMap::new() } }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

#[async_trait]
impl<K, V> KvStore<K, V> for MemoryMapStore<K, V>
where
    K: Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StorageError> {
        Ok(self.map.get(key).cloned())
    }

    async fn insert(&mut self, key: K, value: V) -> Result<Option<V>, StorageError> {
        Ok(self.map.insert(key, value))
    }

    async fn remove(&mut self, key: &K) -> Result<Option<V>, StorageError> {
        Ok(self.map.remove(key))
    }

    async fn values(&self) -> Result<Vec<V>, StorageError> {
        Ok(self.map.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_orders_by_key() -> Result<(), anyhow::Error> {
        let mut store = MemoryMapStore::<String, u32>::new();
        assert!(store.is_empty());
        store.insert("b".into(), 2).await?;
        store.insert("a".into(), 1).await?;
        assert_eq!(store.insert("b".into(), 20).await?, Some(2));
        assert_eq!(store.values().await?, vec![1, 20]);
        assert_eq!(store.remove(&"a".into()).await?, Some(1));
        assert_eq!(store.remove(&"a".into()).await?, None);
        assert_eq!(store.len(), 1);
        Ok(())
    }
}
