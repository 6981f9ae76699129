use std::{collections::BTreeMap, io::ErrorKind, path::{Path, PathBuf}};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use super::{KvStore, StorageError};

/// Generic JSON file-backed ordered map.
///
/// Keeps a `BTreeMap<K, V>` in memory and rewrites the whole file after every
/// mutation (temp file, fsync, rename). If the write fails the in-memory change is
/// rolled back, so the map never runs ahead of what is on disk.
#[derive(Debug)]
pub struct JsonMapStore<K, V> {
    map: BTreeMap<K, V>,
    file_path: PathBuf,
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io { path: path.display().to_string(), source }
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned + Clone,
    V: Serialize + DeserializeOwned + Clone,
{
    /// Open the store at `path`. Creates the file with an empty map if missing;
    /// an unreadable or corrupt file is an error rather than being replaced.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| io_err(parent, e))?;
        }

        let store = match fs::read(&file_path).await {
            Ok(bytes) => {
                let map: BTreeMap<K, V> = serde_json::from_slice(&bytes)?;
                info!(path = %file_path.display(), entries = map.len(), "loaded json map store");
                Self { map, file_path }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let store = Self { map: BTreeMap::new(), file_path };
                store.save().await?;
                info!(path = %store.file_path.display(), "created empty json map store");
                store
            }
            Err(e) => return Err(io_err(&file_path, e)),
        };
        Ok(store)
    }

    async fn save(&self) -> Result<(), StorageError> {
        let data = serde_json::to_vec(&self.map)?;
        let tmp = self.file_path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).await.map_err(|e| io_err(&tmp, e))?;
        file.write_all(&data).await.map_err(|e| io_err(&tmp, e))?;
        file.sync_all().await.map_err(|e| io_err(&tmp, e))?;
        drop(file);
        fs::rename(&tmp, &self.file_path).await.map_err(|e| io_err(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), entries = self.map.len(), "persisted json map store");
        Ok(())
    }
}

#[async_trait]
impl<K, V> KvStore<K, V> for JsonMapStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StorageError> {
        Ok(self.map.get(key).cloned())
    }

    async fn insert(&mut self, key: K, value: V) -> Result<Option<V>, StorageError> {
        let previous = self.map.insert(key.clone(), value);
        if let Err(e) = self.save().await {
            match previous {
                Some(old) => { self.map.insert(key, old); }
                None => { self.map.remove(&key); }
            }
            return Err(e);
        }
        Ok(previous)
    }

    async fn remove(&mut self, key: &K) -> Result<Option<V>, StorageError> {
        let Some(removed) = self.map.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.save().await {
            self.map.insert(key.clone(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    async fn values(&self) -> Result<Vec<V>, StorageError> {
        Ok(self.map.values().cloned().collect())
    }
}
