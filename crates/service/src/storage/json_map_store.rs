use std::{collections::HashMap, hash::Hash, io::ErrorKind, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::{error, info};

use crate::errors::ServiceError;

fn io_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file and provides simple CRUD helpers.
/// Backs the file-based office collection, where each value is one document.
/// Writes hold the lock until the file is replaced, so the file never lags
/// behind a concurrent writer.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing; an existing file that does not parse is an error, so a
    /// later write can never overwrite it.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                error!(path = %file_path.display(), error = %e, "unreadable json store");
                ServiceError::Db(format!("corrupt json store {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(io_err)?)
                    .await
                    .map_err(io_err)?;
                info!(path = %file_path.display(), "created empty json store");
                empty
            }
            Err(e) => return Err(io_err(e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    /// Serialize and swap the file in via a sibling temp file.
    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(io_err)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(io_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(io_err)?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        self.update_map(|m| Ok(m.remove(key).is_some())).await
    }

    /// Check whether a key is present.
    pub async fn contains_key(&self, key: &K) -> bool {
        let map = self.inner.read().await;
        map.contains_key(key)
    }

    /// Apply a mutation to the underlying map and persist.
    /// A failing closure or a failed write leaves the map as it was.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<T, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let before = map.clone();
        let out = match f(&mut map) {
            Ok(out) => out,
            Err(e) => {
                *map = before;
                return Err(e);
            }
        };
        if let Err(e) = self.save(&map).await {
            *map = before;
            return Err(e);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        // initially empty
        assert_eq!(store.list().await.len(), 0);

        // insert and check
        store
            .update_map(|m| {
                m.insert("a".into(), "1".into());
                m.insert("b".into(), "2".into());
                Ok(())
            })
            .await?;
        assert!(store.contains_key(&"a".into()).await);
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        // update_map returns the closure's value
        let touched = store
            .update_map(|m| Ok(m.get_mut("a").map(|v| *v = "10".into()).is_some()))
            .await?;
        assert!(touched);
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("10"));

        // failing closure leaves the map untouched
        let res: Result<(), _> = store
            .update_map(|m| {
                m.clear();
                Err(ServiceError::Db("nope".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.list().await.len(), 2);

        // remove and reload persistence
        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        assert_eq!(reloaded.list().await.len(), 2);
        let existed = reloaded.remove(&"b".into()).await?;
        assert!(existed);
        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        let entries = reloaded.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(reloaded.get(&"a".into()).await.as_deref(), Some("10"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_and_left_untouched() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let garbage = br#"{"a": "1", trunc"#;
        tokio::fs::write(&tmp, garbage).await?;

        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));
        assert_eq!(tokio::fs::read(&tmp).await?, garbage);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
