use std::collections::BTreeMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use color_eyre::eyre::WrapErr;
use log::info;
use serde_json::Value;

/// Everything ever fetched, keyed by request URL or by site name
pub type CacheMap = BTreeMap<String, Value>;

/// A single JSON file holding the whole cache.
///
/// Every save rewrites the file wholesale, there is no delta or locking.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// read the backing file, a missing file is an empty cache
    pub fn load(&self) -> color_eyre::Result<CacheMap> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheMap::new()),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("cannot read cache file [{}]", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("cache file [{}] is not a valid JSON object", self.path.display()))
    }

    pub fn save(&self, cache: &CacheMap) -> color_eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(cache)?;
        std::fs::write(&self.path, content)
            .wrap_err_with(|| format!("cannot write cache file [{}]", self.path.display()))
    }
}

/// Looks a key up in the cache before falling back to a loader.
///
/// The store is re-read from disk on every call, so edits made to the file
/// by someone else between two fetches are picked up.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    store: CacheStore,
}

impl CachedFetcher {
    pub fn new(store: CacheStore) -> Self {
        Self {
            store,
        }
    }

    /// return the cached value for `key`, or run `loader` and remember its result forever
    pub async fn fetch<F, Fut>(&self, key: &str, loader: F) -> color_eyre::Result<Value>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = color_eyre::Result<Value>>,
    {
        let mut cache = self.store.load()?;
        if let Some(value) = cache.get(key) {
            info!("using cache for [{}]", key);
            return Ok(value.clone());
        }

        info!("fetching [{}]", key);
        let value = loader(key.to_string()).await?;
        cache.insert(key.to_string(), value.clone());
        self.store.save(&cache)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use color_eyre::eyre::bail;
    use serde_json::json;
    use tempfile::TempDir;
    use super::*;

    async fn failing_loader(key: String) -> color_eyre::Result<Value> {
        bail!("loader must not run for [{}]", key)
    }

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path().join("cache.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let (store, temp_dir) = create_test_store();
        std::fs::write(temp_dir.path().join("cache.json"), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(format!("{:?}", err).contains("not a valid JSON object"));
    }

    #[test]
    fn test_save_then_load_keeps_keys_and_values() {
        let (store, _temp_dir) = create_test_store();
        let mut cache = CacheMap::new();
        cache.insert("https://www.nps.gov/index.htm".to_string(), json!("<html></html>"));
        cache.insert("Isle Royale".to_string(), json!({"searchResults": [{"name": "Lodge"}]}));

        store.save(&cache).unwrap();

        assert_eq!(store.load().unwrap(), cache);
    }

    #[test]
    fn test_save_creates_missing_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cache.json");
        let store = CacheStore::new(&path);

        store.save(&CacheMap::new()).unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_cache_hit_never_calls_loader() {
        let (store, _temp_dir) = create_test_store();
        let mut cache = CacheMap::new();
        cache.insert("key".to_string(), json!("stored"));
        store.save(&cache).unwrap();
        let fetcher = CachedFetcher::new(store);

        let value = fetcher.fetch("key", failing_loader).await.unwrap();

        assert_eq!(value, json!("stored"));
    }

    #[tokio::test]
    async fn test_cache_miss_calls_loader_once_and_stores_result() {
        let (store, _temp_dir) = create_test_store();
        let fetcher = CachedFetcher::new(store.clone());
        let calls = Cell::new(0);

        for _ in 0..2 {
            let value = fetcher.fetch("https://example.com/a", |key| {
                calls.set(calls.get() + 1);
                async move { Ok::<_, color_eyre::Report>(json!(format!("body of {}", key))) }
            }).await.unwrap();
            assert_eq!(value, json!("body of https://example.com/a"));
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(store.load().unwrap().get("https://example.com/a"), Some(&json!("body of https://example.com/a")));
    }

    #[tokio::test]
    async fn test_loader_error_is_not_cached() {
        let (store, _temp_dir) = create_test_store();
        let fetcher = CachedFetcher::new(store.clone());

        let result = fetcher.fetch("key", failing_loader).await;

        assert!(result.is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sees_external_modification() {
        let (store, _temp_dir) = create_test_store();
        let fetcher = CachedFetcher::new(store.clone());
        let mut cache = CacheMap::new();
        cache.insert("late".to_string(), json!(1));
        store.save(&cache).unwrap();

        let value = fetcher.fetch("late", failing_loader).await.unwrap();

        assert_eq!(value, json!(1));
    }
}
