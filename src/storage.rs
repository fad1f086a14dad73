/// Bucket persistence over a pluggable key-value area

use crate::bucket::Bucket;
use crate::error::{DecodeSnafu, EncodeSnafu, StorageError};
use serde_json::Value;
use snafu::ResultExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Slot holding the whole bucket collection
pub const STORAGE_KEY: &str = "flowai_buckets";

/// A persistent key-value area holding JSON values
///
/// Implementations may complete synchronously; callers always await.
#[allow(async_fn_in_trait)]
pub trait StorageArea {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn write(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Loads and saves the bucket collection as a single unit
#[derive(Debug, Clone)]
pub struct StorageService<A> {
    area: A,
    key: String,
}

impl<A: StorageArea> StorageService<A> {
    pub fn new(area: A) -> Self {
        Self::with_key(area, STORAGE_KEY)
    }

    pub fn with_key(area: A, key: impl Into<String>) -> Self {
        StorageService {
            area,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn area(&self) -> &A {
        &self.area
    }

    /// Reads the collection; missing or corrupt data becomes an empty list
    pub async fn load(&self) -> Vec<Bucket> {
        match self.try_load().await {
            Ok(buckets) => buckets,
            Err(e) => {
                log::warn!("Failed to load buckets: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Vec<Bucket>, StorageError> {
        match self.area.read(&self.key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).context(DecodeSnafu {
                key: self.key.clone(),
            }),
        }
    }

    /// Replaces the persisted collection with `buckets`
    pub async fn save(&self, buckets: &[Bucket]) -> Result<(), StorageError> {
        let value = serde_json::to_value(buckets).context(EncodeSnafu)?;
        self.area.write(&self.key, value).await
    }
}

/// In-process area; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryArea {
    slots: Rc<RefCell<HashMap<String, Value>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail until switched off again
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Plants a raw value, bypassing bucket encoding
    pub fn put_raw(&self, key: &str, value: Value) {
        self.slots.borrow_mut().insert(key.to_string(), value);
    }

    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.slots.borrow().get(key).cloned()
    }
}

impl StorageArea for MemoryArea {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.get_raw(key))
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "memory area is read-only".to_string(),
            });
        }
        self.put_raw(key, value);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::block_on;
    use super::*;
    use serde_json::json;

    fn sample_buckets() -> Vec<Bucket> {
        vec![
            Bucket::new(1, "Japan Trip".to_string(), "Vegetarian, budget $3k".to_string()),
            Bucket::new(2, "Stack".to_string(), "Rust + WASM".to_string()),
        ]
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let service = StorageService::new(MemoryArea::new());
        assert!(block_on(service.load()).is_empty());
        assert!(block_on(service.try_load()).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let service = StorageService::new(MemoryArea::new());
        block_on(service.save(&sample_buckets())).unwrap();

        assert_eq!(block_on(service.load()), sample_buckets());
    }

    #[test]
    fn test_persisted_layout() {
        let area = MemoryArea::new();
        let service = StorageService::new(area.clone());
        block_on(service.save(&sample_buckets()[..1])).unwrap();

        assert_eq!(
            area.get_raw("flowai_buckets"),
            Some(json!([{"id": 1, "title": "Japan Trip", "content": "Vegetarian, budget $3k"}]))
        );
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let area = MemoryArea::new();
        area.put_raw(STORAGE_KEY, json!({"not": "a list"}));
        let service = StorageService::new(area);

        assert!(matches!(
            block_on(service.try_load()),
            Err(StorageError::Decode { .. })
        ));
        assert!(block_on(service.load()).is_empty());
    }

    #[test]
    fn test_null_value_loads_empty() {
        let area = MemoryArea::new();
        area.put_raw(STORAGE_KEY, Value::Null);
        let service = StorageService::new(area);

        assert!(block_on(service.try_load()).unwrap().is_empty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let area = MemoryArea::new();
        area.set_fail_writes(true);
        let service = StorageService::new(area.clone());

        let result = block_on(service.save(&sample_buckets()));

        assert!(matches!(result, Err(StorageError::Write { .. })));
        assert_eq!(area.get_raw(STORAGE_KEY), None);
    }

    #[test]
    fn test_save_of_load_is_idempotent() {
        let area = MemoryArea::new();
        let service = StorageService::new(area.clone());
        block_on(service.save(&sample_buckets())).unwrap();
        let before = area.get_raw(STORAGE_KEY);

        let loaded = block_on(service.load());
        block_on(service.save(&loaded)).unwrap();

        assert_eq!(area.get_raw(STORAGE_KEY), before);
        assert_eq!(block_on(service.load()), loaded);
    }

    #[test]
    fn test_custom_key() {
        let area = MemoryArea::new();
        let service = StorageService::with_key(area.clone(), "dev_buckets");
        block_on(service.save(&sample_buckets())).unwrap();

        assert!(area.get_raw(STORAGE_KEY).is_none());
        assert!(area.get_raw("dev_buckets").is_some());
        assert_eq!(service.key(), "dev_buckets");
    }
}
