/// Runtime configuration handed over from the JS loader
use crate::storage::{STORAGE_KEY, StorageArea, StorageService};
use serde::Deserialize;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowConfig {
    pub storage_key: String,
    /// How long the per-bucket success badge stays up
    pub feedback_ms: u32,
    /// Overlay closes this long after an injection; `None` keeps it open
    pub auto_close_ms: Option<u32>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            storage_key: STORAGE_KEY.to_string(),
            feedback_ms: 2000,
            auto_close_ms: Some(800),
        }
    }
}

impl FlowConfig {
    /// Both surfaces open storage through here so they share one slot
    pub fn storage_service<A: StorageArea>(&self, area: A) -> StorageService<A> {
        StorageService::with_key(area, self.storage_key.clone())
    }

    /// Reads a plain JS object; `undefined`/`null` or garbage yields the defaults
    pub fn from_js(value: JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            log::warn!("Invalid config, using defaults: {}", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlowConfig::default();
        assert_eq!(config.storage_key, "flowai_buckets");
        assert_eq!(config.feedback_ms, 2000);
        assert_eq!(config.auto_close_ms, Some(800));
    }

    #[test]
    fn test_partial_object_fills_defaults() {
        let config: FlowConfig = serde_json::from_str(r#"{"feedbackMs": 500}"#).unwrap();
        assert_eq!(config.feedback_ms, 500);
        assert_eq!(config.storage_key, "flowai_buckets");
        assert_eq!(config.auto_close_ms, Some(800));
    }

    #[test]
    fn test_storage_service_uses_configured_key() {
        use crate::bucket::Bucket;
        use crate::storage::MemoryArea;
        use crate::storage::test_support::block_on;

        let area = MemoryArea::new();
        let config: FlowConfig = serde_json::from_str(r#"{"storageKey": "dev"}"#).unwrap();
        let popup_side = config.storage_service(area.clone());
        let overlay_side = config.storage_service(area.clone());

        let buckets = vec![Bucket::new(1, "Trip".to_string(), "Vegetarian".to_string())];
        block_on(popup_side.save(&buckets)).unwrap();

        assert_eq!(popup_side.key(), "dev");
        assert_eq!(block_on(overlay_side.load()), buckets);
        assert!(area.get_raw(STORAGE_KEY).is_none());
    }

    #[test]
    fn test_null_disables_auto_close() {
        let config: FlowConfig =
            serde_json::from_str(r#"{"autoCloseMs": null, "storageKey": "dev"}"#).unwrap();
        assert_eq!(config.auto_close_ms, None);
        assert_eq!(config.storage_key, "dev");
    }
}
