/// chrome.storage.local and window.localStorage backends

use super::{getStorage, setStorage};
use crate::error::{DecodeSnafu, EncodeSnafu, StorageError};
use crate::storage::StorageArea;
use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;
use wasm_bindgen::JsValue;

/// True when `chrome.storage.local` exists, i.e. we run as a packaged extension
pub fn has_extension_storage() -> bool {
    ["chrome", "storage", "local"]
        .iter()
        .try_fold(JsValue::from(js_sys::global()), |obj, name| {
            let next = js_sys::Reflect::get(&obj, &JsValue::from_str(name)).ok()?;
            if next.is_undefined() || next.is_null() {
                None
            } else {
                Some(next)
            }
        })
        .is_some()
}

/// Extension-scoped area; stores structured values
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionArea;

impl StorageArea for ExtensionArea {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value_js = getStorage(key).await.map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("{:?}", e),
        })?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: format!("Failed to parse storage: {:?}", e),
            })
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let value_js = value.serialize(&serializer).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("Failed to serialize storage: {:?}", e),
        })?;

        setStorage(key, value_js)
            .await
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// Page-local fallback; values are JSON strings
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageArea;

impl LocalStorageArea {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable {
                message: "no window".to_string(),
            })?
            .local_storage()
            .map_err(|e| StorageError::Unavailable {
                message: format!("{:?}", e),
            })?
            .ok_or_else(|| StorageError::Unavailable {
                message: "localStorage disabled".to_string(),
            })
    }
}

impl StorageArea for LocalStorageArea {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let stored = self.storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("{:?}", e),
        })?;

        match stored {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .context(DecodeSnafu { key }),
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(&value).context(EncodeSnafu)?;
        self.storage()?
            .set_item(key, &text)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// Backend chosen once at startup by probing the runtime
#[derive(Debug, Clone, Copy)]
pub enum BrowserArea {
    Extension(ExtensionArea),
    Local(LocalStorageArea),
}

impl BrowserArea {
    pub fn detect() -> Self {
        if has_extension_storage() {
            log::info!("Using chrome.storage.local");
            BrowserArea::Extension(ExtensionArea)
        } else {
            log::info!("chrome.storage unavailable, using localStorage");
            BrowserArea::Local(LocalStorageArea)
        }
    }
}

impl StorageArea for BrowserArea {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self {
            BrowserArea::Extension(area) => area.read(key).await,
            BrowserArea::Local(area) => area.read(key).await,
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        match self {
            BrowserArea::Extension(area) => area.write(key, value).await,
            BrowserArea::Local(area) => area.write(key, value).await,
        }
    }
}
