/// Real-browser implementations of the storage, clock and page seams
mod page;
mod storage;

pub use page::{DomPage, DomTarget};
pub use storage::{BrowserArea, ExtensionArea, LocalStorageArea, has_extension_storage};

use crate::bucket::BucketId;
use crate::repository::Clock;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    fn hasClipboard() -> bool;

    #[wasm_bindgen(catch)]
    async fn copyToClipboard(text: &str) -> Result<(), JsValue>;
}

/// `Date.now()` in milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_millis(&self) -> BucketId {
        js_sys::Date::now() as BucketId
    }
}

/// Resolves after `ms` milliseconds via `setTimeout`, or at once if it can't be scheduled
pub async fn sleep(ms: u32) {
    let delay = timeout_delay(ms);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
            });

        if let Err(e) = scheduled {
            log::warn!("setTimeout failed, not waiting: {:?}", e);
            if let Err(e) = resolve.call0(&JsValue::NULL) {
                log::error!("Failed to resolve timer: {:?}", e);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// `setTimeout` takes an i32; longer delays are clamped
fn timeout_delay(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}
