/// Live DOM page context for the injection adapter

use super::{copyToClipboard, hasClipboard};
use crate::error::PageError;
use crate::inject::{InputTarget, PageContext};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Event, EventInit, HtmlDocument, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    Window,
};

pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(DomPage { window, document })
    }
}

impl PageContext for DomPage {
    type Target = DomTarget;

    fn hostname(&self) -> String {
        self.window.location().hostname().unwrap_or_default()
    }

    fn query_selector(&self, selector: &str) -> Option<DomTarget> {
        match self.document.query_selector(selector) {
            Ok(found) => found.and_then(DomTarget::from_element),
            Err(e) => {
                log::debug!("Selector {} failed: {:?}", selector, e);
                None
            }
        }
    }

    fn active_element(&self) -> Option<DomTarget> {
        self.document
            .active_element()
            .and_then(DomTarget::from_element)
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PageError> {
        if !hasClipboard() {
            return Err(PageError::ClipboardUnavailable {
                message: "navigator.clipboard is missing".to_string(),
            });
        }

        let text = text.to_string();
        spawn_local(async move {
            if let Err(e) = copyToClipboard(&text).await {
                log::error!("Clipboard write failed: {:?}", e);
            }
        });
        Ok(())
    }
}

pub struct DomTarget(HtmlElement);

impl DomTarget {
    fn from_element(element: web_sys::Element) -> Option<Self> {
        element.dyn_into::<HtmlElement>().ok().map(DomTarget)
    }
}

impl InputTarget for DomTarget {
    fn value(&self) -> Result<String, PageError> {
        if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            Ok(textarea.value())
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            Ok(input.value())
        } else if self.0.is_content_editable() {
            Ok(self.0.inner_text())
        } else {
            Err(PageError::NotEditable)
        }
    }

    fn set_value(&self, value: &str) -> Result<(), PageError> {
        if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if self.0.is_content_editable() {
            self.0.set_inner_text(value);
        } else {
            return Err(PageError::NotEditable);
        }
        Ok(())
    }

    fn is_content_editable(&self) -> bool {
        self.0.is_content_editable()
    }

    fn insert_text(&self, text: &str) -> Result<(), PageError> {
        let document = self
            .0
            .owner_document()
            .and_then(|doc| doc.dyn_into::<HtmlDocument>().ok())
            .ok_or(PageError::NotEditable)?;

        let inserted = document
            .exec_command_with_show_ui_and_value("insertText", false, text)
            .map_err(dom_error)?;
        if inserted {
            Ok(())
        } else {
            Err(PageError::Dom {
                message: "insertText was rejected".to_string(),
            })
        }
    }

    fn notify_input(&self) -> Result<(), PageError> {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict("input", &init).map_err(dom_error)?;
        self.0.dispatch_event(&event).map(|_| ()).map_err(dom_error)
    }

    fn focus(&self) -> Result<(), PageError> {
        self.0.focus().map_err(dom_error)
    }
}

fn dom_error(e: JsValue) -> PageError {
    PageError::Dom {
        message: format!("{:?}", e),
    }
}
