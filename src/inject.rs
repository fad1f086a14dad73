/// Writing bucket content into a chat assistant's prompt box
///
/// Site detection is a substring match on the page hostname against an ordered
/// rule table; the first matching rule decides. When no rule matches, or the
/// rule's target cannot be written, the wrapped text goes to the clipboard.

use crate::error::PageError;
use serde::Serialize;

/// An element the adapter can write into
pub trait InputTarget {
    fn value(&self) -> Result<String, PageError>;

    fn set_value(&self, value: &str) -> Result<(), PageError>;

    fn is_content_editable(&self) -> bool;

    /// Inserts at the caret through the editor's own editing command
    fn insert_text(&self, text: &str) -> Result<(), PageError>;

    /// Raises a bubbling `input` event so the host framework sees the change
    fn notify_input(&self) -> Result<(), PageError>;

    fn focus(&self) -> Result<(), PageError>;
}

/// The ambient page the adapter runs in
pub trait PageContext {
    type Target: InputTarget;

    fn hostname(&self) -> String;

    fn query_selector(&self, selector: &str) -> Option<Self::Target>;

    fn active_element(&self) -> Option<Self::Target>;

    fn write_clipboard(&self, text: &str) -> Result<(), PageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InjectOutcome {
    Injected,
    CopiedToClipboard,
}

impl InjectOutcome {
    pub fn label(self) -> &'static str {
        match self {
            InjectOutcome::Injected => "Injected",
            InjectOutcome::CopiedToClipboard => "Copied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// First element matching the selector
    Selector(&'static str),
    /// The focused content-editable element, provided `anchor` exists on the page
    FocusedEditable { anchor: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Wrapper goes in front of the current value
    Prepend,
    /// Wrapper is typed at the caret
    InsertAtCaret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteRule {
    pub name: &'static str,
    pub host_pattern: &'static str,
    pub locator: Locator,
    pub write: WriteMode,
}

pub const SITE_RULES: &[SiteRule] = &[
    SiteRule {
        name: "ChatGPT",
        host_pattern: "chatgpt.com",
        locator: Locator::Selector("#prompt-textarea"),
        write: WriteMode::Prepend,
    },
    SiteRule {
        name: "Claude",
        host_pattern: "claude.ai",
        locator: Locator::FocusedEditable {
            anchor: "div[contenteditable=\"true\"]",
        },
        write: WriteMode::InsertAtCaret,
    },
    SiteRule {
        name: "Perplexity",
        host_pattern: "perplexity.ai",
        locator: Locator::Selector("textarea"),
        write: WriteMode::Prepend,
    },
];

/// `[System Context: <content>]` followed by a blank line
pub fn wrap_context(content: &str) -> String {
    format!("[System Context: {}]\n\n", content)
}

pub fn match_site<'a>(hostname: &str, rules: &'a [SiteRule]) -> Option<&'a SiteRule> {
    rules.iter().find(|rule| hostname.contains(rule.host_pattern))
}

pub fn inject<P: PageContext>(page: &P, content: &str) -> Result<InjectOutcome, PageError> {
    inject_with_rules(page, SITE_RULES, content)
}

/// Injects into the first matching site, else copies to the clipboard
///
/// Only a failed clipboard write is returned as an error.
pub fn inject_with_rules<P: PageContext>(
    page: &P,
    rules: &[SiteRule],
    content: &str,
) -> Result<InjectOutcome, PageError> {
    let wrapped = wrap_context(content);
    let hostname = page.hostname();

    if let Some(rule) = match_site(&hostname, rules) {
        match locate(page, rule.locator) {
            Some(target) => match write(&target, rule.write, &wrapped) {
                Ok(()) => {
                    log::debug!("Injected context into {} ({})", rule.name, hostname);
                    return Ok(InjectOutcome::Injected);
                }
                Err(e) => log::debug!("{} target rejected write: {}", rule.name, e),
            },
            None => log::debug!("No {} input found on {}", rule.name, hostname),
        }
    } else {
        log::debug!("No site rule for {}", hostname);
    }

    page.write_clipboard(&wrapped)?;
    Ok(InjectOutcome::CopiedToClipboard)
}

fn locate<P: PageContext>(page: &P, locator: Locator) -> Option<P::Target> {
    match locator {
        Locator::Selector(selector) => page.query_selector(selector),
        Locator::FocusedEditable { anchor } => {
            page.query_selector(anchor)?;
            page.active_element().filter(|el| el.is_content_editable())
        }
    }
}

fn write<T: InputTarget>(target: &T, mode: WriteMode, wrapped: &str) -> Result<(), PageError> {
    match mode {
        WriteMode::Prepend => {
            let current = target.value()?;
            target.set_value(&format!("{}{}", wrapped, current))?;
            // value is already written; a lost event or focus is not worth a clipboard copy
            if let Err(e) = target.notify_input() {
                log::warn!("Input notification failed: {}", e);
            }
            if let Err(e) = target.focus() {
                log::warn!("Focus failed: {}", e);
            }
            Ok(())
        }
        WriteMode::InsertAtCaret => target.insert_text(wrapped),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct FakeElement {
        pub value: RefCell<String>,
        pub editable: bool,
        pub content_editable: bool,
        pub input_events: Cell<usize>,
        pub focused: Cell<bool>,
        pub inserted: RefCell<Vec<String>>,
    }

    impl FakeElement {
        pub fn textarea(value: &str) -> Rc<Self> {
            Rc::new(FakeElement {
                value: RefCell::new(value.to_string()),
                editable: true,
                ..Default::default()
            })
        }

        pub fn rich_editor() -> Rc<Self> {
            Rc::new(FakeElement {
                editable: true,
                content_editable: true,
                ..Default::default()
            })
        }

        pub fn button() -> Rc<Self> {
            Rc::new(FakeElement::default())
        }
    }

    #[derive(Debug, Clone)]
    pub struct FakeTarget(pub Rc<FakeElement>);

    impl InputTarget for FakeTarget {
        fn value(&self) -> Result<String, PageError> {
            if !self.0.editable {
                return Err(PageError::NotEditable);
            }
            Ok(self.0.value.borrow().clone())
        }

        fn set_value(&self, value: &str) -> Result<(), PageError> {
            if !self.0.editable {
                return Err(PageError::NotEditable);
            }
            *self.0.value.borrow_mut() = value.to_string();
            Ok(())
        }

        fn is_content_editable(&self) -> bool {
            self.0.content_editable
        }

        fn insert_text(&self, text: &str) -> Result<(), PageError> {
            if !self.0.content_editable {
                return Err(PageError::NotEditable);
            }
            self.0.inserted.borrow_mut().push(text.to_string());
            self.0.value.borrow_mut().push_str(text);
            Ok(())
        }

        fn notify_input(&self) -> Result<(), PageError> {
            self.0.input_events.set(self.0.input_events.get() + 1);
            Ok(())
        }

        fn focus(&self) -> Result<(), PageError> {
            self.0.focused.set(true);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct FakePage {
        pub hostname: String,
        pub elements: HashMap<String, Rc<FakeElement>>,
        pub active: Option<Rc<FakeElement>>,
        pub clipboard: RefCell<Option<String>>,
        pub clipboard_broken: bool,
    }

    impl FakePage {
        pub fn on(hostname: &str) -> Self {
            FakePage {
                hostname: hostname.to_string(),
                ..Default::default()
            }
        }

        pub fn with(mut self, selector: &str, element: Rc<FakeElement>) -> Self {
            self.elements.insert(selector.to_string(), element);
            self
        }

        pub fn focused(mut self, element: Rc<FakeElement>) -> Self {
            self.active = Some(element);
            self
        }
    }

    impl PageContext for FakePage {
        type Target = FakeTarget;

        fn hostname(&self) -> String {
            self.hostname.clone()
        }

        fn query_selector(&self, selector: &str) -> Option<FakeTarget> {
            self.elements.get(selector).cloned().map(FakeTarget)
        }

        fn active_element(&self) -> Option<FakeTarget> {
            self.active.clone().map(FakeTarget)
        }

        fn write_clipboard(&self, text: &str) -> Result<(), PageError> {
            if self.clipboard_broken {
                return Err(PageError::ClipboardUnavailable {
                    message: "permission denied".to_string(),
                });
            }
            *self.clipboard.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }
}
