/// Floating overlay embedded into chat assistant pages

use crate::browser::{BrowserArea, DomPage, sleep};
use crate::bucket::{Bucket, BucketId};
use crate::config::FlowConfig;
use crate::error::PageError;
use crate::inject::{InjectOutcome, inject};
use crate::ui::components::{BucketCard, EmptyNotice};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub const OVERLAY_ROOT_ID: &str = "flowai-overlay-root";

/// Appends the overlay root to the page body once; later calls are ignored
pub fn mount(config: FlowConfig) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document to mount the overlay into");
        return;
    };

    if document.get_element_by_id(OVERLAY_ROOT_ID).is_some() {
        log::debug!("Overlay already mounted");
        return;
    }

    let root = match document.create_element("div") {
        Ok(root) => root,
        Err(e) => {
            log::error!("Failed to create overlay root: {:?}", e);
            return;
        }
    };
    root.set_id(OVERLAY_ROOT_ID);

    let Some(body) = document.body() else {
        log::warn!("Page has no body, overlay not mounted");
        return;
    };
    if let Err(e) = body.append_child(&root) {
        log::error!("Failed to attach overlay root: {:?}", e);
        return;
    }

    yew::Renderer::<Overlay>::with_root_and_props(root, OverlayProps { config }).render();
    log::info!("FlowAI Bridge: injected successfully.");
}

/// Tags delayed UI actions so a stale timer can tell it was superseded
#[derive(Debug, Default)]
pub struct Generation(u32);

impl Generation {
    pub fn bump(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub fn is_current(&self, tag: u32) -> bool {
        self.0 == tag
    }
}

#[derive(Properties, PartialEq)]
pub struct OverlayProps {
    pub config: FlowConfig,
}

#[function_component(Overlay)]
pub fn overlay(props: &OverlayProps) -> Html {
    let is_open = use_state(|| false);
    let buckets = use_state(Vec::<Bucket>::new);
    let feedback = use_state(|| None::<(BucketId, InjectOutcome)>);
    let feedback_generation = use_mut_ref(Generation::default);
    // Any open/close or newer injection cancels a pending auto-close
    let close_generation = use_mut_ref(Generation::default);
    let area = use_memo((), |_| BrowserArea::detect());

    // Reload buckets every time the panel opens
    {
        let buckets = buckets.clone();
        let area = *area;
        let config = props.config.clone();

        use_effect_with(*is_open, move |open| {
            if *open {
                spawn_local(async move {
                    let service = config.storage_service(area);
                    buckets.set(service.load().await);
                });
            }
            || ()
        });
    }

    let on_toggle = {
        let is_open = is_open.clone();
        let close_generation = close_generation.clone();
        Callback::from(move |_| {
            close_generation.borrow_mut().bump();
            is_open.set(!*is_open);
        })
    };

    let on_close = {
        let is_open = is_open.clone();
        let close_generation = close_generation.clone();
        Callback::from(move |_| {
            close_generation.borrow_mut().bump();
            is_open.set(false);
        })
    };

    // Keep focus in the host page's editor while clicking the overlay
    let on_mousedown = Callback::from(|e: MouseEvent| e.prevent_default());

    let on_inject = {
        let is_open = is_open.clone();
        let feedback = feedback.clone();
        let feedback_generation = feedback_generation.clone();
        let close_generation = close_generation.clone();
        let feedback_ms = props.config.feedback_ms;
        let auto_close_ms = props.config.auto_close_ms;

        Callback::from(move |bucket: Bucket| {
            let result = match DomPage::current() {
                Some(page) => inject(&page, &bucket.content),
                None => Err(PageError::Dom {
                    message: "no document".to_string(),
                }),
            };

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Injection failed: {}", e);
                    return;
                }
            };

            feedback.set(Some((bucket.id, outcome)));
            let generation = feedback_generation.borrow_mut().bump();

            {
                let feedback = feedback.clone();
                let feedback_generation = feedback_generation.clone();
                spawn_local(async move {
                    sleep(feedback_ms).await;
                    if feedback_generation.borrow().is_current(generation) {
                        feedback.set(None);
                    }
                });
            }

            if let Some(delay) = auto_close_ms {
                let is_open = is_open.clone();
                let close_generation = close_generation.clone();
                let tag = close_generation.borrow_mut().bump();
                spawn_local(async move {
                    sleep(delay).await;
                    if close_generation.borrow().is_current(tag) {
                        is_open.set(false);
                    }
                });
            }
        })
    };

    html! {
        <div class="flowai-overlay">
            if *is_open {
                <div class="flowai-panel">
                    <div class="flowai-panel-header">
                        <span class="flowai-panel-title">{"FlowAI Memory"}</span>
                        <button class="flowai-close" onclick={on_close}>{"✕"}</button>
                    </div>

                    <div class="flowai-bucket-list">
                        if buckets.is_empty() {
                            <EmptyNotice
                                message="No contexts found"
                                hint={Some(AttrValue::from("Open the FlowAI extension icon to create your first bucket."))}
                            />
                        } else {
                            {for buckets.iter().map(|bucket| {
                                let badge = (*feedback)
                                    .filter(|(id, _)| *id == bucket.id)
                                    .map(|(_, outcome)| AttrValue::from(outcome.label()));
                                let clicked = bucket.clone();

                                html! {
                                    <button
                                        key={bucket.id.to_string()}
                                        class="flowai-bucket"
                                        onmousedown={on_mousedown.clone()}
                                        onclick={on_inject.reform(move |_| clicked.clone())}
                                    >
                                        <BucketCard bucket={bucket.clone()} badge={badge} />
                                    </button>
                                }
                            })}
                        }
                    </div>
                </div>
            }

            <button class="flowai-toggle" onclick={on_toggle} title="FlowAI Memory">
                {"🗂️"}
            </button>
        </div>
    }
}
