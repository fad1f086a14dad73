/// Popup UI: list, create and delete buckets

use crate::browser::{BrowserArea, BrowserClock};
use crate::bucket::{Bucket, BucketId};
use crate::config::FlowConfig;
use crate::repository::BucketRepository;
use crate::ui::components::{BucketCard, EmptyNotice};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

type BrowserRepository = BucketRepository<BrowserArea, BrowserClock>;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Ready,
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct PopupProps {
    pub config: FlowConfig,
}

#[function_component(App)]
pub fn app(props: &PopupProps) -> Html {
    let state = use_state(|| PopupState::Loading);
    // Mutated in place so a click never works on a stale copy
    let repo = use_mut_ref(|| None::<BrowserRepository>);
    let buckets = use_state(Vec::<Bucket>::new);
    let is_adding = use_state(|| false);
    let title = use_state(String::new);
    let content = use_state(String::new);

    // Open the repository on mount
    {
        let state = state.clone();
        let repo = repo.clone();
        let buckets = buckets.clone();
        let config = props.config.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let service = config.storage_service(BrowserArea::detect());
                let opened = BucketRepository::open(service, BrowserClock).await;
                buckets.set(opened.buckets().to_vec());
                *repo.borrow_mut() = Some(opened);
                state.set(PopupState::Ready);
            });
            || ()
        });
    }

    let on_toggle_add = {
        let is_adding = is_adding.clone();
        Callback::from(move |_| {
            is_adding.set(!*is_adding);
        })
    };

    let on_title_input = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                title.set(input.value());
            }
        })
    };

    let on_content_input = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                content.set(textarea.value());
            }
        })
    };

    // Create bucket handler
    let on_create = {
        let state = state.clone();
        let repo = repo.clone();
        let buckets = buckets.clone();
        let is_adding = is_adding.clone();
        let title = title.clone();
        let content = content.clone();

        Callback::from(move |_| {
            if title.is_empty() || content.is_empty() {
                return;
            }

            let staged = match repo.borrow_mut().as_mut() {
                Some(current) => current
                    .stage_add((*title).clone(), (*content).clone())
                    .map(|(bucket, save)| (bucket, save, current.buckets().to_vec())),
                None => return,
            };

            match staged {
                Ok((bucket, save, list)) => {
                    log::info!("Created bucket {}", bucket.id);
                    buckets.set(list);
                    title.set(String::new());
                    content.set(String::new());
                    is_adding.set(false);
                    state.set(PopupState::Ready);
                    spawn_local(save.run());
                }
                Err(e) => {
                    state.set(PopupState::Error(format!("Could not create bucket: {}", e)));
                }
            }
        })
    };

    // Delete bucket handler
    let on_delete = {
        let repo = repo.clone();
        let buckets = buckets.clone();

        Callback::from(move |id: BucketId| {
            let staged = repo
                .borrow_mut()
                .as_mut()
                .and_then(|current| current.stage_delete(id));

            if let Some(save) = staged {
                buckets.set(save.snapshot().to_vec());
                spawn_local(save.run());
            }
        })
    };

    let can_create = !title.is_empty() && !content.is_empty();

    if *state == PopupState::Loading {
        return html! {
            <div class="popup loading-text-center">
                <Spinner />
                <p class="loading-text">{"Loading Context..."}</p>
            </div>
        };
    }

    html! {
        <div class="popup">
            <header class="popup-header">
                <h1 class="popup-title">{"FlowAI"}</h1>
                <Button onclick={on_toggle_add} variant={ButtonVariant::Plain}>
                    {if *is_adding { "✕" } else { "+" }}
                </Button>
            </header>

            if let PopupState::Error(err) = &*state {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err.clone()}
                </Alert>
            }

            <main class="popup-main">
                if *is_adding {
                    <div class="bucket-form">
                        <input
                            type="text"
                            class="bucket-form-title"
                            placeholder="Bucket Name (e.g., Japan Trip)"
                            value={(*title).clone()}
                            oninput={on_title_input}
                        />
                        <textarea
                            class="bucket-form-content"
                            placeholder="Context dumping ground... (e.g., Vegetarian, Budget $3k)"
                            value={(*content).clone()}
                            oninput={on_content_input}
                        />
                        <Button onclick={on_create} disabled={!can_create} variant={ButtonVariant::Primary} block={true}>
                            {"✓ Create Bucket"}
                        </Button>
                    </div>
                }

                if buckets.is_empty() && !*is_adding {
                    <EmptyNotice
                        message="No buckets found."
                        hint={Some(AttrValue::from("Click + to add your first context."))}
                    />
                }

                {for buckets.iter().map(|bucket| {
                    let id = bucket.id;
                    html! {
                        <BucketCard key={bucket.id.to_string()} bucket={bucket.clone()}>
                            <Button
                                onclick={on_delete.reform(move |_| id)}
                                variant={ButtonVariant::Danger}
                            >
                                {"🗑️"}
                            </Button>
                        </BucketCard>
                    }
                })}
            </main>

            <p class="footer-popup">
                {format!("{} buckets • FlowAI v{}", buckets.len(), env!("CARGO_PKG_VERSION"))}
            </p>
        </div>
    }
}
