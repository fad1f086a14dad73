/// Presentational pieces shared by the popup and the overlay

use crate::bucket::Bucket;
use yew::prelude::*;

const PREVIEW_CHARS: usize = 120;

/// Shortens content for a card, cutting on a char boundary
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", content[..cut].trim_end()),
        None => content.to_string(),
    }
}

#[derive(Properties, PartialEq)]
pub struct BucketCardProps {
    pub bucket: Bucket,
    #[prop_or_default]
    pub badge: Option<AttrValue>,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(BucketCard)]
pub fn bucket_card(props: &BucketCardProps) -> Html {
    let bucket = &props.bucket;

    html! {
        <div class="bucket-card">
            <div class="bucket-card-header">
                <h3 class="bucket-title">{&bucket.title}</h3>
                if let Some(badge) = &props.badge {
                    <span class="bucket-badge">{"✓ "}{badge.clone()}</span>
                }
                <div class="bucket-actions">
                    {props.children.clone()}
                </div>
            </div>
            <p class="bucket-preview">{preview(&bucket.content, PREVIEW_CHARS)}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyNoticeProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

#[function_component(EmptyNotice)]
pub fn empty_notice(props: &EmptyNoticeProps) -> Html {
    html! {
        <div class="empty-state">
            <span class="empty-state-icon">{"📭"}</span>
            <p>{props.message.clone()}</p>
            if let Some(hint) = &props.hint {
                <p class="empty-state-hint">{hint.clone()}</p>
            }
        </div>
    }
}
