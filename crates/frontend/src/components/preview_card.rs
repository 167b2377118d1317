use atlas_shared::preview::PreviewCard;
use dioxus::prelude::*;

/// Hover preview, bottom-center anchored above the hovered pin.
#[component]
pub fn PreviewCardView(card: PreviewCard) -> Element {
    let left = card.anchor.x;
    let bottom = card.anchor.y - card.offset_y;

    rsx! {
        div {
            class: "preview-card",
            style: "left:{left}px;top:{bottom}px;",

            if !card.thumbnail_url.is_empty() {
                img {
                    class: "preview-thumb",
                    src: "{card.thumbnail_url}",
                    alt: "{card.title}",
                }
            }
            div { class: "preview-body",
                h3 { class: "preview-title", "{card.title}" }
                span {
                    class: "preview-badge",
                    style: "background:{card.badge.color};",
                    "{card.badge.label}"
                }
                p { class: "preview-dates", "{card.date_range}" }
            }
        }
    }
}
