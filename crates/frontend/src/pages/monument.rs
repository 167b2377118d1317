use dioxus::prelude::*;

use crate::Route;

/// Landing point for marker clicks. The full detail page lives with the
/// catalogue screens; this shows which monument was chosen.
#[component]
pub fn MonumentDetail(id: String) -> Element {
    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "{id}" }
                Link { to: Route::Explorer {}, "Back to map" }
            }
        }
    }
}
