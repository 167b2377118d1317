use dioxus::prelude::*;

/// "Find my location". Stays enabled while a query is pending; repeated
/// presses issue independent queries.
#[component]
pub fn LocateButton(busy: bool, onlocate: EventHandler<()>) -> Element {
    rsx! {
        button {
            class: if busy { "locate-button busy" } else { "locate-button" },
            title: "Find my location",
            // Keep the press from starting a map drag
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                onlocate.call(());
            },
            "◎"
        }
    }
}
