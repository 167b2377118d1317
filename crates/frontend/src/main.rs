mod components;
mod debounce;
mod dom;
mod geolocation;
mod pages;

use dioxus::prelude::*;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Explorer {},
    #[route("/monuments/:id")]
    Monument { id: String },
}

#[component]
fn Explorer() -> Element {
    rsx! {
        pages::explorer::Explorer {}
    }
}

#[component]
fn Monument(id: String) -> Element {
    rsx! {
        pages::monument::MonumentDetail { id }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info,atlas_shared=debug"));
    tracing_subscriber::registry().with(fmt_layer).init();

    launch(App);
}
