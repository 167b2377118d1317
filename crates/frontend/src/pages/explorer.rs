use atlas_shared::config::MapConfig;
use atlas_shared::geolocation::GeolocationError;
use atlas_shared::models::{FilteredSiteSet, Site};
use atlas_shared::preview::Locale;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;

use crate::components::map_view::MonumentMapView;

const MAP_CONFIG: &str = include_str!("../../assets/map.json");
const SITE_BUNDLE: &str = include_str!("../../assets/sites.json");

/// How long a locate failure stays on screen.
const TOAST_MS: u32 = 4_000;

/// Snapshot of the site catalogue as exported by the data layer.
#[derive(Debug, Deserialize)]
struct SiteBundle {
    sites: Vec<Site>,
}

fn load_config(text: &str) -> MapConfig {
    match MapConfig::from_json(text) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to default map config");
            MapConfig::default()
        }
    }
}

fn load_sites(text: &str) -> FilteredSiteSet {
    match serde_json::from_str::<SiteBundle>(text) {
        Ok(bundle) => {
            tracing::info!(sites = bundle.sites.len(), "site bundle loaded");
            bundle.sites.into_iter().collect()
        }
        Err(e) => {
            tracing::warn!(error = %e, "site bundle unreadable");
            FilteredSiteSet::default()
        }
    }
}

fn locate_message(error: &GeolocationError, locale: Locale) -> &'static str {
    match (locale, error) {
        (Locale::En, GeolocationError::PermissionDenied) => "Location access was denied.",
        (Locale::En, GeolocationError::Timeout) => "Finding your location took too long.",
        (Locale::En, GeolocationError::Unsupported) => "This browser cannot share its location.",
        (Locale::En, GeolocationError::PositionUnavailable) => "Your location is unavailable.",
        (Locale::Ar, GeolocationError::PermissionDenied) => "تم رفض الوصول إلى الموقع.",
        (Locale::Ar, GeolocationError::Timeout) => "استغرق تحديد موقعك وقتًا طويلًا.",
        (Locale::Ar, GeolocationError::Unsupported) => "هذا المتصفح لا يدعم تحديد الموقع.",
        (Locale::Ar, GeolocationError::PositionUnavailable) => "موقعك غير متاح.",
    }
}

/// Bump the toast generation and return the new value. Only the timer
/// holding the latest generation may dismiss the toast.
fn next_generation(generation: &mut u64) -> u64 {
    *generation = generation.wrapping_add(1);
    *generation
}

#[component]
pub fn Explorer() -> Element {
    let config = use_hook(|| load_config(MAP_CONFIG));
    let sites = use_signal(|| load_sites(SITE_BUNDLE));
    let mut locale = use_signal(|| Locale::En);
    let mut toast = use_signal(|| None::<String>);
    let mut toast_generation = use_signal(|| 0u64);

    let cur_locale = *locale.read();
    let on_locate_error = move |error: GeolocationError| {
        toast.set(Some(locate_message(&error, cur_locale).to_string()));
        let shown = next_generation(&mut toast_generation.write());
        spawn(async move {
            TimeoutFuture::new(TOAST_MS).await;
            // A newer message owns the toast now
            if *toast_generation.peek() == shown {
                toast.set(None);
            }
        });
    };

    let (title, switch_label, dir) = match cur_locale {
        Locale::En => ("Monument Map", "العربية", "ltr"),
        Locale::Ar => ("خريطة الآثار", "English", "rtl"),
    };
    let toast_text = toast.read().clone();

    rsx! {
        div { class: "app", dir: "{dir}",
            div { class: "header",
                h1 { "{title}" }
                button {
                    class: "locale-switch",
                    onclick: move |_| {
                        let next = match *locale.read() {
                            Locale::En => Locale::Ar,
                            Locale::Ar => Locale::En,
                        };
                        locale.set(next);
                    },
                    "{switch_label}"
                }
            }

            MonumentMapView {
                config,
                sites,
                locale: cur_locale,
                on_locate_error,
            }

            if let Some(text) = toast_text {
                div { class: "toast", role: "alert", "{text}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        let config = MapConfig::from_json(MAP_CONFIG).unwrap();
        assert_eq!(config.hover_delay_ms, 300);
        assert_eq!(config.fit.max_zoom, 12.0);
    }

    #[test]
    fn test_bundled_sites_are_mappable() {
        let sites = load_sites(SITE_BUNDLE);
        assert!(!sites.is_empty());
        assert!(sites.iter().all(|s| s.location().is_ok()));
    }

    #[test]
    fn test_bad_config_falls_back() {
        assert_eq!(load_config("{ not json"), MapConfig::default());
    }

    #[test]
    fn test_bad_bundle_is_empty() {
        assert!(load_sites(r#"{"sites": 3}"#).is_empty());
    }

    #[test]
    fn test_inverted_zoom_config_falls_back() {
        let config = load_config(r#"{ "minZoom": 8, "maxZoom": 4 }"#);
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn test_only_latest_toast_timer_dismisses() {
        let mut generation = 0;
        let first = next_generation(&mut generation);
        let second = next_generation(&mut generation);
        assert_ne!(first, second);
        assert_ne!(generation, first);
        assert_eq!(generation, second);
    }

    #[test]
    fn test_locate_messages_localized() {
        let en = locate_message(&GeolocationError::Timeout, Locale::En);
        let ar = locate_message(&GeolocationError::Timeout, Locale::Ar);
        assert_ne!(en, ar);
    }
}
