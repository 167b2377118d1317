use std::cell::RefCell;
use std::rc::Rc;

use atlas_shared::config::MapConfig;
use atlas_shared::explorer::MonumentMap;
use atlas_shared::geolocation::{GeolocationError, LocateOutcome};
use atlas_shared::layer::MarkerStyle;
use atlas_shared::models::FilteredSiteSet;
use atlas_shared::pointer::TimerCommand;
use atlas_shared::preview::Locale;
use atlas_shared::surface::HostContainer;
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::components::locate_button::LocateButton;
use crate::components::preview_card::PreviewCardView;
use crate::debounce::HoverDebounce;
use crate::dom::{self, DomContainer};
use crate::geolocation;
use crate::Route;

const MAP_CONTAINER_ID: &str = "monument-map-container";

/// Drag threshold in pixels; movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Zoom levels per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 0.5;

const FRAME_INTERVAL_MS: u32 = 16;

type Engine = Rc<RefCell<MonumentMap>>;
type Debounce = Rc<RefCell<HoverDebounce>>;

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Scrolling up zooms in.
fn wheel_zoom_delta(delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        WHEEL_ZOOM_STEP
    } else if delta_y > 0.0 {
        -WHEEL_ZOOM_STEP
    } else {
        0.0
    }
}

fn exceeds_threshold(start: (f64, f64), current: (f64, f64), threshold: f64) -> bool {
    (current.0 - start.0).abs() > threshold || (current.1 - start.1).abs() > threshold
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Request a re-render. Quietly does nothing once the component is gone.
fn bump(mut revision: Signal<u64>) {
    if let Ok(mut r) = revision.try_write() {
        *r += 1;
    }
}

fn hovered_id(engine: &Engine) -> Option<String> {
    engine.borrow().hover().map(|h| h.site_id.clone())
}

fn run_timers(engine: &Engine, debounce: &Debounce, revision: Signal<u64>, commands: Vec<TimerCommand>) {
    if commands.is_empty() {
        return;
    }
    let engine = engine.clone();
    debounce.borrow_mut().apply(commands, move |token| {
        let activated = engine.borrow_mut().hover_elapsed(token);
        if activated {
            bump(revision);
        }
    });
}

fn click_at(engine: &Engine, client: (f64, f64)) {
    if let Some(point) = dom::container_point(MAP_CONTAINER_ID, client.0, client.1) {
        engine.borrow_mut().click(point);
    }
}

#[component]
pub fn MonumentMapView(
    config: MapConfig,
    sites: ReadSignal<FilteredSiteSet>,
    locale: Locale,
    on_locate_error: EventHandler<GeolocationError>,
) -> Element {
    let nav = navigator();

    // One engine per component instance, kept across renders
    let engine: Engine = use_hook(|| {
        Rc::new(RefCell::new(MonumentMap::new(config.clone(), move |id: &str| {
            nav.push(Route::Monument { id: id.to_string() });
        })))
    });
    let debounce: Debounce = use_hook(|| Rc::new(RefCell::new(HoverDebounce::new())));
    let revision = use_signal(|| 0u64);
    let mut locating = use_signal(|| 0usize);

    // Drag state (mouse)
    let mut drag_start = use_signal(|| None::<(f64, f64)>);
    let mut drag_last = use_signal(|| (0.0_f64, 0.0_f64));
    let mut did_drag = use_signal(|| false);

    // Touch state
    let mut touch_start = use_signal(|| None::<(f64, f64)>);
    let mut touch_last = use_signal(|| (0.0_f64, 0.0_f64));
    let mut touch_did_pan = use_signal(|| false);

    let engine_sites = engine.clone();
    let debounce_sites = debounce.clone();
    use_effect(move || {
        let snapshot = sites.read().clone();
        let commands = engine_sites.borrow_mut().set_sites(snapshot);
        run_timers(&engine_sites, &debounce_sites, revision, commands);
        bump(revision);
    });

    let engine_tick = engine.clone();
    use_future(move || {
        let engine = engine_tick.clone();
        async move {
            loop {
                TimeoutFuture::new(FRAME_INTERVAL_MS).await;
                let changed = engine.borrow_mut().tick(now_ms());
                if changed {
                    bump(revision);
                }
            }
        }
    });

    let engine_drop = engine.clone();
    let debounce_drop = debounce.clone();
    use_drop(move || {
        debounce_drop.borrow_mut().cancel_all();
        engine_drop.borrow_mut().unmount();
    });

    let engine_mount = engine.clone();
    let engine_move = engine.clone();
    let debounce_move = debounce.clone();
    let engine_up = engine.clone();
    let engine_leave = engine.clone();
    let debounce_leave = debounce.clone();
    let engine_wheel = engine.clone();
    let engine_touch_move = engine.clone();
    let engine_touch_end = engine.clone();
    let engine_locate = engine.clone();

    let on_locate = move |_: ()| {
        let request = engine_locate.borrow_mut().locate();
        *locating.write() += 1;
        let engine = engine_locate.clone();
        geolocation::request_position(request, move |id, result| {
            if let Ok(mut n) = locating.try_write() {
                *n = n.saturating_sub(1);
            }
            let outcome = engine.borrow_mut().location_resolved(id, result);
            match outcome {
                LocateOutcome::Placed(_) => bump(revision),
                LocateOutcome::Failed(e) => on_locate_error.call(e),
                LocateOutcome::Discarded => {}
            }
        });
    };

    // Subscribe this render to engine changes
    let _revision = *revision.read();
    let (frame, preview) = {
        let map = engine.borrow();
        (map.frame(), map.preview(locale))
    };
    let busy = *locating.read() > 0;

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "map-container",

            onmounted: move |_| {
                let container = DomContainer::by_id(MAP_CONTAINER_ID, move || bump(revision));
                let mounted = engine_mount
                    .borrow_mut()
                    .mount(container.as_ref().map(|c| c as &dyn HostContainer));
                if mounted {
                    bump(revision);
                } else {
                    tracing::debug!("map view mounted without a new surface");
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta = wheel_zoom_delta(wheel_delta_y(evt.data().delta()));
                if delta == 0.0 {
                    return;
                }
                let client = evt.data().client_coordinates();
                let Some(point) = dom::container_point(MAP_CONTAINER_ID, client.x, client.y) else {
                    return;
                };
                engine_wheel.borrow_mut().zoom_at(point, delta);
                bump(revision);
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                drag_start.set(Some((client.x, client.y)));
                drag_last.set((client.x, client.y));
                did_drag.set(false);
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let current = (client.x, client.y);

                let start = *drag_start.read();
                if let Some(start) = start {
                    if !*did_drag.read() && exceeds_threshold(start, current, DRAG_THRESHOLD) {
                        did_drag.set(true);
                    }
                    if *did_drag.read() {
                        let last = *drag_last.read();
                        engine_move.borrow_mut().pan_by(current.0 - last.0, current.1 - last.1);
                        drag_last.set(current);
                        bump(revision);
                    }
                    return;
                }

                let Some(point) = dom::container_point(MAP_CONTAINER_ID, client.x, client.y) else {
                    return;
                };
                let before = hovered_id(&engine_move);
                let commands = engine_move.borrow_mut().pointer_move(point);
                run_timers(&engine_move, &debounce_move, revision, commands);
                if hovered_id(&engine_move) != before {
                    bump(revision);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let start = *drag_start.read();
                let dragged = *did_drag.read();
                drag_start.set(None);
                did_drag.set(false);

                // A mouseup without drag movement = a click
                if start.is_some() && !dragged {
                    let client = evt.client_coordinates();
                    click_at(&engine_up, (client.x, client.y));
                }
            },

            onmouseleave: move |_| {
                drag_start.set(None);
                did_drag.set(false);
                let commands = engine_leave.borrow_mut().pointer_leave();
                run_timers(&engine_leave, &debounce_leave, revision, commands);
                bump(revision);
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    let client = touches[0].client_coordinates();
                    touch_start.set(Some((client.x, client.y)));
                    touch_last.set((client.x, client.y));
                    touch_did_pan.set(false);
                } else {
                    // Multi-touch cancels tap tracking
                    touch_start.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                let start = *touch_start.read();
                let (Some(start), [touch]) = (start, touches.as_slice()) else {
                    return;
                };
                let client = touch.client_coordinates();
                let current = (client.x, client.y);
                if !*touch_did_pan.read() && exceeds_threshold(start, current, TOUCH_DRAG_THRESHOLD) {
                    touch_did_pan.set(true);
                }
                if *touch_did_pan.read() {
                    let last = *touch_last.read();
                    engine_touch_move.borrow_mut().pan_by(current.0 - last.0, current.1 - last.1);
                    touch_last.set(current);
                    bump(revision);
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                if !evt.data().touches().is_empty() {
                    return;
                }
                let start = *touch_start.read();
                let panned = *touch_did_pan.read();
                touch_start.set(None);
                if let (Some(start), false) = (start, panned) {
                    click_at(&engine_touch_end, start);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start.set(None);
                touch_did_pan.set(false);
            },

            if let Some(frame) = frame {
                div { class: "tile-layer",
                    for tile in frame.tiles.iter() {
                        img {
                            key: "{tile.key}",
                            class: "map-tile",
                            src: "{tile.url}",
                            draggable: "false",
                            style: "left:{tile.left}px;top:{tile.top}px;width:{tile.size}px;height:{tile.size}px;",
                        }
                    }
                }

                div { class: "marker-layer",
                    for marker in frame.markers.iter() {
                        div {
                            key: "{marker.site_id}",
                            class: if marker.style == MarkerStyle::Hovered { "site-marker hovered" } else { "site-marker" },
                            style: "left:{marker.left}px;top:{marker.top}px;width:{marker.icon.width}px;height:{marker.icon.height}px;",
                            dangerous_inner_html: "{marker.icon.markup}",
                        }
                    }
                    if let Some(location) = &frame.location {
                        div {
                            class: "location-marker",
                            style: "left:{location.left}px;top:{location.top}px;",
                            dangerous_inner_html: "{location.icon.markup}",
                        }
                    }
                }

                div { class: "map-attribution", "{frame.attribution}" }
            }

            if let Some(card) = preview {
                PreviewCardView { card }
            }

            LocateButton { busy, onlocate: on_locate }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_up_zooms_in() {
        assert_eq!(wheel_zoom_delta(-120.0), WHEEL_ZOOM_STEP);
        assert_eq!(wheel_zoom_delta(3.0), -WHEEL_ZOOM_STEP);
        assert_eq!(wheel_zoom_delta(0.0), 0.0);
    }

    #[test]
    fn test_drag_threshold() {
        assert!(!exceeds_threshold((10.0, 10.0), (12.0, 13.0), DRAG_THRESHOLD));
        assert!(exceeds_threshold((10.0, 10.0), (14.0, 10.0), DRAG_THRESHOLD));
        assert!(exceeds_threshold((10.0, 10.0), (10.0, 5.0), DRAG_THRESHOLD));
    }

    #[test]
    fn test_touch_threshold_is_looser() {
        let start = (0.0, 0.0);
        let moved = (6.0, 0.0);
        assert!(exceeds_threshold(start, moved, DRAG_THRESHOLD));
        assert!(!exceeds_threshold(start, moved, TOUCH_DRAG_THRESHOLD));
    }
}
