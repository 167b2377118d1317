use std::time::Duration;

use crate::config::MapConfig;
use crate::geo::{project, ScreenPoint};
use crate::geolocation::{Fix, GeolocationError, GeolocationOverlay, LocateOutcome, LocateRequest};
use crate::icon::IconCache;
use crate::markers::MarkerLayerManager;
use crate::models::FilteredSiteSet;
use crate::pointer::{HoverTarget, PointerController, TimerCommand};
use crate::preview::{Locale, PreviewCard};
use crate::surface::{Frame, HostContainer, SurfaceController};
use crate::view::ViewState;

/// The monument map explorer: one surface, its marker layer, hover
/// previews and the location overlay, driven by host events.
///
/// Sites may be supplied before a container exists; the latest snapshot
/// is applied when the map mounts.
pub struct MonumentMap {
    config: MapConfig,
    surface: SurfaceController,
    markers: MarkerLayerManager,
    pointer: PointerController,
    geolocation: GeolocationOverlay,
    icons: IconCache,
    sites: FilteredSiteSet,
    navigate: Box<dyn FnMut(&str)>,
}

impl MonumentMap {
    pub fn new(config: MapConfig, navigate: impl FnMut(&str) + 'static) -> Self {
        Self {
            surface: SurfaceController::new(&config),
            markers: MarkerLayerManager::new(config.fit),
            pointer: PointerController::new(Duration::from_millis(config.hover_delay_ms)),
            geolocation: GeolocationOverlay::new(&config),
            icons: IconCache::new(),
            sites: FilteredSiteSet::default(),
            navigate: Box::new(navigate),
            config,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_active()
    }

    pub fn surface(&self) -> &SurfaceController {
        &self.surface
    }

    pub fn hover(&self) -> Option<&HoverTarget> {
        self.pointer.hover()
    }

    /// Attach to `container` and draw the latest site snapshot.
    pub fn mount(&mut self, container: Option<&dyn HostContainer>) -> bool {
        let initial = ViewState::new(project(self.config.initial_center), self.config.initial_zoom);
        if !self.surface.initialize(container, initial) {
            return false;
        }
        if !self.sites.is_empty() {
            self.markers.rebuild(&self.sites, &mut self.surface, &mut self.icons);
        }
        true
    }

    /// Release the surface. Returned commands cancel any pending hover timer.
    pub fn unmount(&mut self) -> Vec<TimerCommand> {
        let commands = self.pointer.reset(&mut self.surface, &mut self.icons);
        self.surface.teardown();
        commands
    }

    /// Replace the filtered site snapshot and redraw the markers.
    pub fn set_sites(&mut self, sites: FilteredSiteSet) -> Vec<TimerCommand> {
        self.sites = sites;
        if !self.surface.is_active() {
            return Vec::new();
        }
        let commands = self.pointer.reset(&mut self.surface, &mut self.icons);
        self.markers.rebuild(&self.sites, &mut self.surface, &mut self.icons);
        commands
    }

    pub fn pointer_move(&mut self, pixel: ScreenPoint) -> Vec<TimerCommand> {
        self.pointer.pointer_move(pixel, &mut self.surface, &mut self.icons)
    }

    pub fn pointer_leave(&mut self) -> Vec<TimerCommand> {
        self.pointer.pointer_leave(&mut self.surface, &mut self.icons)
    }

    pub fn hover_elapsed(&mut self, token: u64) -> bool {
        self.pointer.hover_elapsed(token, &mut self.surface, &mut self.icons)
    }

    /// Navigate to the site under `pixel`, if any.
    pub fn click(&mut self, pixel: ScreenPoint) -> bool {
        match self.pointer.click(pixel, &self.surface) {
            Some(site_id) => {
                tracing::debug!(site = %site_id, "marker clicked");
                (self.navigate)(&site_id);
                true
            }
            None => false,
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.surface.pan_by(dx, dy);
    }

    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta: f64) {
        self.surface.zoom_at(anchor, delta);
    }

    pub fn locate(&mut self) -> LocateRequest {
        self.geolocation.locate()
    }

    pub fn location_resolved(&mut self, id: u64, result: Result<Fix, GeolocationError>) -> LocateOutcome {
        self.geolocation
            .resolve(id, result, &mut self.surface, &mut self.icons)
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.surface.tick(now_ms)
    }

    pub fn is_animating(&self) -> bool {
        self.surface.is_animating()
    }

    pub fn frame(&self) -> Option<Frame> {
        self.surface.frame()
    }

    pub fn preview(&self, locale: Locale) -> Option<PreviewCard> {
        PreviewCard::compute(self.pointer.hover(), &self.surface, locale)
    }
}
