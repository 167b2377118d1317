use thiserror::Error;

use crate::config::{MapConfig, PositionOptions};
use crate::geo::{project, LatLng};
use crate::icon::IconCache;
use crate::layer::{replace_in_stack, GeolocationMarker, Layer, LayerKind};
use crate::surface::SurfaceController;
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
}

/// A position reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub position: LatLng,
    pub accuracy_m: Option<f64>,
}

/// One platform query the host should run, tagged so its answer can be
/// routed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateRequest {
    pub id: u64,
    pub options: PositionOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocateOutcome {
    Placed(LatLng),
    Failed(GeolocationError),
    /// The map was torn down before the answer arrived.
    Discarded,
}

/// "Find my location". Requests are never de-duplicated; whichever
/// answer is applied last owns the marker.
#[derive(Debug)]
pub struct GeolocationOverlay {
    options: PositionOptions,
    zoom: f64,
    duration_ms: f64,
    next_id: u64,
    in_flight: usize,
}

impl GeolocationOverlay {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            options: config.geolocation,
            zoom: config.locate_zoom,
            duration_ms: config.locate_duration_ms,
            next_id: 0,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn locate(&mut self) -> LocateRequest {
        self.next_id += 1;
        self.in_flight += 1;
        tracing::debug!(id = self.next_id, in_flight = self.in_flight, "location requested");
        LocateRequest {
            id: self.next_id,
            options: self.options,
        }
    }

    /// Apply the platform's answer to request `id`.
    pub fn resolve(
        &mut self,
        id: u64,
        result: Result<Fix, GeolocationError>,
        surface: &mut SurfaceController,
        icons: &mut IconCache,
    ) -> LocateOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !surface.is_active() {
            tracing::debug!(id, "location answer arrived after teardown");
            return LocateOutcome::Discarded;
        }
        let fix = match result {
            Ok(fix) => fix,
            Err(e) => {
                tracing::warn!(id, error = %e, "location query failed");
                return LocateOutcome::Failed(e);
            }
        };

        let coord = project(fix.position);
        let marker = GeolocationMarker {
            position: fix.position,
            coord,
            accuracy_m: fix.accuracy_m,
            icon: icons.location(),
        };
        let stack = replace_in_stack(surface.layers(), LayerKind::Location, Some(Layer::Location(marker)));
        surface.set_layers(stack);
        surface.animate_to(ViewState::new(coord, self.zoom), self.duration_ms);
        tracing::info!(id, lat = fix.position.lat, lng = fix.position.lng, "location placed");
        LocateOutcome::Placed(fix.position)
    }
}
