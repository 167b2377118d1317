/// Geographic and screen-space primitives.
///
/// The map works in spherical Web Mercator (EPSG:3857) metres. Screen
/// pixels have their origin at the top-left of the host container with Y
/// growing downwards, while projected Y grows northwards.
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half the projected world width: the X (and Y) extent of EPSG:3857.
pub const HALF_WORLD_M: f64 = std::f64::consts::PI * EARTH_RADIUS_M;

/// Latitude beyond which Web Mercator is undefined in practice.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Edge length of one XYZ tile in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Metres per pixel at zoom 0.
pub const RESOLUTION_Z0: f64 = 2.0 * HALF_WORLD_M / TILE_SIZE_PX;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A position in projected metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned box over projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Smallest extent containing every point, or `None` for no points.
    pub fn from_points(points: &[Coord]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut extent = Extent {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in rest {
            extent.min_x = extent.min_x.min(p.x);
            extent.min_y = extent.min_y.min(p.y);
            extent.max_x = extent.max_x.max(p.x);
            extent.max_y = extent.max_y.max(p.y);
        }
        Some(extent)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Project a geographic position into Web Mercator metres.
pub fn project(p: LatLng) -> Coord {
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS_M * p.lng.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    Coord::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(c: Coord) -> LatLng {
    let lng = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LatLng::new(lat, lng)
}

/// Metres per pixel at a (fractional) zoom level.
pub fn resolution_for_zoom(zoom: f64) -> f64 {
    RESOLUTION_Z0 / 2f64.powf(zoom)
}

/// Zoom level at which one pixel covers `resolution` metres.
pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (RESOLUTION_Z0 / resolution).log2()
}
