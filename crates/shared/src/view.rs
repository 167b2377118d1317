use crate::geo::{self, Coord, Extent, ScreenPoint, ScreenSize, HALF_WORLD_M};

/// Center and zoom of the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Coord,
    pub zoom: f64,
}

impl ViewState {
    pub fn new(center: Coord, zoom: f64) -> Self {
        Self { center, zoom }
    }

    pub fn resolution(&self) -> f64 {
        geo::resolution_for_zoom(self.zoom)
    }

    /// Container pixel showing `coord`.
    pub fn pixel_for(&self, coord: Coord, size: ScreenSize) -> ScreenPoint {
        let res = self.resolution();
        ScreenPoint::new(
            (coord.x - self.center.x) / res + size.width / 2.0,
            (self.center.y - coord.y) / res + size.height / 2.0,
        )
    }

    /// Projected coordinate under container pixel `pixel`.
    pub fn coord_for(&self, pixel: ScreenPoint, size: ScreenSize) -> Coord {
        let res = self.resolution();
        Coord::new(
            self.center.x + (pixel.x - size.width / 2.0) * res,
            self.center.y - (pixel.y - size.height / 2.0) * res,
        )
    }

    /// Shift the view by a pointer drag of (`dx`, `dy`) pixels.
    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        let res = self.resolution();
        Self::new(
            clamp_center(Coord::new(
                self.center.x - dx * res,
                self.center.y + dy * res,
            )),
            self.zoom,
        )
    }
}

fn clamp_center(c: Coord) -> Coord {
    Coord::new(
        c.x.clamp(-HALF_WORLD_M, HALF_WORLD_M),
        c.y.clamp(-HALF_WORLD_M, HALF_WORLD_M),
    )
}

/// Zoom to `new_zoom` keeping the coordinate under `anchor` fixed on screen.
pub fn zoom_around(view: &ViewState, anchor: ScreenPoint, size: ScreenSize, new_zoom: f64) -> ViewState {
    let fixed = view.coord_for(anchor, size);
    let res = geo::resolution_for_zoom(new_zoom);
    let center = Coord::new(
        fixed.x - (anchor.x - size.width / 2.0) * res,
        fixed.y + (anchor.y - size.height / 2.0) * res,
    );
    ViewState::new(clamp_center(center), new_zoom)
}

/// View framing every point with `padding` pixels to spare on each side.
///
/// Returns `None` for no points. Coincident points have no extent and
/// resolve to `max_zoom` instead of an unbounded zoom.
pub fn fit_view(
    points: &[Coord],
    size: ScreenSize,
    padding: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> Option<ViewState> {
    let extent = Extent::from_points(points)?;
    let avail_w = (size.width - 2.0 * padding).max(1.0);
    let avail_h = (size.height - 2.0 * padding).max(1.0);
    let res = (extent.width() / avail_w).max(extent.height() / avail_h);
    let zoom = if res > 0.0 {
        geo::zoom_for_resolution(res).min(max_zoom)
    } else {
        max_zoom
    };
    Some(ViewState::new(extent.center(), zoom.max(min_zoom)))
}

/// Ease-in-out curve on [0, 1].
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// An in-flight transition between two views. The clock starts on the
/// first sample so callers never need a timestamp to begin one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAnimation {
    from: ViewState,
    to: ViewState,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl ViewAnimation {
    pub fn new(from: ViewState, to: ViewState, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            started_at: None,
        }
    }

    /// View at time `now_ms` and whether the animation has finished.
    pub fn sample(&mut self, now_ms: f64) -> (ViewState, bool) {
        let start = *self.started_at.get_or_insert(now_ms);
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = (now_ms - start) / self.duration_ms;
        if t >= 1.0 {
            return (self.to, true);
        }
        let k = ease_in_out(t);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        let view = ViewState::new(
            Coord::new(
                lerp(self.from.center.x, self.to.center.x),
                lerp(self.from.center.y, self.to.center.y),
            ),
            lerp(self.from.zoom, self.to.zoom),
        );
        (view, false)
    }
}
