use std::rc::Rc;

use crate::config::{FitOptions, MapConfig};
use crate::geo::{Coord, ScreenPoint, ScreenSize};
use crate::icon::{IconCache, MarkerIcon};
use crate::layer::{GeolocationMarker, Layer, MarkerFeature, MarkerStyle};
use crate::tiles::{PlacedTile, TileSource};
use crate::view::{self, ViewAnimation, ViewState};

/// Pointer affordance shown by the host element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

/// An element a rendering surface can be bound to.
pub trait HostContainer {
    /// Bind a surface to this element. The binding lasts until the
    /// returned mount is dropped, which must release every listener the
    /// binding registered.
    fn attach(&self) -> Box<dyn Mount>;
}

/// A live binding between one surface and its host element.
pub trait Mount {
    fn size(&self) -> ScreenSize;
    fn set_cursor(&mut self, cursor: Cursor);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub site_id: String,
    pub left: f64,
    pub top: f64,
    pub style: MarkerStyle,
    pub icon: Rc<MarkerIcon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedIcon {
    pub left: f64,
    pub top: f64,
    pub icon: Rc<MarkerIcon>,
}

/// Everything the host needs to paint one frame, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: ScreenSize,
    pub view: ViewState,
    pub tiles: Vec<PlacedTile>,
    pub markers: Vec<PlacedMarker>,
    pub location: Option<PlacedIcon>,
    pub attribution: String,
}

struct MapSurface {
    mount: Box<dyn Mount>,
    view: ViewState,
    layers: Vec<Layer>,
    animation: Option<ViewAnimation>,
    cursor: Cursor,
}

impl MapSurface {
    fn size(&self) -> ScreenSize {
        self.mount.size()
    }
}

/// Owns the single rendering surface of a mounted map.
pub struct SurfaceController {
    surface: Option<MapSurface>,
    tiles: TileSource,
    min_zoom: f64,
    max_zoom: f64,
}

impl SurfaceController {
    pub fn new(config: &MapConfig) -> Self {
        let (min_zoom, max_zoom) = config.zoom_range();
        Self {
            surface: None,
            tiles: TileSource::new(&config.tiles),
            min_zoom,
            max_zoom,
        }
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    /// Create the surface and bind it to `container`.
    ///
    /// A missing container or an already-live surface makes this a no-op,
    /// so repeated calls from a re-rendering host never stack surfaces.
    pub fn initialize(&mut self, container: Option<&dyn HostContainer>, initial: ViewState) -> bool {
        let Some(container) = container else {
            tracing::debug!("map container not available, surface not created");
            return false;
        };
        if self.surface.is_some() {
            tracing::debug!("map surface already initialized");
            return false;
        }
        let view = self.clamped(initial);
        self.surface = Some(MapSurface {
            mount: container.attach(),
            view,
            layers: Vec::new(),
            animation: None,
            cursor: Cursor::Default,
        });
        tracing::info!(zoom = view.zoom, "map surface attached");
        true
    }

    /// Detach the surface from its container, cancelling any animation.
    pub fn teardown(&mut self) -> bool {
        let Some(mut surface) = self.surface.take() else {
            return false;
        };
        surface.animation = None;
        if surface.cursor != Cursor::Default {
            surface.mount.set_cursor(Cursor::Default);
        }
        drop(surface);
        tracing::info!("map surface detached");
        true
    }

    /// Replace the whole layer stack.
    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        match &mut self.surface {
            Some(surface) => surface.layers = layers,
            None => tracing::debug!("set_layers ignored, no surface"),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        self.surface.as_ref().map(|s| s.layers.as_slice()).unwrap_or(&[])
    }

    /// Marker features in stacking order.
    pub fn marker_features(&self) -> impl Iterator<Item = &MarkerFeature> {
        self.layers()
            .iter()
            .filter_map(|l| match l {
                Layer::Markers(m) => Some(m.features.iter()),
                Layer::Location(_) => None,
            })
            .flatten()
    }

    pub fn location_marker(&self) -> Option<&GeolocationMarker> {
        self.layers().iter().rev().find_map(|l| match l {
            Layer::Location(marker) => Some(marker),
            Layer::Markers(_) => None,
        })
    }

    pub fn view(&self) -> Option<ViewState> {
        self.surface.as_ref().map(|s| s.view)
    }

    pub fn size(&self) -> ScreenSize {
        self.surface.as_ref().map(MapSurface::size).unwrap_or_default()
    }

    pub fn is_animating(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.animation.is_some())
    }

    fn clamped(&self, view: ViewState) -> ViewState {
        ViewState::new(view.center, view.zoom.clamp(self.min_zoom, self.max_zoom))
    }

    /// Start a transition to `target`. The surface advances it on `tick`.
    pub fn animate_to(&mut self, target: ViewState, duration_ms: f64) {
        let target = self.clamped(target);
        let Some(surface) = &mut self.surface else {
            return;
        };
        if duration_ms <= 0.0 {
            surface.animation = None;
            surface.view = target;
        } else {
            surface.animation = Some(ViewAnimation::new(surface.view, target, duration_ms));
        }
    }

    /// Animate to the smallest view containing `points`. No points, no change.
    pub fn fit_to_bounds(&mut self, points: &[Coord], opts: FitOptions) {
        let size = self.size();
        let max_zoom = opts.max_zoom.min(self.max_zoom);
        let Some(target) = view::fit_view(points, size, opts.padding, self.min_zoom, max_zoom) else {
            return;
        };
        self.animate_to(target, opts.duration_ms);
    }

    /// Drag gesture.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if let Some(surface) = &mut self.surface {
            surface.animation = None;
            surface.view = surface.view.panned(dx, dy);
        }
    }

    /// Wheel gesture: change zoom by `delta` levels around `anchor`.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta: f64) {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if let Some(surface) = &mut self.surface {
            let size = surface.size();
            let new_zoom = (surface.view.zoom + delta).clamp(min, max);
            if (new_zoom - surface.view.zoom).abs() < 1e-9 {
                return;
            }
            surface.animation = None;
            surface.view = view::zoom_around(&surface.view, anchor, size, new_zoom);
        }
    }

    /// Advance any in-flight animation. Returns whether the view changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(surface) = &mut self.surface else {
            return false;
        };
        let Some(animation) = &mut surface.animation else {
            return false;
        };
        let (view, done) = animation.sample(now_ms);
        if done {
            surface.animation = None;
        }
        let changed = view != surface.view;
        surface.view = view;
        changed
    }

    pub fn pixel_for(&self, coord: Coord) -> Option<ScreenPoint> {
        let surface = self.surface.as_ref()?;
        Some(surface.view.pixel_for(coord, surface.size()))
    }

    /// Topmost marker whose icon covers `pixel`. Later layers, and later
    /// features within a layer, win on overlap.
    pub fn screen_to_feature(&self, pixel: ScreenPoint) -> Option<&MarkerFeature> {
        let surface = self.surface.as_ref()?;
        let size = surface.size();
        surface
            .layers
            .iter()
            .rev()
            .filter_map(|l| match l {
                Layer::Markers(m) => Some(m.features.iter().rev()),
                Layer::Location(_) => None,
            })
            .flatten()
            .find(|f| {
                let p = surface.view.pixel_for(f.coord, size);
                let left = p.x - f.icon.anchor_x;
                let top = p.y - f.icon.anchor_y;
                pixel.x >= left
                    && pixel.x <= left + f.icon.width
                    && pixel.y >= top
                    && pixel.y <= top + f.icon.height
            })
    }

    /// Set the style of the topmost feature for `site_id`.
    pub fn restyle(&mut self, site_id: &str, style: MarkerStyle, icons: &mut IconCache) -> bool {
        let Some(surface) = &mut self.surface else {
            return false;
        };
        let feature = surface
            .layers
            .iter_mut()
            .rev()
            .filter_map(|l| match l {
                Layer::Markers(m) => Some(m.features.iter_mut().rev()),
                Layer::Location(_) => None,
            })
            .flatten()
            .find(|f| f.site_id() == site_id);
        match feature {
            Some(f) => {
                f.set_style(style, icons);
                true
            }
            None => false,
        }
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if let Some(surface) = &mut self.surface {
            if surface.cursor != cursor {
                surface.cursor = cursor;
                surface.mount.set_cursor(cursor);
            }
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.surface.as_ref().map(|s| s.cursor).unwrap_or_default()
    }

    /// Render description for the current view. Off-screen markers are culled.
    pub fn frame(&self) -> Option<Frame> {
        let surface = self.surface.as_ref()?;
        let size = surface.size();
        let view = surface.view;
        let on_screen = |left: f64, top: f64, icon: &MarkerIcon| {
            left + icon.width >= 0.0
                && top + icon.height >= 0.0
                && left <= size.width
                && top <= size.height
        };

        let mut markers = Vec::new();
        let mut location = None;
        for layer in &surface.layers {
            match layer {
                Layer::Markers(m) => {
                    for f in &m.features {
                        let p = view.pixel_for(f.coord, size);
                        let left = p.x - f.icon.anchor_x;
                        let top = p.y - f.icon.anchor_y;
                        if on_screen(left, top, &f.icon) {
                            markers.push(PlacedMarker {
                                site_id: f.site_id().to_string(),
                                left,
                                top,
                                style: f.style,
                                icon: f.icon.clone(),
                            });
                        }
                    }
                }
                Layer::Location(marker) => {
                    let p = view.pixel_for(marker.coord, size);
                    location = Some(PlacedIcon {
                        left: p.x - marker.icon.anchor_x,
                        top: p.y - marker.icon.anchor_y,
                        icon: marker.icon.clone(),
                    });
                }
            }
        }

        Some(Frame {
            size,
            view,
            tiles: self.tiles.visible_tiles(&view, size),
            markers,
            location,
            attribution: self.tiles.attribution().to_string(),
        })
    }
}
