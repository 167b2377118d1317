use std::rc::Rc;

use crate::color::Rgb;
use crate::geo::{Coord, LatLng};
use crate::icon::{IconCache, MarkerIcon};
use crate::models::Site;

/// Icon scale for a marker under the pointer.
pub const HOVERED_SCALE: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Normal,
    Hovered,
}

impl MarkerStyle {
    pub fn scale(self) -> f64 {
        match self {
            MarkerStyle::Normal => 1.0,
            MarkerStyle::Hovered => HOVERED_SCALE,
        }
    }
}

/// One point feature per site in the filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFeature {
    site: Rc<Site>,
    pub coord: Coord,
    pub color: Rgb,
    pub style: MarkerStyle,
    pub icon: Rc<MarkerIcon>,
}

impl MarkerFeature {
    pub fn new(site: Rc<Site>, coord: Coord, color: Rgb, icon: Rc<MarkerIcon>) -> Self {
        Self {
            site,
            coord,
            color,
            style: MarkerStyle::Normal,
            icon,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn site_id(&self) -> &str {
        &self.site.id
    }

    pub fn period(&self) -> &str {
        &self.site.period
    }

    /// Switch style, swapping in the cached icon for the new scale.
    pub fn set_style(&mut self, style: MarkerStyle, icons: &mut IconCache) {
        self.style = style;
        self.icon = icons.marker(self.color, style.scale());
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    pub features: Vec<MarkerFeature>,
}

/// The user's own position, drawn apart from site markers.
#[derive(Debug, Clone, PartialEq)]
pub struct GeolocationMarker {
    pub position: LatLng,
    pub coord: Coord,
    pub accuracy_m: Option<f64>,
    pub icon: Rc<MarkerIcon>,
}

/// Stacking order, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LayerKind {
    Markers,
    Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Markers(MarkerLayer),
    Location(GeolocationMarker),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Markers(_) => LayerKind::Markers,
            Layer::Location(_) => LayerKind::Location,
        }
    }
}

/// A new full stack equal to `stack` with every layer of `kind` removed
/// and `replacement` (if any) inserted in its stacking position.
pub fn replace_in_stack(stack: &[Layer], kind: LayerKind, replacement: Option<Layer>) -> Vec<Layer> {
    let mut layers: Vec<Layer> = stack
        .iter()
        .filter(|l| l.kind() != kind)
        .cloned()
        .chain(replacement)
        .collect();
    // Stable sort keeps insertion order within a kind
    layers.sort_by_key(Layer::kind);
    layers
}
