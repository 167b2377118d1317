use std::collections::HashMap;
use std::rc::Rc;

use svg::node::element::{Circle, Path};
use svg::Document;

use crate::color::Rgb;

/// Pin artwork is drawn in a 24x36 box and scaled from there.
const PIN_WIDTH: f64 = 24.0;
const PIN_HEIGHT: f64 = 36.0;
const PIN_PATH: &str = "M12 0C5.37 0 0 5.37 0 12c0 9 12 24 12 24s12-15 12-24C24 5.37 18.63 0 12 0z";
const PIN_CORE_RADIUS: f64 = 5.0;

const LOCATION_DIAMETER: f64 = 28.0;
const LOCATION_FILL: &str = "rgba(37,99,235,0.25)";
const LOCATION_CORE: &str = "#2563eb";

/// A rasterizable vector icon and where it attaches to its coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    /// Standalone `<svg>` document.
    pub markup: String,
    pub width: f64,
    pub height: f64,
    /// Offset from the icon's top-left corner to the point that sits on
    /// the map coordinate.
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// Two-tone map pin: outer teardrop in `base`, inner circle in its shade.
pub fn synthesize_marker(base: Rgb, scale: f64) -> MarkerIcon {
    let width = PIN_WIDTH * scale;
    let height = PIN_HEIGHT * scale;

    let pin = Path::new()
        .set("d", PIN_PATH)
        .set("fill", base.to_hex())
        .set("stroke", "white")
        .set("stroke-width", 1.5);
    let core = Circle::new()
        .set("cx", PIN_WIDTH / 2.0)
        .set("cy", PIN_WIDTH / 2.0)
        .set("r", PIN_CORE_RADIUS)
        .set("fill", base.shaded().to_hex());

    let doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {PIN_WIDTH} {PIN_HEIGHT}"))
        .add(pin)
        .add(core);

    MarkerIcon {
        markup: doc.to_string(),
        width,
        height,
        anchor_x: width / 2.0,
        anchor_y: height,
    }
}

/// Translucent disc with a solid center, centered on its coordinate.
pub fn synthesize_location_dot() -> MarkerIcon {
    let r = LOCATION_DIAMETER / 2.0;
    let halo = Circle::new()
        .set("cx", r)
        .set("cy", r)
        .set("r", r)
        .set("fill", LOCATION_FILL);
    let core = Circle::new()
        .set("cx", r)
        .set("cy", r)
        .set("r", r / 3.0)
        .set("fill", LOCATION_CORE)
        .set("stroke", "white")
        .set("stroke-width", 2);

    let doc = Document::new()
        .set("width", LOCATION_DIAMETER)
        .set("height", LOCATION_DIAMETER)
        .set("viewBox", format!("0 0 {LOCATION_DIAMETER} {LOCATION_DIAMETER}"))
        .add(halo)
        .add(core);

    MarkerIcon {
        markup: doc.to_string(),
        width: LOCATION_DIAMETER,
        height: LOCATION_DIAMETER,
        anchor_x: r,
        anchor_y: r,
    }
}

/// Memoizes synthesized icons so hover restyling never rebuilds markup.
#[derive(Debug, Default)]
pub struct IconCache {
    markers: HashMap<(Rgb, u64), Rc<MarkerIcon>>,
    location: Option<Rc<MarkerIcon>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&mut self, base: Rgb, scale: f64) -> Rc<MarkerIcon> {
        self.markers
            .entry((base, scale.to_bits()))
            .or_insert_with(|| Rc::new(synthesize_marker(base, scale)))
            .clone()
    }

    pub fn location(&mut self) -> Rc<MarkerIcon> {
        self.location
            .get_or_insert_with(|| Rc::new(synthesize_location_dot()))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.markers.len() + usize::from(self.location.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{resolve_color, ROMAN};

    #[test]
    fn test_marker_uses_base_and_shade() {
        let icon = synthesize_marker(ROMAN, 1.0);
        assert!(icon.markup.starts_with("<svg"));
        assert!(icon.markup.contains(r##"fill="#b22222""##));
        assert!(icon.markup.contains(r##"fill="#7c1717""##));
        assert!(icon.markup.contains("<path"));
        assert!(icon.markup.contains("<circle"));
    }

    #[test]
    fn test_marker_scales_size_and_anchor() {
        let icon = synthesize_marker(ROMAN, 1.3);
        assert!((icon.width - 31.2).abs() < 1e-9);
        assert!((icon.height - 46.8).abs() < 1e-9);
        // Bottom-center
        assert!((icon.anchor_x - icon.width / 2.0).abs() < 1e-9);
        assert!((icon.anchor_y - icon.height).abs() < 1e-9);
        assert!(icon.markup.contains(r#"viewBox="0 0 24 36""#));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let color = resolve_color("Islamic");
        assert_eq!(synthesize_marker(color, 1.0), synthesize_marker(color, 1.0));
    }

    #[test]
    fn test_location_dot_is_not_a_pin() {
        let icon = synthesize_location_dot();
        assert!(!icon.markup.contains("<path"));
        assert!(icon.markup.contains("rgba(37,99,235,0.25)"));
        assert_eq!(icon.anchor_x, icon.width / 2.0);
        assert_eq!(icon.anchor_y, icon.height / 2.0);
    }

    #[test]
    fn test_cache_reuses_icons() {
        let mut cache = IconCache::new();
        let a = cache.marker(ROMAN, 1.0);
        let b = cache.marker(ROMAN, 1.0);
        assert!(Rc::ptr_eq(&a, &b));
        let hovered = cache.marker(ROMAN, 1.3);
        assert!(!Rc::ptr_eq(&a, &hovered));
        assert_eq!(cache.len(), 2);
        cache.location();
        cache.location();
        assert_eq!(cache.len(), 3);
    }
}
