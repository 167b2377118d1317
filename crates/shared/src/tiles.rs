use crate::config::TileSourceConfig;
use crate::geo::{ScreenSize, HALF_WORLD_M};
use crate::view::ViewState;

/// Deepest tile level requested from the basemap.
const MAX_TILE_ZOOM: i32 = 19;

/// One basemap tile placed in container pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    /// `z/x/y`, stable across frames.
    pub key: String,
    pub url: String,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    url_template: String,
    attribution: String,
}

impl TileSource {
    pub fn new(config: &TileSourceConfig) -> Self {
        Self {
            url_template: config.url_template.clone(),
            attribution: config.attribution.clone(),
        }
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn url(&self, z: i32, x: i64, y: i64) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Tiles covering the viewport at the nearest integer zoom.
    pub fn visible_tiles(&self, view: &ViewState, size: ScreenSize) -> Vec<PlacedTile> {
        if size.is_empty() {
            return Vec::new();
        }
        let z = (view.zoom.round() as i32).clamp(0, MAX_TILE_ZOOM);
        let n = 1i64 << z;
        let tile_m = 2.0 * HALF_WORLD_M / n as f64;
        let res = view.resolution();
        let tile_px = tile_m / res;

        let left_m = view.center.x - size.width / 2.0 * res;
        let right_m = view.center.x + size.width / 2.0 * res;
        let top_m = view.center.y + size.height / 2.0 * res;
        let bottom_m = view.center.y - size.height / 2.0 * res;

        let col_min = ((left_m + HALF_WORLD_M) / tile_m).floor() as i64;
        let col_max = ((right_m + HALF_WORLD_M) / tile_m).ceil() as i64 - 1;
        let row_min = (((HALF_WORLD_M - top_m) / tile_m).floor() as i64).max(0);
        let row_max = (((HALF_WORLD_M - bottom_m) / tile_m).ceil() as i64 - 1).min(n - 1);

        let mut tiles = Vec::new();
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let x = col.rem_euclid(n);
                let tile_left_m = col as f64 * tile_m - HALF_WORLD_M;
                let tile_top_m = HALF_WORLD_M - row as f64 * tile_m;
                tiles.push(PlacedTile {
                    key: format!("{z}/{col}/{row}"),
                    url: self.url(z, x, row),
                    left: (tile_left_m - view.center.x) / res + size.width / 2.0,
                    top: (view.center.y - tile_top_m) / res + size.height / 2.0,
                    size: tile_px,
                });
            }
        }
        tiles
    }
}
