use crate::color::resolve_color;
use crate::config::FitOptions;
use crate::geo::{project, Coord};
use crate::icon::IconCache;
use crate::layer::{replace_in_stack, Layer, LayerKind, MarkerFeature, MarkerLayer};
use crate::models::FilteredSiteSet;
use crate::surface::SurfaceController;

/// Derives the marker layer from the filtered site set.
#[derive(Debug, Clone)]
pub struct MarkerLayerManager {
    fit: FitOptions,
    feature_count: usize,
}

impl MarkerLayerManager {
    pub fn new(fit: FitOptions) -> Self {
        Self {
            fit,
            feature_count: 0,
        }
    }

    /// Features placed by the last rebuild.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Replace the marker layer with one feature per valid site and frame
    /// the result. Sites without usable coordinates are skipped.
    pub fn rebuild(
        &mut self,
        sites: &FilteredSiteSet,
        surface: &mut SurfaceController,
        icons: &mut IconCache,
    ) -> usize {
        if !surface.is_active() {
            tracing::debug!(sites = sites.len(), "rebuild skipped, no surface");
            return 0;
        }

        let mut features = Vec::with_capacity(sites.len());
        let mut points: Vec<Coord> = Vec::with_capacity(sites.len());
        for site in sites.iter() {
            let location = match site.location() {
                Ok(location) => location,
                Err(e) => {
                    tracing::warn!(site = %site.id, error = %e, "site excluded from map");
                    continue;
                }
            };
            let coord = project(location);
            let color = resolve_color(&site.period);
            let icon = icons.marker(color, 1.0);
            features.push(MarkerFeature::new(site.clone(), coord, color, icon));
            points.push(coord);
        }

        let count = features.len();
        let stack = replace_in_stack(
            surface.layers(),
            LayerKind::Markers,
            Some(Layer::Markers(MarkerLayer { features })),
        );
        surface.set_layers(stack);
        surface.fit_to_bounds(&points, self.fit);

        self.feature_count = count;
        tracing::info!(features = count, skipped = sites.len() - count, "marker layer rebuilt");
        count
    }
}
