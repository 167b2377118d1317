use std::cell::Cell;
use std::rc::Rc;

use crate::color::resolve_color;
use crate::geo::{project, LatLng, ScreenSize};
use crate::icon::IconCache;
use crate::layer::{GeolocationMarker, Layer, MarkerFeature, MarkerLayer};
use crate::models::{Coordinates, DateRange, Site};
use crate::surface::{Cursor, HostContainer, Mount};

pub fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

pub fn site(id: &str, lat: f64, lng: f64, period: &str) -> Site {
    Site {
        id: id.to_string(),
        display_name: format!("Site {id}"),
        coordinates: Some(Coordinates::new(lat, lng)),
        period: period.to_string(),
        date_range: DateRange {
            start: -30,
            end: 395,
        },
        thumbnail_url: format!("/media/{id}.jpg"),
    }
}

/// A marker layer with one Roman-colored feature per `(id, lat, lng)`.
pub fn marker_layer(cache: &mut IconCache, points: &[(&str, f64, f64)]) -> Layer {
    let features = points
        .iter()
        .map(|&(id, lat, lng)| {
            let s = site(id, lat, lng, "Roman");
            let color = resolve_color(&s.period);
            MarkerFeature::new(
                Rc::new(s),
                project(LatLng::new(lat, lng)),
                color,
                cache.marker(color, 1.0),
            )
        })
        .collect();
    Layer::Markers(MarkerLayer { features })
}

pub fn location_layer(cache: &mut IconCache) -> Layer {
    let position = LatLng::new(30.0444, 31.2357);
    Layer::Location(GeolocationMarker {
        position,
        coord: project(position),
        accuracy_m: Some(25.0),
        icon: cache.location(),
    })
}

#[derive(Default)]
struct ContainerState {
    attached: Cell<usize>,
    total_attaches: Cell<usize>,
    cursor: Cell<Cursor>,
    cursor_changes: Cell<usize>,
}

/// In-memory host element that counts live bindings.
pub struct FakeContainer {
    size: ScreenSize,
    state: Rc<ContainerState>,
}

impl FakeContainer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: ScreenSize::new(width, height),
            state: Rc::new(ContainerState::default()),
        }
    }

    pub fn attached(&self) -> usize {
        self.state.attached.get()
    }

    pub fn total_attaches(&self) -> usize {
        self.state.total_attaches.get()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor.get()
    }

    pub fn cursor_changes(&self) -> usize {
        self.state.cursor_changes.get()
    }
}

impl HostContainer for FakeContainer {
    fn attach(&self) -> Box<dyn Mount> {
        self.state.attached.set(self.state.attached.get() + 1);
        self.state.total_attaches.set(self.state.total_attaches.get() + 1);
        Box::new(FakeMount {
            size: self.size,
            state: self.state.clone(),
        })
    }
}

struct FakeMount {
    size: ScreenSize,
    state: Rc<ContainerState>,
}

impl Mount for FakeMount {
    fn size(&self) -> ScreenSize {
        self.size
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.state.cursor.set(cursor);
        self.state.cursor_changes.set(self.state.cursor_changes.get() + 1);
    }
}

impl Drop for FakeMount {
    fn drop(&mut self) {
        self.state.attached.set(self.state.attached.get() - 1);
    }
}
