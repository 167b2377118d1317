use std::cell::Cell;
use std::rc::Rc;

use atlas_shared::geo::{ScreenPoint, ScreenSize};
use atlas_shared::surface::{Cursor, HostContainer, Mount};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;

const SURFACE_ATTR: &str = "data-surface";

/// Convert client (viewport) coordinates to container-relative pixels.
pub fn client_to_container(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> ScreenPoint {
    ScreenPoint::new(client_x - rect_left, client_y - rect_top)
}

/// Container-relative position of a client coordinate, using the live
/// bounding rect of the element with `container_id`.
pub fn container_point(container_id: &str, client_x: f64, client_y: f64) -> Option<ScreenPoint> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

fn measure(element: &web_sys::HtmlElement) -> ScreenSize {
    let rect = element.get_bounding_client_rect();
    ScreenSize::new(rect.width(), rect.height())
}

/// The map's host element in the document.
pub struct DomContainer {
    element: web_sys::HtmlElement,
    on_resize: Rc<dyn Fn()>,
}

impl DomContainer {
    /// Look up the element by id. `on_resize` runs after the mount has
    /// re-measured the element.
    pub fn by_id(id: &str, on_resize: impl Fn() + 'static) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let element = document.get_element_by_id(id)?.dyn_into::<web_sys::HtmlElement>().ok()?;
        Some(Self {
            element,
            on_resize: Rc::new(on_resize),
        })
    }
}

impl HostContainer for DomContainer {
    fn attach(&self) -> Box<dyn Mount> {
        let size = Rc::new(Cell::new(measure(&self.element)));
        let resize = web_sys::window().map(|window| {
            let element = self.element.clone();
            let size = size.clone();
            let on_resize = self.on_resize.clone();
            EventListener::new(&window, "resize", move |_| {
                size.set(measure(&element));
                on_resize();
            })
        });
        if let Err(e) = self.element.set_attribute(SURFACE_ATTR, "attached") {
            tracing::debug!(?e, "could not tag map container");
        }
        Box::new(DomMount {
            element: self.element.clone(),
            size,
            _resize: resize,
        })
    }
}

/// Live binding to the host element. Dropping it removes the resize
/// listener, the cursor override and the surface tag.
struct DomMount {
    element: web_sys::HtmlElement,
    size: Rc<Cell<ScreenSize>>,
    _resize: Option<EventListener>,
}

impl Mount for DomMount {
    fn size(&self) -> ScreenSize {
        self.size.get()
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        // An empty value removes the inline declaration
        if let Err(e) = self.element.style().set_property("cursor", cursor.as_css()) {
            tracing::debug!(?e, "cursor update failed");
        }
    }
}

impl Drop for DomMount {
    fn drop(&mut self) {
        let _ = self.element.style().remove_property("cursor");
        let _ = self.element.remove_attribute(SURFACE_ATTR);
    }
}
