use std::cell::RefCell;
use std::rc::Rc;

use atlas_shared::geo::LatLng;
use atlas_shared::geolocation::{Fix, GeolocationError, LocateRequest};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Map a `GeolocationPositionError.code` to the engine's error.
pub fn error_from_code(code: u16) -> GeolocationError {
    match code {
        1 => GeolocationError::PermissionDenied,
        3 => GeolocationError::Timeout,
        _ => GeolocationError::PositionUnavailable,
    }
}

/// Run one `getCurrentPosition` query for `request`. `on_result` is called
/// exactly once, possibly synchronously when geolocation is unavailable.
pub fn request_position(
    request: LocateRequest,
    on_result: impl FnOnce(u64, Result<Fix, GeolocationError>) + 'static,
) {
    let id = request.id;
    let Some(geolocation) = web_sys::window().and_then(|w| w.navigator().geolocation().ok()) else {
        on_result(id, Err(GeolocationError::Unsupported));
        return;
    };

    let slot = Rc::new(RefCell::new(Some(on_result)));
    let success_slot = slot.clone();
    let success = Closure::once_into_js(move |position: web_sys::Position| {
        let coords = position.coords();
        let fix = Fix {
            position: LatLng::new(coords.latitude(), coords.longitude()),
            accuracy_m: Some(coords.accuracy()),
        };
        let callback = success_slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(id, Ok(fix));
        }
    });
    let failure_slot = slot.clone();
    let failure = Closure::once_into_js(move |error: web_sys::PositionError| {
        let callback = failure_slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(id, Err(error_from_code(error.code())));
        }
    });

    let options = web_sys::PositionOptions::new();
    options.set_enable_high_accuracy(request.options.enable_high_accuracy);
    options.set_timeout(request.options.timeout_ms);
    options.set_maximum_age(request.options.maximum_age_ms);

    let issued = geolocation.get_current_position_with_error_callback_and_options(
        success.unchecked_ref::<js_sys::Function>(),
        Some(failure.unchecked_ref::<js_sys::Function>()),
        &options,
    );
    if let Err(e) = issued {
        tracing::warn!(?e, "getCurrentPosition rejected");
        let callback = slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(id, Err(GeolocationError::Unsupported));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_from_code(1), GeolocationError::PermissionDenied);
        assert_eq!(error_from_code(2), GeolocationError::PositionUnavailable);
        assert_eq!(error_from_code(3), GeolocationError::Timeout);
        assert_eq!(error_from_code(42), GeolocationError::PositionUnavailable);
    }
}
