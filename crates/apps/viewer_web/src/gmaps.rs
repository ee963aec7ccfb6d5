//! Bindings for the parts of the Google Maps JavaScript API the viewer uses.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use foundation::{LatLng, LatLngBounds};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(container: &HtmlElement, options: &Object) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &Object);

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Debug, Clone)]
    pub type Polyline;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(options: &Object) -> Polyline;

    #[wasm_bindgen(method, js_name = setVisible)]
    pub fn set_visible(this: &Polyline, visible: bool);

    #[wasm_bindgen(method, js_name = setOptions)]
    pub fn set_options(this: &Polyline, options: &Object);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Polyline, event: &str, handler: &Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Debug, Clone)]
    pub type InfoWindow;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(options: &Object) -> InfoWindow;

    #[wasm_bindgen(method)]
    pub fn open(this: &InfoWindow, options: &Object);

    #[wasm_bindgen(method)]
    pub fn close(this: &InfoWindow);

    #[wasm_bindgen(js_namespace = ["google", "maps", "marker"])]
    #[derive(Debug, Clone)]
    pub type AdvancedMarkerElement;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps", "marker"])]
    pub fn new(options: &Object) -> AdvancedMarkerElement;

    #[wasm_bindgen(method, setter)]
    pub fn set_map(this: &AdvancedMarkerElement, map: Option<&Map>);

    #[wasm_bindgen(method, setter)]
    pub fn set_position(this: &AdvancedMarkerElement, position: &Object);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &AdvancedMarkerElement, event: &str, handler: &Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps", "marker"])]
    #[derive(Debug, Clone)]
    pub type PinElement;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps", "marker"])]
    pub fn new(options: &Object) -> PinElement;

    #[wasm_bindgen(method, getter)]
    pub fn element(this: &PinElement) -> HtmlElement;
}

/// Builds a plain JS options object.
pub fn js_object(entries: &[(&str, JsValue)]) -> Object {
    let object = Object::new();
    for (key, value) in entries {
        // Setting a property on a fresh plain object cannot fail.
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object
}

pub fn lat_lng_literal(p: LatLng) -> Object {
    js_object(&[("lat", p.lat.into()), ("lng", p.lng.into())])
}

/// `LatLngBoundsLiteral`; `None` for empty bounds.
pub fn bounds_literal(bounds: &LatLngBounds) -> Option<Object> {
    let sw = bounds.south_west()?;
    let ne = bounds.north_east()?;
    Some(js_object(&[
        ("south", sw.lat.into()),
        ("west", sw.lng.into()),
        ("north", ne.lat.into()),
        ("east", ne.lng.into()),
    ]))
}

/// Follows a chain of property names from `root`, stopping at the first
/// missing one.
pub fn js_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for key in path {
        let next = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if next.is_undefined() || next.is_null() {
            return None;
        }
        current = next;
    }
    Some(current)
}

/// True once `google.maps` and the marker library are loaded.
pub fn sdk_loaded(window: &JsValue) -> bool {
    let has = |path: &[&str]| js_path(window, path).is_some_and(|v| v.is_function());
    has(&["google", "maps", "Map"]) && has(&["google", "maps", "marker", "AdvancedMarkerElement"])
}
