use std::cell::RefCell;
use std::rc::{Rc, Weak};

use foundation::{LatLng, LatLngBounds, MarkerId, PolylineId, PopupId};
use layers::MapApp;
use scene::{
    EventTarget, MapEvent, MapSurface, MarkerStyle, PointerKind, PolylineStyle, PrimitiveKey,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::gmaps::{
    AdvancedMarkerElement, InfoWindow, Map, PinElement, Polyline, bounds_literal, js_object,
    lat_lng_literal,
};

pub type SharedApp = Rc<RefCell<MapApp<GoogleMapSurface>>>;
pub type WeakApp = Weak<RefCell<MapApp<GoogleMapSurface>>>;

/// [`MapSurface`] backed by a live `google.maps.Map`.
///
/// SDK objects are kept in creation order; handles are indices into these
/// vectors. Listener closures live as long as the surface.
pub struct GoogleMapSurface {
    map: Map,
    app: WeakApp,
    markers: Vec<AdvancedMarkerElement>,
    polylines: Vec<Polyline>,
    popups: Vec<InfoWindow>,
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl GoogleMapSurface {
    pub fn new(map: Map, app: WeakApp) -> Self {
        Self {
            map,
            app,
            markers: Vec::new(),
            polylines: Vec::new(),
            popups: Vec::new(),
            listeners: Vec::new(),
        }
    }

    fn marker(&self, marker: MarkerId) -> Option<&AdvancedMarkerElement> {
        let found = self.markers.get(marker.0 as usize);
        if found.is_none() {
            warn!("unknown marker handle {}", marker.0);
        }
        found
    }

    fn polyline(&self, polyline: PolylineId) -> Option<&Polyline> {
        let found = self.polylines.get(polyline.0 as usize);
        if found.is_none() {
            warn!("unknown polyline handle {}", polyline.0);
        }
        found
    }

    /// Closure that forwards one SDK event into the app.
    fn listener(&self, key: PrimitiveKey, kind: PointerKind) -> Closure<dyn FnMut()> {
        let app = self.app.clone();
        Closure::wrap(Box::new(move || {
            let Some(app) = app.upgrade() else {
                return;
            };
            match app.try_borrow_mut() {
                Ok(mut app) => app.handle_event(MapEvent { key, kind }),
                Err(_) => debug!("map busy; dropped {kind:?} for entry {}", key.entry),
            }
        }) as Box<dyn FnMut()>)
    }
}

impl MapSurface for GoogleMapSurface {
    fn create_marker(&mut self, position: LatLng, style: &MarkerStyle, attached: bool) -> MarkerId {
        let pin = PinElement::new(&js_object(&[
            ("background", style.background.as_str().into()),
            ("borderColor", style.border.as_str().into()),
            ("glyphColor", style.glyph.as_str().into()),
            ("scale", style.scale.into()),
        ]));
        let map = if attached {
            JsValue::from(self.map.clone())
        } else {
            JsValue::NULL
        };
        let marker = AdvancedMarkerElement::new(&js_object(&[
            ("position", lat_lng_literal(position).into()),
            ("content", pin.element().into()),
            ("map", map),
        ]));
        self.markers.push(marker);
        MarkerId(self.markers.len() as u32 - 1)
    }

    fn set_marker_position(&mut self, marker: MarkerId, position: LatLng) {
        if let Some(m) = self.marker(marker) {
            m.set_position(&lat_lng_literal(position));
        }
    }

    fn set_marker_attached(&mut self, marker: MarkerId, attached: bool) {
        if let Some(m) = self.marker(marker) {
            m.set_map(attached.then_some(&self.map));
        }
    }

    fn create_polyline(
        &mut self,
        path: &[LatLng],
        style: &PolylineStyle,
        visible: bool,
    ) -> PolylineId {
        let points: js_sys::Array = path
            .iter()
            .map(|p| JsValue::from(lat_lng_literal(*p)))
            .collect();
        let polyline = Polyline::new(&js_object(&[
            ("path", points.into()),
            ("geodesic", style.geodesic.into()),
            ("strokeColor", style.stroke_color.into()),
            ("strokeOpacity", style.stroke_opacity.into()),
            ("visible", visible.into()),
            ("map", self.map.clone().into()),
        ]));
        self.polylines.push(polyline);
        PolylineId(self.polylines.len() as u32 - 1)
    }

    fn set_polyline_visible(&mut self, polyline: PolylineId, visible: bool) {
        if let Some(p) = self.polyline(polyline) {
            p.set_visible(visible);
        }
    }

    fn set_polyline_opacity(&mut self, polyline: PolylineId, opacity: f64) {
        if let Some(p) = self.polyline(polyline) {
            p.set_options(&js_object(&[("strokeOpacity", opacity.into())]));
        }
    }

    fn create_popup(&mut self, content: &str) -> PopupId {
        self.popups
            .push(InfoWindow::new(&js_object(&[("content", content.into())])));
        PopupId(self.popups.len() as u32 - 1)
    }

    fn open_popup(&mut self, popup: PopupId, anchor: MarkerId) {
        let (Some(window), Some(marker)) = (self.popups.get(popup.0 as usize), self.marker(anchor))
        else {
            warn!("cannot open popup {} at marker {}", popup.0, anchor.0);
            return;
        };
        window.open(&js_object(&[
            ("map", self.map.clone().into()),
            ("anchor", marker.clone().into()),
        ]));
    }

    fn close_popup(&mut self, popup: PopupId) {
        if let Some(window) = self.popups.get(popup.0 as usize) {
            window.close();
        }
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        if let Some(literal) = bounds_literal(bounds) {
            self.map.fit_bounds(&literal);
        }
    }

    fn subscribe(&mut self, target: EventTarget, key: PrimitiveKey) {
        match target {
            EventTarget::Marker(marker) => {
                let closure = self.listener(key, PointerKind::Click);
                if let Some(m) = self.marker(marker) {
                    m.add_listener("click", closure.as_ref().unchecked_ref());
                    self.listeners.push(closure);
                }
            }
            EventTarget::Polyline(polyline) => {
                for (event, kind) in [
                    ("click", PointerKind::Click),
                    ("mouseover", PointerKind::HoverIn),
                    ("mouseout", PointerKind::HoverOut),
                ] {
                    let closure = self.listener(key, kind);
                    if let Some(p) = self.polyline(polyline) {
                        p.add_listener(event, closure.as_ref().unchecked_ref());
                        self.listeners.push(closure);
                    }
                }
            }
        }
    }
}
