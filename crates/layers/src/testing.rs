//! Test doubles shared by this crate's unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;

use foundation::{GroupIndex, LatLng, LatLngBounds, MarkerId, PolylineId, PopupId};
use formats::GroupPayload;
use scene::{EventTarget, MapSurface, MarkerStyle, PolylineStyle, PrimitiveKey};

use crate::source::{GroupSource, LoadError};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState {
    pub position: LatLng,
    pub style: MarkerStyle,
    pub attached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineState {
    pub path: Vec<LatLng>,
    pub style: PolylineStyle,
    pub visible: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub content: String,
    pub open_at: Option<MarkerId>,
}

/// Records every call into plain vectors indexed by handle.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub markers: Vec<MarkerState>,
    pub polylines: Vec<PolylineState>,
    pub popups: Vec<PopupState>,
    pub fits: Vec<LatLngBounds>,
    pub subscriptions: Vec<(EventTarget, PrimitiveKey)>,
}

impl RecordingSurface {
    pub fn open_popups(&self) -> Vec<PopupId> {
        self.popups
            .iter()
            .enumerate()
            .filter(|(_, p)| p.open_at.is_some())
            .map(|(i, _)| PopupId(i as u32))
            .collect()
    }

    pub fn attached_markers(&self) -> usize {
        self.markers.iter().filter(|m| m.attached).count()
    }

    pub fn last_fit(&self) -> Option<LatLngBounds> {
        self.fits.last().copied()
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(&mut self, position: LatLng, style: &MarkerStyle, attached: bool) -> MarkerId {
        self.markers.push(MarkerState {
            position,
            style: style.clone(),
            attached,
        });
        MarkerId(self.markers.len() as u32 - 1)
    }

    fn set_marker_position(&mut self, marker: MarkerId, position: LatLng) {
        self.markers[marker.0 as usize].position = position;
    }

    fn set_marker_attached(&mut self, marker: MarkerId, attached: bool) {
        self.markers[marker.0 as usize].attached = attached;
    }

    fn create_polyline(
        &mut self,
        path: &[LatLng],
        style: &PolylineStyle,
        visible: bool,
    ) -> PolylineId {
        self.polylines.push(PolylineState {
            path: path.to_vec(),
            style: style.clone(),
            visible,
            opacity: style.stroke_opacity,
        });
        PolylineId(self.polylines.len() as u32 - 1)
    }

    fn set_polyline_visible(&mut self, polyline: PolylineId, visible: bool) {
        self.polylines[polyline.0 as usize].visible = visible;
    }

    fn set_polyline_opacity(&mut self, polyline: PolylineId, opacity: f64) {
        self.polylines[polyline.0 as usize].opacity = opacity;
    }

    fn create_popup(&mut self, content: &str) -> PopupId {
        self.popups.push(PopupState {
            content: content.to_string(),
            open_at: None,
        });
        PopupId(self.popups.len() as u32 - 1)
    }

    fn open_popup(&mut self, popup: PopupId, anchor: MarkerId) {
        self.popups[popup.0 as usize].open_at = Some(anchor);
    }

    fn close_popup(&mut self, popup: PopupId) {
        self.popups[popup.0 as usize].open_at = None;
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.fits.push(*bounds);
    }

    fn subscribe(&mut self, target: EventTarget, key: PrimitiveKey) {
        self.subscriptions.push((target, key));
    }
}

/// Serves canned JSON per group and counts every fetch.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub responses: BTreeMap<GroupIndex, Result<String, LoadError>>,
    pub fetches: RefCell<Vec<GroupIndex>>,
}

impl FakeSource {
    pub fn with(mut self, group: u32, response: Result<&str, LoadError>) -> Self {
        self.responses
            .insert(GroupIndex(group), response.map(str::to_string));
        self
    }

    pub fn fetch_count(&self, group: u32) -> usize {
        self.fetches
            .borrow()
            .iter()
            .filter(|g| **g == GroupIndex(group))
            .count()
    }
}

impl GroupSource for FakeSource {
    fn fetch_group(
        &self,
        group: GroupIndex,
    ) -> impl Future<Output = Result<GroupPayload, LoadError>> {
        self.fetches.borrow_mut().push(group);
        let response = self
            .responses
            .get(&group)
            .cloned()
            .unwrap_or(Err(LoadError::Status(404)));
        async move {
            let body = response?;
            GroupPayload::from_json_str(&body).map_err(LoadError::from)
        }
    }
}

/// Three entries: a plain one at (46.0, 14.5), one with track 9 ending at
/// (46.3, 14.9), and entry 5 at (45.8, 14.2).
pub const GROUP_JSON: &str = r#"{
    "entries": [
        {"id": 1, "title": "Ljubljana", "latitude": 46.0, "longitude": 14.5, "gps_id": 0},
        {"id": 2, "title": "Hike", "latitude": 46.1, "longitude": 14.6, "gps_id": 9,
         "description": "Up\nand down"},
        {"id": 5, "title": "Camp", "latitude": 45.8, "longitude": 14.2, "gps_id": 0}
    ],
    "gps": {
        "9": [
            {"lat": 46.1, "lon": 14.6},
            {"lat": "46.2", "lon": "14.8"},
            {"lat": 46.3, "lon": 14.9}
        ]
    }
}"#;

pub const SINGLE_JSON: &str = r#"{
    "entries": [{"id": 1, "title": "Solo", "latitude": 46.0, "longitude": 14.5, "gps_id": 0}]
}"#;
