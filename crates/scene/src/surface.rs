use foundation::{EntryId, GroupIndex, LatLng, LatLngBounds, MarkerId, PolylineId, PopupId};

use crate::style::{MarkerStyle, PolylineStyle};

/// Identifies the entry a map primitive was built for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveKey {
    pub group: GroupIndex,
    pub entry: EntryId,
}

impl PrimitiveKey {
    pub fn new(group: GroupIndex, entry: EntryId) -> Self {
        Self { group, entry }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    HoverIn,
    HoverOut,
}

/// Pointer interaction reported back by the surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapEvent {
    pub key: PrimitiveKey,
    pub kind: PointerKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventTarget {
    Marker(MarkerId),
    Polyline(PolylineId),
}

/// The map rendering service, as far as the viewer core needs it.
///
/// Implementations own the actual SDK objects and hand out opaque handles.
/// Markers report `Click`; polylines report `Click`, `HoverIn` and `HoverOut`.
/// Events for a subscribed primitive are delivered as [`MapEvent`]s carrying the
/// key given to [`MapSurface::subscribe`].
pub trait MapSurface {
    fn create_marker(&mut self, position: LatLng, style: &MarkerStyle, attached: bool) -> MarkerId;
    fn set_marker_position(&mut self, marker: MarkerId, position: LatLng);
    /// Attaches the marker to (or detaches it from) the map.
    fn set_marker_attached(&mut self, marker: MarkerId, attached: bool);

    fn create_polyline(
        &mut self,
        path: &[LatLng],
        style: &PolylineStyle,
        visible: bool,
    ) -> PolylineId;
    fn set_polyline_visible(&mut self, polyline: PolylineId, visible: bool);
    fn set_polyline_opacity(&mut self, polyline: PolylineId, opacity: f64);

    fn create_popup(&mut self, content: &str) -> PopupId;
    fn open_popup(&mut self, popup: PopupId, anchor: MarkerId);
    fn close_popup(&mut self, popup: PopupId);

    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    fn subscribe(&mut self, target: EventTarget, key: PrimitiveKey);
}
