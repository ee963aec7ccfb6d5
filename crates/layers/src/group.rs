use std::collections::BTreeMap;

use foundation::{EntryId, GroupIndex, LatLng, MarkerId, PolylineId, PopupId};
use formats::GroupConfig;
use scene::MarkerStyle;

/// A group as rendered in the page: its configuration plus the user-facing
/// active flag.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayer {
    config: GroupConfig,
    marker_style: MarkerStyle,
    active: bool,
}

impl GroupLayer {
    pub fn new(config: GroupConfig) -> Self {
        let marker_style = MarkerStyle::for_group_color(&config.color);
        Self {
            config,
            marker_style,
            active: false,
        }
    }

    pub fn index(&self) -> GroupIndex {
        self.config.group_index()
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn marker_style(&self) -> &MarkerStyle {
        &self.marker_style
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub marker: MarkerId,
    /// Where the marker currently sits (track end for tracked entries).
    pub position: LatLng,
    pub attached: bool,
    /// Popup markup, built at load time.
    pub content: String,
    /// Created on first open.
    pub popup: Option<PopupId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineRecord {
    pub polyline: PolylineId,
    pub visible: bool,
}

/// Everything built on the map for one loaded group.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GroupPrimitives {
    pub markers: BTreeMap<EntryId, MarkerRecord>,
    pub polylines: BTreeMap<EntryId, PolylineRecord>,
}

impl GroupPrimitives {
    pub fn visible_positions(&self) -> impl Iterator<Item = LatLng> + '_ {
        self.markers
            .values()
            .filter(|m| m.attached)
            .map(|m| m.position)
    }
}

#[cfg(test)]
mod tests {
    use super::GroupLayer;
    use formats::GroupConfig;

    #[test]
    fn toggle_flips_and_reports() {
        let mut layer = GroupLayer::new(GroupConfig::new(3, "Alps", "#336699"));
        assert!(!layer.is_active());
        assert!(layer.toggle());
        assert!(!layer.toggle());
        assert_eq!(layer.marker_style().background, "#336699");
    }
}
