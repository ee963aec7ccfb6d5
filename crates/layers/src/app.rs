use foundation::{GroupIndex, LatLngBounds};
use formats::{GroupConfig, ViewerSettings};
use runtime::{Notice, NoticeBus};
use scene::{
    MapEvent, MapSurface, PointerKind, PopupCoordinator, PrimitiveKey, TRACK_OPACITY_HOVER,
    TRACK_OPACITY_IDLE, fit_to_positions,
};
use streaming::{GroupCache, LoadTicket, ResidencyState};
use tracing::{debug, warn};

use crate::group::{GroupLayer, GroupPrimitives};
use crate::selection::UrlSelection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    UnknownGroup(GroupIndex),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::UnknownGroup(group) => write!(f, "no group {group} on this page"),
        }
    }
}

impl std::error::Error for ViewerError {}

/// Application context for one map page.
///
/// Owns the map surface and all state derived from it. The browser binding keeps
/// it in an `Rc<RefCell<_>>`; every method here runs synchronously inside one
/// borrow.
pub struct MapApp<M> {
    pub(crate) surface: M,
    pub(crate) settings: ViewerSettings,
    /// Page order.
    pub(crate) groups: Vec<GroupLayer>,
    pub(crate) cache: GroupCache<GroupPrimitives>,
    /// Every entry position seen so far, across all loaded groups.
    pub(crate) full_bounds: LatLngBounds,
    pub(crate) popups: PopupCoordinator,
    pub(crate) selection: UrlSelection,
    pub(crate) default_group: Option<GroupIndex>,
    /// URL entry/track hints are applied once, to the default group's first load.
    pub(crate) hints_pending: bool,
    pub(crate) notices: NoticeBus,
}

impl<M: MapSurface> MapApp<M> {
    /// Builds the context and starts loading the default group.
    ///
    /// The default group is the one named by the URL if it exists on the page,
    /// otherwise the first group. The returned ticket must be driven to
    /// completion by the caller (see [`crate::driver::run_load`]).
    pub fn bootstrap(
        surface: M,
        settings: ViewerSettings,
        groups: Vec<GroupConfig>,
        selection: UrlSelection,
    ) -> (Self, Option<LoadTicket>) {
        let mut layers: Vec<GroupLayer> = Vec::with_capacity(groups.len());
        for config in groups {
            if layers.iter().any(|l| l.index() == config.group_index()) {
                warn!("duplicate group {} in page markup; keeping the first", config.index);
                continue;
            }
            layers.push(GroupLayer::new(config));
        }

        let hinted = selection
            .group
            .filter(|g| layers.iter().any(|l| l.index() == *g));
        if let (Some(g), None) = (selection.group, hinted) {
            warn!("URL names group {g}, which is not on this page");
        }
        let default_group = hinted.or_else(|| layers.first().map(GroupLayer::index));

        let mut app = Self {
            surface,
            settings,
            groups: layers,
            cache: GroupCache::new(),
            full_bounds: LatLngBounds::empty(),
            popups: PopupCoordinator::new(),
            selection,
            default_group,
            hints_pending: true,
            notices: NoticeBus::new(),
        };

        let ticket = match default_group {
            Some(group) => {
                if let Some(layer) = app.group_mut(group) {
                    layer.set_active(true);
                }
                app.begin_load(group)
            }
            None => {
                debug!("page has no map groups");
                None
            }
        };
        (app, ticket)
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn groups(&self) -> &[GroupLayer] {
        &self.groups
    }

    pub fn group(&self, group: GroupIndex) -> Option<&GroupLayer> {
        self.groups.iter().find(|l| l.index() == group)
    }

    pub(crate) fn group_mut(&mut self, group: GroupIndex) -> Option<&mut GroupLayer> {
        self.groups.iter_mut().find(|l| l.index() == group)
    }

    pub fn is_active(&self, group: GroupIndex) -> bool {
        self.group(group).is_some_and(GroupLayer::is_active)
    }

    pub fn default_group(&self) -> Option<GroupIndex> {
        self.default_group
    }

    pub fn load_state(&self, group: GroupIndex) -> Option<ResidencyState> {
        self.cache.state(group)
    }

    pub fn primitives(&self, group: GroupIndex) -> Option<&GroupPrimitives> {
        self.cache.get(group)
    }

    pub fn full_bounds(&self) -> &LatLngBounds {
        &self.full_bounds
    }

    pub fn popups(&self) -> &PopupCoordinator {
        &self.popups
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fits the viewport to every attached marker, or to the full bounds when
    /// none are attached.
    pub fn fit_to_visible(&mut self) -> Option<LatLngBounds> {
        let visible: Vec<_> = self
            .cache
            .iter_resident()
            .flat_map(|(_, prims)| prims.visible_positions())
            .collect();
        fit_to_positions(&mut self.surface, visible, &self.full_bounds)
    }

    /// Routes a pointer event from the surface.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event.kind {
            PointerKind::Click => {
                self.open_entry_popup(event.key);
            }
            PointerKind::HoverIn => self.set_track_opacity(event.key, TRACK_OPACITY_HOVER),
            PointerKind::HoverOut => self.set_track_opacity(event.key, TRACK_OPACITY_IDLE),
        }
    }

    /// Opens the popup of one entry, creating it on first use. Any other open
    /// popup is closed first.
    pub fn open_entry_popup(&mut self, key: PrimitiveKey) -> bool {
        let Some(record) = self
            .cache
            .get_mut(key.group)
            .and_then(|prims| prims.markers.get_mut(&key.entry))
        else {
            debug!("no marker for entry {} in group {}", key.entry, key.group);
            return false;
        };
        let popup = match record.popup {
            Some(popup) => popup,
            None => {
                let popup = self.surface.create_popup(&record.content);
                record.popup = Some(popup);
                popup
            }
        };
        self.popups.open(&mut self.surface, popup, record.marker);
        true
    }

    fn set_track_opacity(&mut self, key: PrimitiveKey, opacity: f64) {
        let polyline = self
            .cache
            .get(key.group)
            .and_then(|prims| prims.polylines.get(&key.entry))
            .map(|p| p.polyline);
        if let Some(polyline) = polyline {
            self.surface.set_polyline_opacity(polyline, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapApp;
    use crate::selection::UrlSelection;
    use crate::testing::{GROUP_JSON, RecordingSurface};
    use foundation::{EntryId, GroupIndex};
    use formats::{GroupConfig, GroupPayload, ViewerSettings};
    use pretty_assertions::assert_eq;
    use scene::{MapEvent, PointerKind, PrimitiveKey};

    fn configs() -> Vec<GroupConfig> {
        vec![
            GroupConfig::new(4, "Four", "#cc3300"),
            GroupConfig::new(7, "Seven", "#336699"),
        ]
    }

    fn boot(query: &str) -> (MapApp<RecordingSurface>, Option<streaming::LoadTicket>) {
        MapApp::bootstrap(
            RecordingSurface::default(),
            ViewerSettings::default(),
            configs(),
            UrlSelection::from_query(query),
        )
    }

    #[test]
    fn default_group_is_first_without_hint() {
        let (app, ticket) = boot("");
        assert_eq!(app.default_group(), Some(GroupIndex(4)));
        assert_eq!(ticket.map(|t| t.group()), Some(GroupIndex(4)));
        assert!(app.is_active(GroupIndex(4)));
        assert!(!app.is_active(GroupIndex(7)));
    }

    #[test]
    fn url_hint_picks_default_group() {
        let (app, _) = boot("index=7");
        assert_eq!(app.default_group(), Some(GroupIndex(7)));
    }

    #[test]
    fn unknown_hint_falls_back_to_first_group() {
        let (app, _) = boot("index=99");
        assert_eq!(app.default_group(), Some(GroupIndex(4)));
    }

    #[test]
    fn empty_page_loads_nothing() {
        let (app, ticket) = MapApp::bootstrap(
            RecordingSurface::default(),
            ViewerSettings::default(),
            Vec::new(),
            UrlSelection::default(),
        );
        assert_eq!(ticket, None);
        assert_eq!(app.default_group(), None);
    }

    #[test]
    fn duplicate_groups_keep_the_first() {
        let mut groups = configs();
        groups.push(GroupConfig::new(4, "Again", "#000000"));
        let (app, _) = MapApp::bootstrap(
            RecordingSurface::default(),
            ViewerSettings::default(),
            groups,
            UrlSelection::default(),
        );
        assert_eq!(app.groups().len(), 2);
        assert_eq!(app.group(GroupIndex(4)).map(|g| g.config().name.as_str()), Some("Four"));
    }

    #[test]
    fn hover_raises_track_opacity() {
        let (mut app, ticket) = boot("");
        let payload = GroupPayload::from_json_str(GROUP_JSON).expect("payload");
        app.finish_load(ticket.expect("load"), Ok(payload));
        let key = PrimitiveKey::new(GroupIndex(4), EntryId(2));

        app.handle_event(MapEvent {
            key,
            kind: PointerKind::HoverIn,
        });
        assert_eq!(app.surface().polylines[0].opacity, 1.0);
        app.handle_event(MapEvent {
            key,
            kind: PointerKind::HoverOut,
        });
        assert_eq!(app.surface().polylines[0].opacity, 0.5);
    }

    #[test]
    fn popup_is_built_once_and_reused() {
        let (mut app, ticket) = boot("");
        let payload = GroupPayload::from_json_str(GROUP_JSON).expect("payload");
        app.finish_load(ticket.expect("load"), Ok(payload));
        let p = PrimitiveKey::new(GroupIndex(4), EntryId(1));
        let q = PrimitiveKey::new(GroupIndex(4), EntryId(5));

        for key in [p, q, p] {
            app.handle_event(MapEvent {
                key,
                kind: PointerKind::Click,
            });
        }

        assert_eq!(app.surface().popups.len(), 2);
        assert_eq!(app.popups().len(), 2);
        let p_popup = app.primitives(GroupIndex(4)).expect("resident").markers[&EntryId(1)].popup;
        assert_eq!(app.surface().open_popups(), p_popup.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn click_on_unloaded_group_is_ignored() {
        let (mut app, _) = boot("");
        assert!(!app.open_entry_popup(PrimitiveKey::new(GroupIndex(7), EntryId(1))));
        assert!(app.surface().popups.is_empty());
    }
}
