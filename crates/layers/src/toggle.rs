use foundation::GroupIndex;
use scene::MapSurface;
use streaming::LoadTicket;
use tracing::debug;

use crate::app::{MapApp, ViewerError};

impl<M: MapSurface> MapApp<M> {
    /// Handles a click on a group's toggle affordance.
    ///
    /// A group that was never requested starts loading; the ticket is returned
    /// for the caller to drive. A loaded group has every marker and track
    /// flipped. A group whose load is still in flight only changes its active
    /// flag; its primitives pick that up when the load lands.
    pub fn toggle_group(&mut self, group: GroupIndex) -> Result<Option<LoadTicket>, ViewerError> {
        let active = self
            .group_mut(group)
            .ok_or(ViewerError::UnknownGroup(group))?
            .toggle();
        debug!("group {group} toggled {}", if active { "on" } else { "off" });

        self.popups.close_all(&mut self.surface);

        let ticket = if self.cache.contains(group) {
            if let Some(prims) = self.cache.get_mut(group) {
                for record in prims.markers.values_mut() {
                    record.attached = !record.attached;
                    self.surface.set_marker_attached(record.marker, record.attached);
                }
                for record in prims.polylines.values_mut() {
                    record.visible = !record.visible;
                    self.surface.set_polyline_visible(record.polyline, record.visible);
                }
            }
            None
        } else {
            self.begin_load(group)
        };

        self.fit_to_visible();
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{MapApp, ViewerError};
    use crate::selection::UrlSelection;
    use crate::testing::{GROUP_JSON, RecordingSurface};
    use foundation::{EntryId, GroupIndex};
    use formats::{GroupConfig, GroupPayload, ViewerSettings};
    use pretty_assertions::assert_eq;
    use scene::PrimitiveKey;

    fn loaded() -> MapApp<RecordingSurface> {
        let (mut app, ticket) = MapApp::bootstrap(
            RecordingSurface::default(),
            ViewerSettings::default(),
            vec![GroupConfig::new(1, "One", "#cc3300"), GroupConfig::new(2, "Two", "#336699")],
            UrlSelection::default(),
        );
        let payload = GroupPayload::from_json_str(GROUP_JSON).expect("payload");
        app.finish_load(ticket.expect("load"), Ok(payload));
        app
    }

    #[test]
    fn toggling_twice_restores_visibility() {
        let mut app = loaded();
        let before_markers = app.surface().markers.clone();
        let before_lines = app.surface().polylines.clone();

        assert_eq!(app.toggle_group(GroupIndex(1)), Ok(None));
        assert!(!app.is_active(GroupIndex(1)));
        assert_eq!(app.surface().attached_markers(), 0);
        assert!(app.surface().polylines.iter().all(|p| !p.visible));

        assert_eq!(app.toggle_group(GroupIndex(1)), Ok(None));
        assert!(app.is_active(GroupIndex(1)));
        assert_eq!(app.surface().markers, before_markers);
        assert_eq!(app.surface().polylines, before_lines);
    }

    #[test]
    fn hiding_everything_fits_to_full_bounds() {
        let mut app = loaded();
        app.toggle_group(GroupIndex(1)).expect("known");
        assert_eq!(app.surface().last_fit(), Some(*app.full_bounds()));
    }

    #[test]
    fn toggle_closes_open_popup() {
        let mut app = loaded();
        assert!(app.open_entry_popup(PrimitiveKey::new(GroupIndex(1), EntryId(5))));
        assert_eq!(app.surface().open_popups().len(), 1);

        app.toggle_group(GroupIndex(2)).expect("known");
        assert!(app.surface().open_popups().is_empty());
    }

    #[test]
    fn unknown_group_is_an_error() {
        let mut app = loaded();
        assert_eq!(
            app.toggle_group(GroupIndex(9)),
            Err(ViewerError::UnknownGroup(GroupIndex(9)))
        );
    }
}
