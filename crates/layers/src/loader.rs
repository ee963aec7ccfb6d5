use foundation::{EntryId, GroupIndex, LatLngBounds};
use formats::GroupPayload;
use runtime::NoticeLevel;
use scene::{EventTarget, MapSurface, PolylineStyle, PrimitiveKey, fit_to_positions};
use streaming::LoadTicket;
use tracing::{debug, info, warn};

use crate::app::MapApp;
use crate::content::popup_html;
use crate::group::{GroupPrimitives, MarkerRecord, PolylineRecord};
use crate::source::LoadError;

/// What `finish_load` did with a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded {
        markers: usize,
        polylines: usize,
        /// The viewport was fitted to the URL-selected track.
        track_fitted: bool,
    },
    Failed(LoadError),
    /// The ticket no longer matches a reserved slot; nothing was changed.
    Stale,
}

impl<M: MapSurface> MapApp<M> {
    /// Reserves the cache slot for `group`.
    ///
    /// Returns `None` when the group is unknown or was already requested
    /// (loading or loaded). The reservation is the only guard against
    /// duplicate fetches, so callers must not fetch without a ticket.
    pub fn begin_load(&mut self, group: GroupIndex) -> Option<LoadTicket> {
        if self.group(group).is_none() {
            warn!("ignoring load for unknown group {group}");
            return None;
        }
        match self.cache.reserve(group) {
            Ok(ticket) => {
                info!("loading group {group} from {}", self.settings.group_url(group));
                Some(ticket)
            }
            Err(err) => {
                debug!("not loading group {group}: {err}");
                None
            }
        }
    }

    /// Applies the result of a fetch started by [`MapApp::begin_load`].
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<GroupPayload, LoadError>,
    ) -> LoadOutcome {
        if !self.cache.is_current(ticket) {
            warn!(
                "dropping result for group {} (seq {}): ticket is stale",
                ticket.group(),
                ticket.seq()
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(payload) => self.apply_payload(ticket, &payload),
            Err(err) => self.fail_load(ticket, err),
        }
    }

    fn apply_payload(&mut self, ticket: LoadTicket, payload: &GroupPayload) -> LoadOutcome {
        let group = ticket.group();
        let Some(style) = self.group(group).map(|l| l.marker_style().clone()) else {
            warn!("dropping payload for unknown group {group}");
            if let Err(err) = self.cache.release(ticket) {
                warn!("could not release slot for group {group}: {err}");
            }
            return LoadOutcome::Stale;
        };
        let attached = self.is_active(group);

        let use_hints = self.hints_pending && self.default_group == Some(group);
        if use_hints {
            self.hints_pending = false;
        }
        let selected_entry = self.selection.entry.filter(|_| use_hints);
        let selected_track = self.selection.track.filter(|_| use_hints);

        let mut prims = GroupPrimitives::default();
        let mut track_fitted = false;
        let mut auto_open: Option<EntryId> = None;

        for (i, entry) in payload.entries.iter().enumerate() {
            let entry_id = entry.entry_id();
            if prims.markers.contains_key(&entry_id) {
                warn!("group {group} lists entry {entry_id} twice; skipping the repeat");
                continue;
            }
            let key = PrimitiveKey::new(group, entry_id);
            let position = entry.position();

            let marker = self.surface.create_marker(position, &style, attached);
            self.full_bounds.extend(position);
            self.surface.subscribe(EventTarget::Marker(marker), key);
            let mut record = MarkerRecord {
                marker,
                position,
                attached,
                content: popup_html(entry, &self.settings),
                popup: None,
            };

            let track = entry.track_id();
            let path = track.and_then(|t| payload.track_path(t)).unwrap_or_default();
            if let (Some(track), Some(&end)) = (track, path.last()) {
                let line_style = PolylineStyle::for_position(i);
                let polyline = self.surface.create_polyline(&path, &line_style, attached);
                if attached && selected_track == Some(track) {
                    let track_bounds = fit_to_positions(
                        &mut self.surface,
                        path.iter().copied(),
                        &LatLngBounds::empty(),
                    );
                    track_fitted |= track_bounds.is_some();
                }
                self.surface.set_marker_position(marker, end);
                record.position = end;
                self.surface.subscribe(EventTarget::Polyline(polyline), key);
                prims.polylines.insert(
                    entry_id,
                    PolylineRecord {
                        polyline,
                        visible: attached,
                    },
                );
            }

            if attached && selected_entry == Some(entry_id) {
                auto_open = Some(entry_id);
            }
            prims.markers.insert(entry_id, record);
        }

        let markers = prims.markers.len();
        let polylines = prims.polylines.len();
        if let Err(err) = self.cache.fill(ticket, prims) {
            warn!("could not store group {group}: {err}");
            return LoadOutcome::Stale;
        }
        info!("group {group} loaded: {markers} markers, {polylines} tracks");

        if let Some(entry) = auto_open {
            self.open_entry_popup(PrimitiveKey::new(group, entry));
        }
        if !track_fitted {
            self.fit_to_visible();
        }

        LoadOutcome::Loaded {
            markers,
            polylines,
            track_fitted,
        }
    }

    fn fail_load(&mut self, ticket: LoadTicket, err: LoadError) -> LoadOutcome {
        let group = ticket.group();
        if let Err(release_err) = self.cache.release(ticket) {
            warn!("could not release slot for group {group}: {release_err}");
        }
        let label = match self.group_mut(group) {
            Some(layer) => {
                layer.set_active(false);
                layer.config().label()
            }
            None => format!("group {group}"),
        };
        warn!("loading group {group} failed: {err}");
        self.notices.emit(
            NoticeLevel::Error,
            "group_load_failed",
            format!("Could not load {label}: {err}"),
        );
        LoadOutcome::Failed(err)
    }
}
