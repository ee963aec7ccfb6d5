use foundation::{EntryId, GroupIndex, TrackId};
use url::form_urlencoded;

/// Deep-link hints carried in the page URL.
///
/// `index` names the group to load first, `marker` an entry whose popup should
/// open, `path` a track to zoom to. All are optional; anything missing or not a
/// plain non-negative integer is ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UrlSelection {
    pub group: Option<GroupIndex>,
    pub entry: Option<EntryId>,
    pub track: Option<TrackId>,
}

impl UrlSelection {
    /// Parses the query part of a full `href`, ignoring any fragment.
    pub fn from_href(href: &str) -> Self {
        let Some((_, rest)) = href.split_once('?') else {
            return Self::default();
        };
        let query = rest.split('#').next().unwrap_or_default();
        Self::from_query(query)
    }

    /// Parses a query string, with or without the leading `?`. Keys and values
    /// are percent-decoded before matching.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            // Group 0 is a real group index; only entry and track ids use 0 as "none".
            group: first_id(query, "index")
                .and_then(|v| u32::try_from(v).ok())
                .map(GroupIndex),
            entry: first_id(query, "marker")
                .filter(|id| *id != 0)
                .map(EntryId),
            track: first_id(query, "path").and_then(TrackId::from_raw),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.entry.is_none() && self.track.is_none()
    }
}

/// Value of the first `key` pair, if it is a plain decimal integer.
fn first_id(query: &str, key: &str) -> Option<u64> {
    let (_, value) = form_urlencoded::parse(query.as_bytes()).find(|(k, _)| k == key)?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
