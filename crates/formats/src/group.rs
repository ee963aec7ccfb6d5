use std::collections::BTreeMap;

use foundation::{EntryId, LatLng, TrackId};
use serde::{Deserialize, Serialize};

use crate::float::lenient_f64;

/// Response body of `GET {group_endpoint}/{index}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPayload {
    pub entries: Vec<EntryRecord>,
    /// Track points keyed by track id. Omitted by the backend when no entry has a track.
    #[serde(default)]
    pub gps: BTreeMap<u64, Vec<TrackPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: u64,
    pub title: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: f64,
    pub gps_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diary: Option<DiaryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryRef {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    Json(String),
    MissingTrack { entry: EntryId, track: TrackId },
    EmptyTrack { entry: EntryId, track: TrackId },
    Config(String),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Json(msg) => write!(f, "invalid payload: {msg}"),
            FormatError::MissingTrack { entry, track } => {
                write!(f, "entry {entry} references missing track {track}")
            }
            FormatError::EmptyTrack { entry, track } => {
                write!(f, "entry {entry} references empty track {track}")
            }
            FormatError::Config(msg) => write!(f, "invalid viewer settings: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl GroupPayload {
    /// Decodes and validates a group payload.
    ///
    /// Every entry with a non-zero `gps_id` must have a non-empty track in `gps`.
    pub fn from_json_str(payload: &str) -> Result<Self, FormatError> {
        let parsed: GroupPayload =
            serde_json::from_str(payload).map_err(|e| FormatError::Json(e.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        for entry in &self.entries {
            let Some(track) = entry.track_id() else {
                continue;
            };
            match self.gps.get(&track.0) {
                None => {
                    return Err(FormatError::MissingTrack {
                        entry: entry.entry_id(),
                        track,
                    });
                }
                Some(points) if points.is_empty() => {
                    return Err(FormatError::EmptyTrack {
                        entry: entry.entry_id(),
                        track,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Track path for `track`, in recorded order.
    pub fn track_path(&self, track: TrackId) -> Option<Vec<LatLng>> {
        self.gps
            .get(&track.0)
            .map(|points| points.iter().map(TrackPoint::position).collect())
    }
}

impl EntryRecord {
    pub fn entry_id(&self) -> EntryId {
        EntryId(self.id)
    }

    pub fn track_id(&self) -> Option<TrackId> {
        TrackId::from_raw(self.gps_id)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Description text, treating blank strings as absent.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl TrackPoint {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}
