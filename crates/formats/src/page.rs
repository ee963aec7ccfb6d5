use foundation::GroupIndex;
use serde::{Deserialize, Serialize};

use crate::group::FormatError;

/// Per-group configuration taken from the server-rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub index: u32,
    #[serde(default)]
    pub name: String,
    /// CSS hex color, e.g. `#cc3300`.
    pub color: String,
}

impl GroupConfig {
    pub fn new(index: u32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn group_index(&self) -> GroupIndex {
        GroupIndex(self.index)
    }

    /// Name for messages; falls back to the index when the page gave none.
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            format!("group {}", self.index)
        } else {
            self.name.clone()
        }
    }
}

/// Viewer-wide settings. Every field has a default so a partial (or absent)
/// configuration object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Base path of the per-group data endpoint; the group index is appended.
    pub group_endpoint: String,
    /// Base path of diary record pages linked from popups.
    pub diary_base: String,
    /// Map container height as a fraction of its width.
    pub aspect_ratio: f64,
    pub initial_zoom: u8,
    pub map_id: String,
    pub api_key: String,
    pub sdk_url: String,
    /// `tracing` filter directive for the browser console.
    pub log_filter: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            group_endpoint: "/map/group".to_string(),
            diary_base: "/diary".to_string(),
            aspect_ratio: 0.75,
            initial_zoom: 8,
            map_id: "DEMO_MAP_ID".to_string(),
            api_key: String::new(),
            sdk_url: "https://maps.googleapis.com/maps/api/js".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl ViewerSettings {
    pub fn from_json_str(raw: &str) -> Result<Self, FormatError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: ViewerSettings =
            serde_json::from_str(raw).map_err(|e| FormatError::Config(e.to_string()))?;
        if !(settings.aspect_ratio.is_finite() && settings.aspect_ratio > 0.0) {
            return Err(FormatError::Config(format!(
                "aspect_ratio must be positive, got {}",
                settings.aspect_ratio
            )));
        }
        Ok(settings)
    }

    pub fn group_url(&self, index: GroupIndex) -> String {
        format!("{}/{}", self.group_endpoint.trim_end_matches('/'), index)
    }

    pub fn diary_url(&self, diary_id: u64) -> String {
        format!("{}/{}", self.diary_base.trim_end_matches('/'), diary_id)
    }

    /// SDK script URL with the readiness callback wired in.
    pub fn sdk_script_url(&self, callback: &str) -> String {
        let mut url = format!(
            "{}?callback={callback}&libraries=marker&loading=async",
            self.sdk_url
        );
        if !self.api_key.is_empty() {
            url.push_str("&key=");
            url.push_str(&self.api_key);
        }
        url
    }
}
