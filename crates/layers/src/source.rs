use std::future::Future;

use foundation::GroupIndex;
use formats::{FormatError, GroupPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request never produced a response.
    Network(String),
    /// The backend answered with a non-success status.
    Status(u16),
    Malformed(FormatError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "network error: {msg}"),
            LoadError::Status(status) => write!(f, "backend returned HTTP {status}"),
            LoadError::Malformed(err) => write!(f, "malformed group data: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FormatError> for LoadError {
    fn from(err: FormatError) -> Self {
        LoadError::Malformed(err)
    }
}

/// Backend that serves one group's entries and tracks.
pub trait GroupSource {
    fn fetch_group(
        &self,
        group: GroupIndex,
    ) -> impl Future<Output = Result<GroupPayload, LoadError>>;
}
