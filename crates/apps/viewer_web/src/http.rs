use std::future::Future;

use foundation::GroupIndex;
use formats::{GroupPayload, ViewerSettings};
use gloo_net::http::Request;
use layers::{GroupSource, LoadError};

/// Fetches group payloads from the backend with the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct HttpGroupSource {
    settings: ViewerSettings,
}

impl HttpGroupSource {
    pub fn new(settings: ViewerSettings) -> Self {
        Self { settings }
    }
}

impl GroupSource for HttpGroupSource {
    fn fetch_group(
        &self,
        group: GroupIndex,
    ) -> impl Future<Output = Result<GroupPayload, LoadError>> {
        let url = self.settings.group_url(group);
        async move {
            let resp = Request::get(&url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;
            if !resp.ok() {
                return Err(LoadError::Status(resp.status()));
            }
            let text = resp
                .text()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;
            GroupPayload::from_json_str(&text).map_err(LoadError::from)
        }
    }
}
