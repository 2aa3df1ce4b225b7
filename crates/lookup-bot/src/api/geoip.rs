//! Geo-IP API client (ip-api.com compatible)

use crate::engine::IpInfo;
use crate::error::{BotError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    info: IpInfo,
}

/// Geo-IP client
pub struct GeoIpClient {
    client: Client,
    base_url: Url,
}

impl GeoIpClient {
    /// Create a new geo-IP client; requests go to `<base_url>/json/<address>`
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("Failed to build geo-IP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, address: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BotError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("json")
            .push(address);
        Ok(url)
    }

    /// Look up an address.
    ///
    /// A body whose `status` is anything but `"success"` is reported as
    /// [`BotError::NotFound`].
    pub async fn lookup(&self, address: &str) -> Result<IpInfo> {
        let url = self.endpoint(address)?;
        let response = self.client.get(url).send().await?;

        debug!(status = %response.status(), "Geo-IP API responded");

        let body = response.error_for_status()?.text().await?;
        let parsed: GeoIpResponse = serde_json::from_str(&body)
            .map_err(|e| BotError::Decode(format!("Failed to parse geo-IP response: {e}")))?;

        if parsed.status.as_deref() != Some("success") {
            info!(
                address,
                status = parsed.status.as_deref().unwrap_or("<none>"),
                message = parsed.message.as_deref().unwrap_or(""),
                "Geo-IP lookup returned no data"
            );
            return Err(BotError::NotFound(address.to_string()));
        }

        Ok(parsed.info)
    }
}
