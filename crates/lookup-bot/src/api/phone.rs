//! Phone lookup API client
//!
//! The upstream answers `GET <url>?key=<key>&phone=<number>` with
//! `{"success": bool, "results": [ {...record...}, ... ]}`.

use crate::engine::PhoneRecord;
use crate::error::{BotError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;
use url::Url;

#[derive(Debug, Deserialize)]
struct PhoneResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<PhoneRecord>,
}

/// Phone lookup client
pub struct PhoneClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl PhoneClient {
    /// Create a new phone lookup client
    ///
    /// # Arguments
    /// * `base_url` - Lookup endpoint
    /// * `api_key` - Key sent as the `key` query parameter
    /// * `timeout` - Whole-request timeout
    pub fn new(base_url: Url, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("Failed to build phone lookup client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Look up a phone number.
    ///
    /// Returns the records in the order received. `success: false` or an
    /// empty result list is reported as [`BotError::NotFound`].
    pub async fn lookup(&self, number: &str) -> Result<Vec<PhoneRecord>> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("key", self.api_key.as_str()), ("phone", number)])
            .send()
            .await?;

        info!(status = %response.status(), "Phone lookup API responded");

        let body = response.error_for_status()?.text().await?;
        let parsed: PhoneResponse = serde_json::from_str(&body)
            .map_err(|e| BotError::Decode(format!("Failed to parse phone lookup response: {e}")))?;

        if !parsed.success || parsed.results.is_empty() {
            return Err(BotError::NotFound(number.to_string()));
        }

        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn spawn(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/num.php")).unwrap()
    }

    fn client(url: Url) -> PhoneClient {
        PhoneClient::new(url, "test-key", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_records_in_order() {
        let router = Router::new().route(
            "/num.php",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
                let phone = params.get("phone").cloned().unwrap_or_default();
                Json(serde_json::json!({
                    "success": true,
                    "results": [
                        {"name": "First", "mobile": phone},
                        {"name": "Second"},
                        {"name": "First", "mobile": phone}
                    ]
                }))
            }),
        );
        let records = client(spawn(router).await).lookup("9876543210").await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name.as_deref(), Some("First"));
        assert_eq!(records[0].mobile.as_deref(), Some("9876543210"));
        assert_eq!(records[1].name.as_deref(), Some("Second"));
        assert_eq!(records[2], records[0]);
    }

    #[tokio::test]
    async fn test_unsuccessful_is_not_found() {
        let router = Router::new().route(
            "/num.php",
            get(|| async { Json(serde_json::json!({"success": false})) }),
        );
        let err = client(spawn(router).await).lookup("9876543210").await.unwrap_err();
        assert!(matches!(err, BotError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_results_is_not_found() {
        let router = Router::new().route(
            "/num.php",
            get(|| async { Json(serde_json::json!({"success": true, "results": []})) }),
        );
        let err = client(spawn(router).await).lookup("9876543210").await.unwrap_err();
        assert!(matches!(err, BotError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_network_failure() {
        let router = Router::new().route(
            "/num.php",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let err = client(spawn(router).await).lookup("9876543210").await.unwrap_err();
        assert!(matches!(err, BotError::Network(_)));
    }

    #[tokio::test]
    async fn test_html_body_is_decode_failure() {
        let router = Router::new().route(
            "/num.php",
            get(|| async { "<html>checking your browser</html>" }),
        );
        let err = client(spawn(router).await).lookup("9876543210").await.unwrap_err();
        assert!(matches!(err, BotError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let router = Router::new().route(
            "/num.php",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({"success": true, "results": [{}]}))
            }),
        );
        let url = spawn(router).await;
        let client = PhoneClient::new(url, "k", Duration::from_millis(200)).unwrap();
        let err = client.lookup("9876543210").await.unwrap_err();
        assert!(err.is_transport_failure());
    }
}
