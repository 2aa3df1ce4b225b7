//! API clients for the lookup providers
//!
//! [`LookupService`] is the seam the conversation engine talks to. The HTTP
//! implementation downgrades every upstream failure into a [`LookupResult`]
//! so nothing past this boundary ever sees a transport error.

pub mod geoip;
pub mod phone;

pub use geoip::GeoIpClient;
pub use phone::PhoneClient;

use crate::config::BotConfig;
use crate::engine::{LookupKind, LookupResult};
use crate::error::{BotError, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Lookup operations used by the conversation engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Look up a 10-digit phone number
    async fn lookup_phone(&self, number: &str) -> LookupResult;

    /// Look up an address
    async fn lookup_ip(&self, address: &str) -> LookupResult;
}

/// HTTP-backed lookup service
pub struct HttpLookupClient {
    phone: PhoneClient,
    geoip: GeoIpClient,
}

impl HttpLookupClient {
    /// Create both clients from configuration
    pub fn new(config: &BotConfig) -> Result<Self> {
        Ok(Self {
            phone: PhoneClient::new(
                config.phone_api_url.clone(),
                config.phone_api_key.clone(),
                config.phone_timeout,
            )?,
            geoip: GeoIpClient::new(config.geoip_api_url.clone(), config.geoip_timeout)?,
        })
    }
}

/// Collapse a client result into a [`LookupResult`], logging transport
/// failures apart from empty answers.
fn settle<T>(
    kind: LookupKind,
    result: Result<T>,
    found: impl FnOnce(T) -> LookupResult,
) -> LookupResult {
    match result {
        Ok(value) => found(value),
        Err(BotError::NotFound(query)) => {
            info!(%kind, query = %query, "Lookup found nothing");
            LookupResult::NotFound
        }
        Err(e) if e.is_transport_failure() => {
            warn!(%kind, error = %e, "Lookup service unreachable or unreadable");
            LookupResult::Error
        }
        Err(e) => {
            error!(%kind, error = %e, "Lookup failed");
            LookupResult::Error
        }
    }
}

#[async_trait]
impl LookupService for HttpLookupClient {
    async fn lookup_phone(&self, number: &str) -> LookupResult {
        settle(LookupKind::Phone, self.phone.lookup(number).await, LookupResult::Phone)
    }

    async fn lookup_ip(&self, address: &str) -> LookupResult {
        settle(LookupKind::Ip, self.geoip.lookup(address).await, LookupResult::Ip)
    }
}
