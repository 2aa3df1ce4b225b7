//! Lookup requests and their results

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A validated query ready to be sent upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    /// 10-digit phone number
    Phone(String),
    /// Dotted address (shape-checked only)
    Ip(String),
}

impl LookupRequest {
    /// The raw query string
    pub fn query(&self) -> &str {
        match self {
            LookupRequest::Phone(number) => number,
            LookupRequest::Ip(address) => address,
        }
    }

    /// Kind of lookup
    pub fn kind(&self) -> LookupKind {
        match self {
            LookupRequest::Phone(_) => LookupKind::Phone,
            LookupRequest::Ip(_) => LookupKind::Ip,
        }
    }

    /// Text of the ephemeral message shown while the lookup runs
    pub fn progress_text(&self) -> &'static str {
        match self {
            LookupRequest::Phone(_) => "🔍 Searching database...",
            LookupRequest::Ip(_) => "🔍 Looking up IP...",
        }
    }
}

/// Which upstream a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Phone,
    Ip,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Phone => write!(f, "phone"),
            LookupKind::Ip => write!(f, "ip"),
        }
    }
}

/// Outcome of a single lookup. Consumed once by a formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// Phone records, in the order the upstream returned them
    Phone(Vec<PhoneRecord>),
    /// Geo-IP information
    Ip(IpInfo),
    /// Upstream answered but had nothing
    NotFound,
    /// Upstream could not be reached or answered garbage
    Error,
}

/// A single phone lookup record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub father_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alternate_mobile: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telecom_circle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_number: Option<String>,
}

/// Geo-IP information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, rename = "regionName", deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub isp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timezone: Option<String>,
}

/// Accepts strings, numbers and booleans; `null` and blank strings become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
