use std::time::Duration;

use reqwest::Url;

use crate::error::{Result, ScryfallError};

pub const API_BASE: &str = "https://api.scryfall.com";
pub const DEFAULT_USER_AGENT: &str = concat!("scryfall-sdk/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 10.0;
pub const DEFAULT_BURST: u32 = 10;

/// Endpoint paths as segment lists, appended to the configured base URL.
pub mod paths {
    pub const BULK_DATA: &[&str] = &["bulk-data"];
    pub const SETS: &[&str] = &["sets"];

    pub fn card(id: &str) -> [&str; 2] {
        ["cards", id]
    }

    pub fn bulk_data(bulk_type: &str) -> [&str; 2] {
        ["bulk-data", bulk_type]
    }
}

/// Append `segments` to the path of `base`, percent-encoding each one so a
/// caller-supplied id can never add path levels or a query string.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            ScryfallError::InvalidArgument(format!("base URL {} cannot take a path", base))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Construction-time settings for a [`ScryfallClient`](crate::ScryfallClient).
///
/// Every field starts at its default; overrides may be applied in any order
/// and are only checked by [`validate()`](Self::validate).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout for the default HTTP client.
    pub timeout: Duration,
    /// Average rate for the default limiter.
    pub requests_per_second: f64,
    /// Burst size for the default limiter.
    pub burst: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            burst: DEFAULT_BURST,
        }
    }
}

impl ClientConfig {
    /// Check all fields and return the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        if self.user_agent.trim().is_empty() {
            return Err(ScryfallError::InvalidArgument(
                "user agent must not be empty".into(),
            ));
        }
        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return Err(ScryfallError::InvalidArgument(format!(
                "requests per second must be positive, got {}",
                self.requests_per_second
            )));
        }
        if self.burst == 0 {
            return Err(ScryfallError::InvalidArgument(
                "burst must be at least 1".into(),
            ));
        }
        parse_base_url(&self.base_url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        ScryfallError::InvalidArgument(format!("invalid base url {:?}: {}", raw, e))
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ScryfallError::InvalidArgument(format!(
            "base url must be an absolute http(s) url, got {:?}",
            raw
        ))),
    }
}
