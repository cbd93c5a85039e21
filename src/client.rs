//! Blocking Scryfall API client.
//!
//! Endpoint calls are rate limited and decoded whole. Bulk downloads bypass
//! the limiter (they are served from external storage) and are decoded
//! incrementally by [`process_bulk_data_stream`].

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::config::{endpoint_url, paths, ClientConfig};
use crate::error::{ApiError, Result, ScryfallError};
use crate::models::{BulkData, Card, CardSet, ListResponse};
use crate::progress::{classify_io, Cancellable, Progress, ProgressReader};
use crate::rate_limit::{RateLimiter, TokenBucket};
use crate::stream::process_bulk_data_stream;

// ---------------------------------------------------------------------------
// ScryfallClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ScryfallClient`].
///
/// Use [`ScryfallClient::builder()`] to obtain a builder, chain configuration
/// methods in any order, and call [`build()`](ScryfallClientBuilder::build).
#[derive(Default)]
pub struct ScryfallClientBuilder {
    config: ClientConfig,
    http: Option<Client>,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl ScryfallClientBuilder {
    /// Replace the whole configuration value.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the API base URL. Defaults to `https://api.scryfall.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the `User-Agent` header sent with every request.
    ///
    /// Scryfall asks clients to send a descriptive agent naming the
    /// application.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the HTTP timeout of the default client.
    ///
    /// Ignored when an explicit client is supplied with
    /// [`http_client()`](Self::http_client). Defaults to 15 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Configure the default token-bucket limiter.
    ///
    /// Ignored when an explicit limiter is supplied with
    /// [`rate_limiter()`](Self::rate_limiter). Defaults to 10 requests per
    /// second with a burst of 10.
    pub fn rate_limit(mut self, requests_per_second: f64, burst: u32) -> Self {
        self.config.requests_per_second = requests_per_second;
        self.config.burst = burst;
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Use a custom rate limiter, e.g. one shared with other clients.
    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// [`ScryfallError::InvalidArgument`] for an invalid base URL, empty user
    /// agent or non-positive rate limit; [`ScryfallError::Http`] if the
    /// default HTTP client cannot be created.
    pub fn build(self) -> Result<ScryfallClient> {
        let base_url = self.config.validate()?;

        let http = match self.http {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.config.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?,
        };

        let limiter: Arc<dyn RateLimiter> = match self.limiter {
            Some(limiter) => limiter,
            None => Arc::new(TokenBucket::new(
                self.config.requests_per_second,
                self.config.burst,
            )?),
        };

        Ok(ScryfallClient {
            http,
            base_url,
            user_agent: self.config.user_agent,
            limiter,
        })
    }
}

impl fmt::Debug for ScryfallClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScryfallClientBuilder")
            .field("config", &self.config)
            .field("custom_http", &self.http.is_some())
            .field("custom_limiter", &self.limiter.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ScryfallClient
// ---------------------------------------------------------------------------

/// Client for the public Scryfall API.
///
/// Cheap to clone; clones share the HTTP connection pool and the rate
/// limiter. Every operation runs on the calling thread and takes a
/// [`CancellationToken`] that aborts rate-limit waits and bulk reads.
#[derive(Clone)]
pub struct ScryfallClient {
    http: Client,
    base_url: Url,
    user_agent: String,
    limiter: Arc<dyn RateLimiter>,
}

impl ScryfallClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ScryfallClientBuilder {
        ScryfallClientBuilder::default()
    }

    /// Build a client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Base URL that endpoint paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `User-Agent` sent with every request, bulk downloads included.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    // -- Endpoint operations -----------------------------------------------

    /// Fetch a single card by its Scryfall id.
    pub fn get_card_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Card> {
        if id.is_empty() {
            return Err(ScryfallError::InvalidArgument("card id is required".into()));
        }
        self.get_json(cancel, &paths::card(id))
    }

    /// List the descriptors of all bulk data exports.
    pub fn list_bulk_data(&self, cancel: &CancellationToken) -> Result<Vec<BulkData>> {
        let list: ListResponse<BulkData> = self.get_json(cancel, paths::BULK_DATA)?;
        Ok(list.data)
    }

    /// List every set known to Scryfall.
    pub fn list_sets(&self, cancel: &CancellationToken) -> Result<Vec<CardSet>> {
        let list: ListResponse<CardSet> = self.get_json(cancel, paths::SETS)?;
        Ok(list.data)
    }

    /// Fetch one bulk data descriptor by its type (e.g. `"default_cards"`).
    pub fn get_bulk_data_by_type(
        &self,
        cancel: &CancellationToken,
        bulk_type: &str,
    ) -> Result<BulkData> {
        if bulk_type.is_empty() {
            return Err(ScryfallError::InvalidArgument("bulk type is required".into()));
        }
        self.get_json(cancel, &paths::bulk_data(bulk_type))
    }

    // -- Bulk downloads ----------------------------------------------------

    /// Download a bulk data file and decode it card by card.
    ///
    /// `on_card` is called once per card in file order; returning an error
    /// stops the download and that error is returned unchanged.
    /// `on_progress`, if given, is called after every read of the response
    /// body with the bytes read so far and the declared content length.
    pub fn stream_bulk_data<F>(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        on_card: F,
        on_progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<()>
    where
        F: FnMut(Card) -> Result<()>,
    {
        let resp = self.open_download(cancel, download_uri)?;
        info!(uri = download_uri, "downloading bulk data (streaming)");

        let total = resp.content_length();
        let body = Cancellable::new(resp, cancel.clone());
        match on_progress {
            Some(on_progress) => {
                process_bulk_data_stream(ProgressReader::new(body, total, on_progress), on_card)
            }
            None => process_bulk_data_stream(body, on_card),
        }
    }

    /// Resolve a bulk data descriptor by type and stream its file.
    pub fn stream_bulk_data_by_type<F>(
        &self,
        cancel: &CancellationToken,
        bulk_type: &str,
        on_card: F,
        on_progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<()>
    where
        F: FnMut(Card) -> Result<()>,
    {
        let bulk = self.get_bulk_data_by_type(cancel, bulk_type)?;
        self.stream_bulk_data(cancel, &bulk.download_uri, on_card, on_progress)
    }

    /// Download a bulk data file and collect every card into memory.
    ///
    /// The full `default_cards` export holds well over 100k cards; prefer
    /// [`stream_bulk_data`](Self::stream_bulk_data) for anything but small
    /// files.
    pub fn download_bulk_data(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
    ) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        self.stream_bulk_data(
            cancel,
            download_uri,
            |card| {
                cards.push(card);
                Ok(())
            },
            None,
        )?;
        Ok(cards)
    }

    /// Download a bulk data file verbatim to `path`.
    ///
    /// The body is written to a temporary sibling file and renamed into
    /// place on success, so an interrupted download never leaves a partial
    /// file at `path`.
    pub fn download_to_file<P: AsRef<Path>>(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        path: P,
        on_progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<()> {
        let dest = path.as_ref();
        let resp = self.open_download(cancel, download_uri)?;
        info!(uri = download_uri, path = %dest.display(), "downloading bulk data to file");

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let total = resp.content_length();
        let body = Cancellable::new(resp, cancel.clone());
        let tmp_dest = temp_path(dest);

        let result = match on_progress {
            Some(on_progress) => {
                write_file(ProgressReader::new(body, total, on_progress), &tmp_dest)
            }
            None => write_file(body, &tmp_dest),
        }
        .and_then(|()| fs::rename(&tmp_dest, dest).map_err(ScryfallError::from));

        if result.is_err() {
            // Clean up partial temp file on any error
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    // -- Request plumbing --------------------------------------------------

    fn request(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
    }

    /// Rate-limited GET of an API endpoint, decoding the whole body as `T`.
    fn get_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        segments: &[&str],
    ) -> Result<T> {
        self.limiter.until_ready(cancel)?;

        let url = endpoint_url(&self.base_url, segments)?;
        debug!(method = "GET", url = %url, "scryfall api request");

        cancel.check()?;
        let resp = self.request(url).send()?;
        let status = resp.status();

        if status.as_u16() >= 400 {
            let status = status.as_u16();
            let body = resp
                .bytes()
                .map_err(|source| ScryfallError::ErrorBodyRead { status, source })?;
            return Err(ApiError::from_body(status, &body)?.into());
        }
        let body = resp.bytes()?;

        serde_json::from_slice(&body)
            .map_err(|e| ScryfallError::malformed_with("decode response", e))
    }

    /// Unthrottled GET of an absolute bulk download location.
    fn open_download(&self, cancel: &CancellationToken, download_uri: &str) -> Result<Response> {
        if download_uri.is_empty() {
            return Err(ScryfallError::InvalidArgument(
                "download URI is required".into(),
            ));
        }
        cancel.check()?;

        let resp = self.request(download_uri).send()?;
        let status = resp.status();
        if status.as_u16() >= 400 {
            debug!(uri = download_uri, status = status.as_u16(), "bulk download rejected");
            return Err(ScryfallError::DownloadFailed {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

impl fmt::Debug for ScryfallClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScryfallClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// `cards.json` -> `cards.json.tmp`
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_file<R: Read>(mut reader: R, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    io::copy(&mut reader, &mut out).map_err(classify_io)?;
    out.flush()?;
    Ok(())
}
