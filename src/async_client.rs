//! Async wrapper around [`ScryfallClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every client operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the underlying blocking HTTP client waits on the network or the rate
//! limiter.
//!
//! # Example
//!
//! ```no_run
//! use scryfall_sdk::{AsyncScryfallClient, CancellationToken};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AsyncScryfallClient::builder().build().await.unwrap();
//!     let cancel = CancellationToken::new();
//!
//!     let bulk = client.get_bulk_data_by_type(&cancel, "oracle_cards").await.unwrap();
//!     let mut count = 0usize;
//!     client
//!         .run(move |c| {
//!             c.stream_bulk_data(&cancel, &bulk.download_uri, |_card| {
//!                 count += 1;
//!                 Ok(())
//!             }, None)?;
//!             Ok(count)
//!         })
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::client::{ScryfallClient, ScryfallClientBuilder};
use crate::error::{Result, ScryfallError};
use crate::models::{BulkData, Card, CardSet};
use crate::progress::Progress;

// ---------------------------------------------------------------------------
// AsyncScryfallClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncScryfallClient`].
///
/// Accepts the same settings as [`ScryfallClientBuilder`]; the blocking
/// client is constructed on the blocking pool.
#[derive(Debug, Default)]
pub struct AsyncScryfallClientBuilder {
    inner: ScryfallClientBuilder,
}

impl AsyncScryfallClientBuilder {
    /// Apply any [`ScryfallClientBuilder`] setting.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ScryfallClientBuilder) -> ScryfallClientBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    /// Build the async client.
    ///
    /// The blocking HTTP client owns an internal runtime of its own, so it is
    /// created on the blocking pool rather than on the async event loop.
    pub async fn build(self) -> Result<AsyncScryfallClient> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let client = inner.build()?;
            Ok(AsyncScryfallClient {
                inner: Arc::new(client),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncScryfallClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`ScryfallClient`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. Cancellation works the same as for the
/// blocking client: cancel the token passed to the call.
#[derive(Debug, Clone)]
pub struct AsyncScryfallClient {
    inner: Arc<ScryfallClient>,
}

impl AsyncScryfallClient {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncScryfallClientBuilder {
        AsyncScryfallClientBuilder::default()
    }

    /// Wrap an existing blocking client.
    pub fn from_client(client: ScryfallClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Run a blocking client operation on the blocking thread pool.
    ///
    /// The closure receives a `&ScryfallClient` and should return a
    /// `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ScryfallClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(join_error)?
    }

    pub async fn get_card_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Card> {
        let cancel = cancel.clone();
        let id = id.to_string();
        self.run(move |c| c.get_card_by_id(&cancel, &id)).await
    }

    pub async fn list_bulk_data(&self, cancel: &CancellationToken) -> Result<Vec<BulkData>> {
        let cancel = cancel.clone();
        self.run(move |c| c.list_bulk_data(&cancel)).await
    }

    pub async fn list_sets(&self, cancel: &CancellationToken) -> Result<Vec<CardSet>> {
        let cancel = cancel.clone();
        self.run(move |c| c.list_sets(&cancel)).await
    }

    pub async fn get_bulk_data_by_type(
        &self,
        cancel: &CancellationToken,
        bulk_type: &str,
    ) -> Result<BulkData> {
        let cancel = cancel.clone();
        let bulk_type = bulk_type.to_string();
        self.run(move |c| c.get_bulk_data_by_type(&cancel, &bulk_type))
            .await
    }

    /// Stream a bulk data file on the blocking pool.
    ///
    /// Callbacks run on the blocking thread, one card at a time in file
    /// order.
    pub async fn stream_bulk_data<F, P>(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        on_card: F,
        on_progress: Option<P>,
    ) -> Result<()>
    where
        F: FnMut(Card) -> Result<()> + Send + 'static,
        P: FnMut(Progress) + Send + 'static,
    {
        let cancel = cancel.clone();
        let download_uri = download_uri.to_string();
        self.run(move |c| {
            let mut on_progress = on_progress;
            c.stream_bulk_data(
                &cancel,
                &download_uri,
                on_card,
                on_progress.as_mut().map(|p| p as &mut dyn FnMut(Progress)),
            )
        })
        .await
    }

    /// Download a bulk data file and collect every card into memory.
    pub async fn download_bulk_data(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
    ) -> Result<Vec<Card>> {
        let cancel = cancel.clone();
        let download_uri = download_uri.to_string();
        self.run(move |c| c.download_bulk_data(&cancel, &download_uri))
            .await
    }

    /// Download a bulk data file verbatim to `path`.
    pub async fn download_to_file<P>(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        path: impl Into<PathBuf>,
        on_progress: Option<P>,
    ) -> Result<()>
    where
        P: FnMut(Progress) + Send + 'static,
    {
        let cancel = cancel.clone();
        let download_uri = download_uri.to_string();
        let path = path.into();
        self.run(move |c| {
            let mut on_progress = on_progress;
            c.download_to_file(
                &cancel,
                &download_uri,
                &path,
                on_progress.as_mut().map(|p| p as &mut dyn FnMut(Progress)),
            )
        })
        .await
    }
}

fn join_error(e: tokio::task::JoinError) -> ScryfallError {
    ScryfallError::Io(std::io::Error::other(format!("Task join error: {e}")))
}
