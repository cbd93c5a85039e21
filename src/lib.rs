//! Scryfall SDK for Rust.
//!
//! Provides a client for the public, read-only [Scryfall](https://scryfall.com)
//! card API. Endpoint calls are rate limited client-side; bulk data exports
//! (hundreds of megabytes of JSON) are decoded incrementally so that only one
//! card is held in memory at a time.
//!
//! # Quick start
//!
//! ```no_run
//! use scryfall_sdk::{CancellationToken, ScryfallClient};
//!
//! let client = ScryfallClient::builder()
//!     .user_agent("my-collection-tracker/1.0")
//!     .build()
//!     .unwrap();
//! let cancel = CancellationToken::new();
//!
//! // Fetch a single card
//! let card = client.get_card_by_id(&cancel, "56ebc372-aabd-4174-a943-c7bf59e5028d").unwrap();
//!
//! // Stream the oracle cards export card by card
//! let bulk = client.get_bulk_data_by_type(&cancel, "oracle_cards").unwrap();
//! client
//!     .stream_bulk_data(&cancel, &bulk.download_uri, |card| {
//!         println!("{} {:?}", card.name, card.prices.usd);
//!         Ok(())
//!     }, None)
//!     .unwrap();
//! ```
//!
//! # Logging
//!
//! Requests and downloads emit [`tracing`] events. Nothing is printed unless
//! the application installs a subscriber.

pub mod api;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod rate_limit;
pub mod stream;

pub use api::CatalogApi;
#[cfg(feature = "async")]
pub use async_client::{AsyncScryfallClient, AsyncScryfallClientBuilder};
pub use cancel::CancellationToken;
pub use client::{ScryfallClient, ScryfallClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, Result, ScryfallError};
pub use models::{BulkData, Card, CardFace, CardPrices, CardSet};
pub use progress::{Progress, ProgressReader};
pub use rate_limit::{RateLimiter, TokenBucket, Unlimited};
pub use stream::{process_bulk_data_stream, process_bulk_file};
