//! Substitutable capability boundary over the client.
//!
//! Downstream code that depends on [`CatalogApi`] rather than
//! [`ScryfallClient`] can be tested against a lightweight fake.

use crate::cancel::CancellationToken;
use crate::client::ScryfallClient;
use crate::error::Result;
use crate::models::{BulkData, Card, CardSet};
use crate::progress::Progress;

/// The Scryfall operations used by downstream services.
pub trait CatalogApi {
    fn get_card_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Card>;

    fn list_bulk_data(&self, cancel: &CancellationToken) -> Result<Vec<BulkData>>;

    fn list_sets(&self, cancel: &CancellationToken) -> Result<Vec<CardSet>>;

    fn get_bulk_data_by_type(&self, cancel: &CancellationToken, bulk_type: &str)
        -> Result<BulkData>;

    fn stream_bulk_data(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        on_card: &mut dyn FnMut(Card) -> Result<()>,
        on_progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<()>;

    fn download_bulk_data(&self, cancel: &CancellationToken, download_uri: &str)
        -> Result<Vec<Card>>;
}

impl CatalogApi for ScryfallClient {
    fn get_card_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Card> {
        ScryfallClient::get_card_by_id(self, cancel, id)
    }

    fn list_bulk_data(&self, cancel: &CancellationToken) -> Result<Vec<BulkData>> {
        ScryfallClient::list_bulk_data(self, cancel)
    }

    fn list_sets(&self, cancel: &CancellationToken) -> Result<Vec<CardSet>> {
        ScryfallClient::list_sets(self, cancel)
    }

    fn get_bulk_data_by_type(
        &self,
        cancel: &CancellationToken,
        bulk_type: &str,
    ) -> Result<BulkData> {
        ScryfallClient::get_bulk_data_by_type(self, cancel, bulk_type)
    }

    fn stream_bulk_data(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
        on_card: &mut dyn FnMut(Card) -> Result<()>,
        on_progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<()> {
        ScryfallClient::stream_bulk_data(self, cancel, download_uri, on_card, on_progress)
    }

    fn download_bulk_data(
        &self,
        cancel: &CancellationToken,
        download_uri: &str,
    ) -> Result<Vec<Card>> {
        ScryfallClient::download_bulk_data(self, cancel, download_uri)
    }
}
