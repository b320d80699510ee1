//! Response decoding for `GET /api/jewellery`.
//!
//! The endpoint answers with the pagination envelope, but older deployments
//! return a bare JSON array of items. Both shapes decode into an
//! [`Envelope`]; the bare array becomes a single page holding every item.

use catalog_core::envelope::Envelope;
use catalog_core::item::Item;
use serde::Deserialize;

/// Either response shape the listing endpoint may produce.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    Envelope(Envelope<Item>),
    Bare(Vec<Item>),
}

impl From<CatalogResponse> for Envelope<Item> {
    fn from(response: CatalogResponse) -> Self {
        match response {
            CatalogResponse::Envelope(envelope) => envelope,
            CatalogResponse::Bare(items) => Envelope::from_bare(items),
        }
    }
}

/// Decode a listing response body.
pub fn decode_listing(body: &[u8]) -> Result<Envelope<Item>, serde_json::Error> {
    serde_json::from_slice::<CatalogResponse>(body).map(Envelope::from)
}
