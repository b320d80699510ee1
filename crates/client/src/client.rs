//! HTTP client for the catalogue API.

use std::time::Duration;

use catalog_core::envelope::Envelope;
use catalog_core::item::Item;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::decode::decode_listing;
use crate::error::ClientError;
use crate::serialize::to_query_pairs;
use crate::state::QueryState;

#[derive(Deserialize)]
struct DataResponse<T> {
    data: T,
}

/// Fetches catalogue pages for a [`QueryState`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Base URL with `segments` appended to its path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Full listing URL for `state`, query string included.
    pub fn listing_url(&self, state: &QueryState) -> Result<Url, ClientError> {
        let mut url = self.endpoint(&["api", "jewellery"])?;
        url.query_pairs_mut().extend_pairs(to_query_pairs(state));
        Ok(url)
    }

    /// Fetch one catalogue page.
    pub async fn fetch(&self, state: &QueryState) -> Result<Envelope<Item>, ClientError> {
        let url = self.listing_url(state)?;
        tracing::debug!(%url, "Fetching catalogue page");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Ok(decode_listing(&body)?)
    }

    /// Fetch one catalogue page, degrading to an empty page on any failure.
    ///
    /// The failure is logged; the returned envelope keeps the requested page
    /// number so paging controls stay where the user left them.
    pub async fn fetch_or_empty(&self, state: &QueryState) -> Envelope<Item> {
        match self.fetch(state).await {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(error = %err, page = state.page(), "Catalogue fetch failed, showing no items");
                Envelope::empty(state.page())
            }
        }
    }

    /// Fetch a single item by id. `None` when the API reports 404.
    pub async fn fetch_item(&self, id: &str) -> Result<Option<Item>, ClientError> {
        let url = self.endpoint(&["api", "jewellery", id])?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let wrapped: DataResponse<Item> = serde_json::from_slice(&body)?;
        Ok(Some(wrapped.data))
    }
}
