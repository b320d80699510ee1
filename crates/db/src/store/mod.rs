//! Storage seam between the HTTP layer and the catalogue backends.
//!
//! Handlers hold an `Arc<dyn ItemStore>` so the same routes run against
//! PostgreSQL in production and against [`MemoryItemStore`] in tests or when
//! no database is configured.

mod memory;
mod postgres;

use async_trait::async_trait;
use catalog_core::envelope::Envelope;
use catalog_core::item::{Item, ItemInput};
use catalog_core::query::QueryPlan;

use crate::error::StoreError;

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

/// Catalogue item storage.
///
/// Inputs passed to `create`/`update` are expected to have been through
/// [`ItemInput::into_validated`].
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Run a catalogue query: filter, sort, paginate, and count.
    async fn list(&self, plan: &QueryPlan) -> Result<Envelope<Item>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Insert a new item, generating its id from the category code.
    async fn create(&self, input: &ItemInput) -> Result<Item, StoreError>;

    /// Overwrite an existing item's fields. `None` if the id is unknown.
    async fn update(&self, id: &str, input: &ItemInput) -> Result<Option<Item>, StoreError>;

    /// Delete an item. Returns true if it existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Increment `click_count`. `None` if the id is unknown.
    async fn record_click(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
