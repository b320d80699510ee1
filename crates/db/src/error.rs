use catalog_core::error::CoreError;

/// Errors raised by [`ItemStore`](crate::ItemStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write collided with an existing item id.
    #[error("Item {0} already exists")]
    Duplicate(String),

    /// A domain rule rejected the write (e.g. id sequence exhausted).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// A stored row could not be mapped back onto the domain type.
    #[error("Corrupt item row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}
