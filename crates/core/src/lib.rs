//! Domain core for the jewellery catalogue.
//!
//! Pure logic with no I/O: item types, the category table, catalogue query
//! resolution, and the paginated result envelope. Shared by the storage layer,
//! the HTTP server and the query-building client.

pub mod envelope;
pub mod error;
pub mod item;
pub mod query;
pub mod types;
