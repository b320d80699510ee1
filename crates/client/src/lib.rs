//! Client side of the jewellery catalogue.
//!
//! - [`state`] -- immutable query state and the reducer that updates it.
//! - [`serialize`] -- canonical query-string encoding of a state.
//! - [`decode`] -- response decoding (envelope or legacy bare array).
//! - [`client`] -- HTTP fetch against `/api/jewellery`.

pub mod client;
pub mod decode;
pub mod error;
pub mod serialize;
pub mod state;

pub use client::CatalogClient;
pub use error::ClientError;
pub use state::{QueryAction, QueryState};
