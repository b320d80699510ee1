//! Request handlers.
//!
//! Handlers resolve request input into domain values, delegate to the
//! [`ItemStore`](catalog_db::ItemStore) held in [`AppState`](crate::state::AppState),
//! and map failures via [`AppError`](crate::error::AppError).

pub mod jewellery;
