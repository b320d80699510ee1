//! Database row structs.
//!
//! Rows mirror the table layout (flat category columns, text enums) and are
//! converted into `catalog_core` domain types on the way out.

pub mod item;
