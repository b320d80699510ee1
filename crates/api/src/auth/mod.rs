//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation for the admin endpoints.

pub mod jwt;
