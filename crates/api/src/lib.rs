//! HTTP API for the jewellery catalogue.
//!
//! Exposes the router builder and its building blocks so the binary and the
//! integration tests share one middleware stack.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
