//! # Agency Server
//!
//! HTTP surface for agent records: list, lookup and create.

pub mod config;
pub mod error;
pub mod handlers;
mod routes;

pub use config::{ServiceConfig, StoreBackend};
pub use error::ApiError;
pub use routes::{create_router, AppState};
