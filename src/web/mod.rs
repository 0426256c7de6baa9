//! Web API module for Filebay.
//!
//! This module provides the HTTP surface: JSON endpoints for uploads,
//! listings, statistics and users, plus byte-range streaming of stored files.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
