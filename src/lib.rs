//! Filebay - a file manager backend for the browser.
//!
//! Uploads are stored under directories named after their MIME type, listed
//! as a tree, and served back with byte-range support for video.

pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod user;
pub mod web;

pub use config::Config;
pub use error::{FilebayError, Result};
pub use file::FileStorage;
pub use user::{MemoryUserStore, User, UserStore};
pub use web::WebServer;
