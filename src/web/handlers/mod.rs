//! API handlers for Web UI.

pub mod file;
pub mod user;

pub use file::*;
pub use user::*;

use std::sync::Arc;

use crate::file::FileStorage;
use crate::user::UserStore;
use crate::web::error::ApiError;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// File storage rooted at the configured directory.
    pub storage: FileStorage,
    /// User directory.
    pub users: Arc<dyn UserStore>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(storage: FileStorage, users: Arc<dyn UserStore>, max_upload_bytes: u64) -> Self {
        Self {
            storage,
            users,
            max_upload_bytes,
        }
    }
}

/// Run synchronous filesystem or store work off the async runtime.
///
/// A panicked or cancelled task becomes a 500 with `context` as the message.
pub(crate) async fn run_blocking<F, T>(context: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("{}: {}", context, e);
        ApiError::internal(context)
            .with_details(crate::web::error::ErrorDetails::Message(e.to_string()))
    })
}
