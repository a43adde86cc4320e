//! Local persistence for the personal best
//!
//! Features:
//! - Plain JSON record on disk
//! - Atomic replace (write tmp, then rename over the save)
//! - A missing file reads as "no best recorded"

pub mod store;

pub use store::JsonFileStore;

use thiserror::Error;

/// Error type for local storage
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage backend refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
