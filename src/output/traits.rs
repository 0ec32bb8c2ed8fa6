//! Dispatcher trait and error types
//!
//! A dispatcher receives each page's records. Any error it returns ends the
//! worker session and is reported separately from fetch failures.

use crate::crawler::Record;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering records
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Connection refused by collector at {endpoint}")]
    ConnectionRefused { endpoint: String },

    #[error("Collector at {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Collector rejected batch with HTTP {status}")]
    Rejected { status: u16 },

    #[error("Failed to encode batch: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Accepts batches of records for delivery
///
/// Implementations must be thread-safe; the worker holds them behind an `Arc`.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Delivers one batch
    ///
    /// # Arguments
    ///
    /// * `records` - Records parsed from a single page
    async fn send(&self, records: &[Record]) -> DispatchResult<()>;
}
