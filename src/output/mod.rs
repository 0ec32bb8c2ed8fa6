//! Output module for delivering parsed records
//!
//! This module handles:
//! - The `Dispatcher` seam the worker hands record batches to
//! - The HTTP client for the remote collector (the "mothership")

mod mothership;
mod traits;

pub use mothership::{build_mothership_client, MothershipClient, RecordBatch};
pub use traits::{DispatchError, DispatchResult, Dispatcher};
