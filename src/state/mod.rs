//! State module for tracking worker session progress
//!
//! # Components
//!
//! - `WorkerState`: lifecycle of a worker across `run` invocations

mod worker_state;

// Re-export main types
pub use worker_state::WorkerState;
