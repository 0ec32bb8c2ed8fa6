//! Configuration module for Crawl-Worker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a worker can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use crawl_worker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("worker.toml")).unwrap();
//! println!("Frontier capacity: {}", config.worker.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, FetcherConfig, FieldSelector, MothershipConfig, UserAgentConfig,
    WorkerConfig, DEFAULT_MAX_LINKS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
pub(crate) use validation::parse_selector;
