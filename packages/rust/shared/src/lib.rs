//! Shared types, error model, and configuration for Limitrofe.
//!
//! This crate is the foundation depended on by all other Limitrofe crates.
//! It provides:
//! - [`LimitrofeError`], the unified error type
//! - Domain types ([`Record`], [`ColumnNames`], [`SelectOption`])
//! - Configuration ([`AppConfig`], [`LoadConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ColumnsConfig, DEFAULT_SOURCE_URL, DisplayConfig, LoadConfig, SourceConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{FailureKind, LimitrofeError, Result};
pub use types::{
    ColumnNames, DEFAULT_ENTITY_COLUMN, DEFAULT_NEIGHBOR_COLUMN, Record, SelectOption,
};
