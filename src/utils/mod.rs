// src/utils/mod.rs
pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{AppError, CongressError, ExtractionError}; // Re-export error types for convenience
