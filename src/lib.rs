// src/lib.rs
//! Extracts the numbered sections of a U.S. bill from its published text.
//!
//! The newest text version of a bill is looked up on Congress.gov and its
//! formats are tried in order (XML, formatted text, PDF) until one yields
//! sections. See [`SectionPipeline::extract_sections`].

pub mod congress;
pub mod extractors;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod testing;

pub use congress::models::{BillReference, FormatArtifact, FormatKind, TextVersion};
pub use congress::{BillTextSource, CongressClient};
pub use extractors::{ExtractionResult, Section};
pub use pipeline::SectionPipeline;
pub use utils::{AppError, Config, ExtractionError};
