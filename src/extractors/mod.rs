// src/extractors/mod.rs
pub mod html;
pub mod pdf;
pub mod section;
pub mod text;
pub mod xml;

// Re-export key extraction types for convenience
pub use html::html_to_text;
pub use pdf::pdf_to_text;
pub use section::{ExtractionResult, Section};
pub use text::TextSegmenter;
pub use xml::{XmlSectionExtractor, XmlVocabulary};
