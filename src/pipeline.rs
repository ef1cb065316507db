// src/pipeline.rs
//! The format cascade: XML first, then formatted text (HTML), then PDF.
//!
//! Each format is a stage that is only attempted when the newest text
//! version publishes it and every earlier stage came back empty. A stage
//! never fails the request: fetch errors, parse errors and parser panics
//! all count as "no sections from this format".

use std::panic::{self, AssertUnwindSafe};

use crate::congress::models::{BillReference, FormatKind};
use crate::congress::{locate_latest_version, BillTextSource};
use crate::extractors::section::{ExtractionResult, Section};
use crate::extractors::{html_to_text, pdf_to_text, TextSegmenter, XmlSectionExtractor};
use crate::utils::error::ExtractionError;

pub struct SectionPipeline<S> {
    source: S,
    xml: XmlSectionExtractor,
    segmenter: TextSegmenter,
}

impl<S: BillTextSource> SectionPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            xml: XmlSectionExtractor::new(),
            segmenter: TextSegmenter::new(),
        }
    }

    pub fn with_segmenter(mut self, segmenter: TextSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_xml_extractor(mut self, xml: XmlSectionExtractor) -> Self {
        self.xml = xml;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extracts the sections of a bill's newest text version.
    pub async fn extract_sections(&self, bill: &BillReference) -> Result<ExtractionResult, ExtractionError> {
        bill.validate()?;
        tracing::info!("Extracting sections for {}", bill);

        let version = locate_latest_version(&self.source, bill).await?;

        for kind in FormatKind::CASCADE {
            let Some(artifact) = version.artifact(kind) else {
                tracing::debug!("No {} artifact published for {}", kind, bill);
                continue;
            };

            let sections = self.attempt(kind, &artifact.url).await;
            if !sections.is_empty() {
                tracing::info!("Extracted {} sections for {} from {}", sections.len(), bill, kind);
                return Ok(ExtractionResult {
                    sections,
                    format_used: kind,
                });
            }
            tracing::info!("{} yielded no sections for {}, trying next format", kind, bill);
        }

        tracing::warn!("No format produced sections for {}", bill);
        Err(ExtractionError::NotFound("no extractable sections".to_string()))
    }

    /// Display title of a bill.
    pub async fn fetch_title(&self, bill: &BillReference) -> Result<String, ExtractionError> {
        bill.validate()?;
        let title = self.source.bill_title(bill).await?;
        title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ExtractionError::NotFound("title not found".to_string()))
    }

    async fn attempt(&self, kind: FormatKind, url: &str) -> Vec<Section> {
        match kind {
            FormatKind::Xml => {
                let Some(doc) = self.fetch_text(kind, url).await else {
                    return Vec::new();
                };
                guarded(kind, || self.xml.extract(&doc))
            }
            FormatKind::Html => {
                let Some(doc) = self.fetch_text(kind, url).await else {
                    return Vec::new();
                };
                guarded(kind, || self.segmenter.segment(&html_to_text(&doc)))
            }
            FormatKind::Pdf => {
                let bytes = match self.source.fetch_bytes(url).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("{} unavailable ({}): {}", kind, url, e);
                        return Vec::new();
                    }
                };
                // PDF decoding is CPU-bound; keep it off the async worker
                let text = match tokio::task::spawn_blocking(move || pdf_to_text(&bytes)).await {
                    Ok(Some(text)) => text,
                    Ok(None) => return Vec::new(),
                    Err(e) => {
                        tracing::warn!("PDF extraction task failed: {}", e);
                        return Vec::new();
                    }
                };
                guarded(kind, || self.segmenter.segment(&text))
            }
        }
    }

    async fn fetch_text(&self, kind: FormatKind, url: &str) -> Option<String> {
        match self.source.fetch_text(url).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!("{} unavailable ({}): {}", kind, url, e);
                None
            }
        }
    }
}

/// Runs one format's parser; a panic inside it counts as an empty result.
fn guarded<F>(kind: FormatKind, parse: F) -> Vec<Section>
where
    F: FnOnce() -> Vec<Section>,
{
    match panic::catch_unwind(AssertUnwindSafe(parse)) {
        Ok(sections) => sections,
        Err(_) => {
            tracing::error!("{} parser panicked; treating the format as empty", kind);
            Vec::new()
        }
    }
}
