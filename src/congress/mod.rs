// src/congress/mod.rs
pub mod client;
pub mod locator;
pub mod models;

use async_trait::async_trait;

use crate::utils::error::CongressError;
use models::{BillReference, TextVersion};

pub use client::CongressClient;
pub use locator::locate_latest_version;

/// Everything the extraction pipeline needs from upstream.
///
/// `CongressClient` is the production implementation; tests substitute an
/// in-memory source.
#[async_trait]
pub trait BillTextSource: Send + Sync {
    /// Text versions of a bill, newest first as published upstream.
    async fn text_versions(&self, bill: &BillReference) -> Result<Vec<TextVersion>, CongressError>;

    async fn fetch_text(&self, url: &str) -> Result<String, CongressError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CongressError>;

    /// The bill's display title, if upstream has one.
    async fn bill_title(&self, bill: &BillReference) -> Result<Option<String>, CongressError>;
}
