// src/testing.rs
//! In-memory `BillTextSource` for unit tests.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::congress::models::{BillReference, FormatArtifact, FormatKind, TextVersion};
use crate::congress::BillTextSource;
use crate::utils::error::CongressError;

type ErrorFactory = Box<dyn Fn() -> CongressError + Send + Sync>;

#[derive(Default)]
pub struct FakeSource {
    versions: Vec<TextVersion>,
    lookup_error: Option<ErrorFactory>,
    texts: HashMap<String, String>,
    bytes: HashMap<String, Vec<u8>>,
    failing_urls: Vec<String>,
    title: Option<String>,
    calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_versions(mut self, versions: Vec<TextVersion>) -> Self {
        self.versions = versions;
        self
    }

    /// Publishes one text version whose artifacts are served from memory.
    pub fn with_documents(mut self, docs: &[(FormatKind, &str)]) -> Self {
        let artifacts = docs
            .iter()
            .map(|(kind, body)| {
                let url = format!("mem://bill.{}", kind.as_str().to_lowercase());
                self.texts.insert(url.clone(), body.to_string());
                FormatArtifact { kind: *kind, url }
            })
            .collect();
        self.versions = vec![TextVersion {
            label: Some("Introduced in House".to_string()),
            date: None,
            artifacts,
        }];
        self
    }

    /// Publishes a binary artifact (for PDF) alongside any existing ones.
    pub fn with_binary(mut self, kind: FormatKind, body: Vec<u8>) -> Self {
        let url = format!("mem://bill.{}", kind.as_str().to_lowercase());
        self.bytes.insert(url.clone(), body);
        if self.versions.is_empty() {
            self.versions.push(TextVersion::default());
        }
        self.versions[0].artifacts.push(FormatArtifact { kind, url });
        self
    }

    /// Advertises an artifact whose download always fails.
    pub fn with_failing(mut self, kind: FormatKind) -> Self {
        let url = format!("mem://broken.{}", kind.as_str().to_lowercase());
        self.failing_urls.push(url.clone());
        if self.versions.is_empty() {
            self.versions.push(TextVersion::default());
        }
        self.versions[0].artifacts.insert(0, FormatArtifact { kind, url });
        self
    }

    pub fn with_lookup_error(mut self, make: impl Fn() -> CongressError + Send + Sync + 'static) -> Self {
        self.lookup_error = Some(Box::new(make));
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Total number of upstream calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs downloaded so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    fn record(&self, url: Option<&str>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(url) = url {
            self.fetched.lock().unwrap().push(url.to_string());
        }
    }
}

#[async_trait]
impl BillTextSource for FakeSource {
    async fn text_versions(&self, _bill: &BillReference) -> Result<Vec<TextVersion>, CongressError> {
        self.record(None);
        match &self.lookup_error {
            Some(make) => Err(make()),
            None => Ok(self.versions.clone()),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, CongressError> {
        self.record(Some(url));
        if self.failing_urls.iter().any(|u| u == url) {
            return Err(CongressError::Http(reqwest::StatusCode::BAD_GATEWAY));
        }
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| CongressError::NotFound(url.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CongressError> {
        self.record(Some(url));
        if self.failing_urls.iter().any(|u| u == url) {
            return Err(CongressError::Http(reqwest::StatusCode::BAD_GATEWAY));
        }
        if let Some(body) = self.bytes.get(url) {
            return Ok(body.clone());
        }
        self.texts
            .get(url)
            .map(|t| t.as_bytes().to_vec())
            .ok_or_else(|| CongressError::NotFound(url.to_string()))
    }

    async fn bill_title(&self, _bill: &BillReference) -> Result<Option<String>, CongressError> {
        self.record(None);
        match &self.lookup_error {
            Some(make) => Err(make()),
            None => Ok(self.title.clone()),
        }
    }
}

/// Builds a one-page PDF that draws `lines` in Helvetica, top to bottom.
///
/// An empty entry adds an extra line of vertical space, which text
/// extraction reports as a blank line.
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n");
    let mut started = false;
    let mut lead = 14;
    for line in lines {
        if line.is_empty() {
            lead += 14;
            continue;
        }
        if started {
            content.push_str(&format!("0 -{} Td\n", lead));
        }
        let escaped = line.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
        content.push_str(&format!("({}) Tj\n", escaped));
        started = true;
        lead = 14;
    }
    content.push_str("ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }
    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}
