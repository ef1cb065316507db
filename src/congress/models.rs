// src/congress/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::ExtractionError;

/// Identifies a bill: congress session, bill type (e.g. "hr", "s") and number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillReference {
    pub congress: String,
    pub bill_type: String,
    pub bill_number: String,
}

impl BillReference {
    pub fn new(congress: impl Into<String>, bill_type: impl Into<String>, bill_number: impl Into<String>) -> Self {
        Self {
            congress: congress.into(),
            bill_type: bill_type.into(),
            bill_number: bill_number.into(),
        }
    }

    /// Rejects references with a blank field. Runs before any network access.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        let missing: Vec<&str> = [
            ("congress", &self.congress),
            ("billType", &self.bill_type),
            ("billNumber", &self.bill_number),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExtractionError::BadRequest(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Path segment used by the Congress.gov API: `{congress}/{type}/{number}`.
    pub fn api_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.congress.trim(),
            self.bill_type.trim().to_lowercase(),
            self.bill_number.trim()
        )
    }
}

impl fmt::Display for BillReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}{}", self.congress.trim(), self.bill_type.trim().to_lowercase(), self.bill_number.trim())
    }
}

/// The document formats a text version can be published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "PDF")]
    Pdf,
}

impl FormatKind {
    /// Cascade order: most structured and reliable first.
    pub const CASCADE: [FormatKind; 3] = [FormatKind::Xml, FormatKind::Html, FormatKind::Pdf];

    /// Maps the Congress.gov `formats[].type` label onto a kind.
    pub fn from_upstream_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Formatted XML" => Some(FormatKind::Xml),
            "Formatted Text" => Some(FormatKind::Html),
            "PDF" => Some(FormatKind::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Xml => "XML",
            FormatKind::Html => "HTML",
            FormatKind::Pdf => "PDF",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatArtifact {
    pub kind: FormatKind,
    pub url: String,
}

/// One published rendition of a bill's text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextVersion {
    pub label: Option<String>, // e.g. "Introduced in House"
    pub date: Option<String>,
    pub artifacts: Vec<FormatArtifact>,
}

impl TextVersion {
    pub fn artifact(&self, kind: FormatKind) -> Option<&FormatArtifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

// --- Raw API payloads ---

/// Body of `GET /bill/{congress}/{type}/{number}/text`.
/// Example: https://api.congress.gov/v3/bill/118/hr/815/text?format=json
#[derive(Debug, Deserialize)]
pub struct TextVersionsResponse {
    #[serde(rename = "textVersions", default)]
    pub text_versions: Vec<RawTextVersion>,
}

#[derive(Debug, Deserialize)]
pub struct RawTextVersion {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub version_type: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
pub struct RawFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub url: String,
}

impl From<RawTextVersion> for TextVersion {
    fn from(raw: RawTextVersion) -> Self {
        let mut artifacts: Vec<FormatArtifact> = Vec::new();
        for format in raw.formats {
            let Some(kind) = FormatKind::from_upstream_label(&format.format_type) else {
                tracing::trace!("Ignoring unknown format label '{}'", format.format_type);
                continue;
            };
            // First occurrence of a kind wins
            if artifacts.iter().any(|a| a.kind == kind) || format.url.trim().is_empty() {
                continue;
            }
            artifacts.push(FormatArtifact { kind, url: format.url });
        }
        TextVersion {
            label: raw.version_type,
            date: raw.date,
            artifacts,
        }
    }
}

/// Body of `GET /bill/{congress}/{type}/{number}`; only the title is read.
#[derive(Debug, Deserialize)]
pub struct BillResponse {
    pub bill: Option<BillDetail>,
}

#[derive(Debug, Deserialize)]
pub struct BillDetail {
    pub title: Option<String>,
}
