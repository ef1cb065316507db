// src/extractors/section.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::congress::models::FormatKind;

/// One numbered, titled unit of a bill's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub number: String,
    pub header: String,
    pub content: String,
}

impl Section {
    /// Builds a section from raw pieces. Returns `None` when the header is blank;
    /// a blank body falls back to the header text.
    pub fn new(id: String, number: String, header: &str, content: &str) -> Option<Self> {
        let header = header.trim();
        if header.is_empty() {
            return None;
        }
        let content = match content.trim() {
            "" => header,
            body => body,
        };
        Some(Self {
            id,
            number,
            header: header.to_string(),
            content: content.to_string(),
        })
    }
}

/// Sections extracted from one bill, plus the format they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub sections: Vec<Section>,
    pub format_used: FormatKind,
}

/// Appends `-2`, `-3`, ... to repeated ids, keeping the first occurrence as-is.
pub fn ensure_unique_ids(sections: &mut [Section]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for section in sections.iter_mut() {
        let count = seen.entry(section.id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let mut n = *count;
            let mut candidate = format!("{}-{}", section.id, n);
            while seen.contains_key(&candidate) {
                n += 1;
                candidate = format!("{}-{}", section.id, n);
            }
            seen.insert(candidate.clone(), 1);
            section.id = candidate;
        }
    }
}
