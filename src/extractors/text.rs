// src/extractors/text.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::section::{ensure_unique_ids, Section};
use crate::utils::config::DEFAULT_BOUNDARY_KEYWORDS;

// --- Regex Patterns (Lazy Static) ---
// "SEC. 101." style heading marker; capture 1 is the designator
static SECTION_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bSEC\.[ \t]+([A-Za-z0-9]+)\.").expect("Failed to compile SECTION_MARKER_RE")
});

// A blank line ends the section title
static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t\r]*\n").expect("Failed to compile BLANK_LINE_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

static DEFAULT_BOUNDARY_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    build_boundary_regex(DEFAULT_BOUNDARY_KEYWORDS).expect("Failed to compile DEFAULT_BOUNDARY_RE")
});

/// Builds `\b(?:KW1|KW2|...)\b`, or `None` when there are no keywords.
fn build_boundary_regex<S: AsRef<str>>(keywords: &[S]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).map(Some)
}

/// Tidies text recovered from markup or PDF: non-breaking spaces become
/// spaces, lines are trimmed, and runs of blank lines collapse to one.
pub fn normalize_flat_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_blank = false;
    for line in raw.split('\n') {
        let line = line.replace('\u{a0}', " ");
        let line = line.trim();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        pending_blank = false;
    }
    out
}

/// Carves flat bill text (from HTML or PDF) into sections.
///
/// A section starts at `SEC. <designator>.`, its title runs to the first
/// blank line, and its body runs to the next marker, the next structural
/// keyword (`TITLE`, `DIVISION` by default), or the end of the text.
#[derive(Debug, Clone)]
pub struct TextSegmenter {
    boundary_re: Option<Regex>,
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self {
            boundary_re: DEFAULT_BOUNDARY_RE.clone(),
        }
    }
}

impl TextSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom list of structural keywords. An empty list means only
    /// the next marker or end of text closes a section body.
    pub fn with_boundary_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            boundary_re: build_boundary_regex(keywords)?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<Section> {
        let markers: Vec<regex::Captures> = SECTION_MARKER_RE.captures_iter(text).collect();
        if markers.is_empty() {
            tracing::debug!("No section markers found in {} chars of text", text.len());
            return Vec::new();
        }

        let mut sections = Vec::with_capacity(markers.len());
        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(designator)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let designator = designator.as_str();
            let segment_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let segment = &text[whole.end()..segment_end];

            let Some(blank) = BLANK_LINE_RE.find(segment) else {
                tracing::trace!("SEC. {} has no blank line before the next marker, skipping", designator);
                continue;
            };

            let title = WHITESPACE_RE.replace_all(segment[..blank.start()].trim(), " ");
            let body_region = &segment[blank.end()..];
            let body_end = self
                .boundary_re
                .as_ref()
                .and_then(|re| re.find(body_region))
                .map_or(body_region.len(), |m| m.start());

            if let Some(section) = Section::new(
                format!("section-{}", designator),
                format!("Sec. {}", designator),
                &title,
                &body_region[..body_end],
            ) {
                sections.push(section);
            }
        }

        ensure_unique_ids(&mut sections);
        tracing::debug!("Text segmentation found {} sections", sections.len());
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(designator: &str, header: &str, content: &str) -> Section {
        Section {
            id: format!("section-{}", designator),
            number: format!("Sec. {}", designator),
            header: header.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_two_sections() {
        let text = "SEC. 1. Short Title\n\n<body1>\n\nSEC. 2. Findings\n\n<body2>";
        assert_eq!(
            TextSegmenter::new().segment(text),
            vec![section("1", "Short Title", "<body1>"), section("2", "Findings", "<body2>")]
        );
    }

    #[test]
    fn test_no_marker_is_empty() {
        assert!(TextSegmenter::new().segment("A BILL\n\nTo do things.\n\nSec. 1 is lowercase here.").is_empty());
        assert!(TextSegmenter::new().segment("").is_empty());
    }

    #[test]
    fn test_structural_keyword_ends_body() {
        let text = "SEC. 2. DEFINITIONS.\n\n    In this Act the term `agency' has its usual meaning.\n\n\
                    TITLE I--GENERAL PROVISIONS\n\n\
                    SEC. 101. AUTHORIZATION.\n\n    There are authorized such sums as are necessary.\n\n\
                    DIVISION B--OTHER MATTERS\n";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(
            sections,
            vec![
                section("2", "DEFINITIONS.", "In this Act the term `agency' has its usual meaning."),
                section("101", "AUTHORIZATION.", "There are authorized such sums as are necessary."),
            ]
        );
    }

    #[test]
    fn test_keyword_in_title_does_not_cut_header() {
        let text = "SEC. 1. SHORT TITLE.\n\n    This Act may be cited as the ``Example Act''.\n";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(sections[0].header, "SHORT TITLE.");
        assert_eq!(sections[0].content, "This Act may be cited as the ``Example Act''.");
    }

    #[test]
    fn test_custom_keywords_replace_defaults() {
        let text = "SEC. 1. A.\n\nBody text TITLE stays.\n\nSUBTITLE B\n\nignored";
        let custom = TextSegmenter::with_boundary_keywords(&["SUBTITLE"]).unwrap();
        assert_eq!(custom.segment(text)[0].content, "Body text TITLE stays.");

        let none = TextSegmenter::with_boundary_keywords::<&str>(&[]).unwrap();
        assert_eq!(none.segment(text)[0].content, "Body text TITLE stays.\n\nSUBTITLE B\n\nignored");
    }

    #[test]
    fn test_wrapped_title_is_joined() {
        let text = "SEC. 3. REPORTING REQUIREMENTS FOR\n   COVERED AGENCIES.\n\nEach agency shall report.";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(sections[0].header, "REPORTING REQUIREMENTS FOR COVERED AGENCIES.");
    }

    #[test]
    fn test_marker_without_blank_line_is_skipped() {
        let text = "SEC. 1. Run-on heading with no break SEC. 2. Proper\n\nBody.";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(sections, vec![section("2", "Proper", "Body.")]);
    }

    #[test]
    fn test_empty_body_falls_back_to_header_and_ids_stay_unique() {
        let text = "SEC. 5. Repealed.\n\nTITLE II\n\nSEC. 5. Again.\n\nBody.";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "Repealed.");
        assert_eq!(sections[1].id, "section-5-2");
    }

    #[test]
    fn test_normalize_flat_text() {
        let raw = "\r\n  A BILL\u{a0} \r\n\n\n\n   SEC. 1. X.\n \t \nBody\n  more\n\n";
        assert_eq!(normalize_flat_text(raw), "A BILL\n\nSEC. 1. X.\n\nBody\nmore");
    }

    #[test]
    fn test_alphanumeric_designators() {
        let text = "SEC. 10A. Inserted section.\n\nText.";
        let sections = TextSegmenter::new().segment(text);
        assert_eq!(sections[0].number, "Sec. 10A");
        assert_eq!(sections[0].id, "section-10A");
    }
}
