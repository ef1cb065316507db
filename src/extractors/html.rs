// src/extractors/html.rs
use scraper::{node::Node, ElementRef, Html};

use crate::extractors::text::normalize_flat_text;

// Elements whose boundaries become paragraph breaks in the flat text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "center", "dd", "div", "dl", "dt", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section",
    "table", "tr", "ul",
];

// Elements whose text never belongs to the bill body
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "title", "template"];

/// Converts the formatted-text (HTML) rendition of a bill into flat text.
///
/// Tags are stripped, entities decoded, and block boundaries preserved as
/// blank lines so the segmenter can see where titles end. Whitespace inside
/// `<pre>` (how Congress.gov publishes formatted text) is kept as-is.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    append_text(document.root_element(), &mut raw);
    normalize_flat_text(&raw)
}

fn append_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let is_block = BLOCK_TAGS.contains(&name);
    if is_block {
        out.push_str("\n\n");
    }
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            append_text(child_el, out);
        } else if let Node::Text(text_node) = child.value() {
            out.push_str(&text_node.text);
        }
    }
    if is_block {
        out.push_str("\n\n");
    }
}
