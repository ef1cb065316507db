// src/extractors/xml.rs
//! Section extraction from the structured XML rendition of a bill.
//!
//! The raw document is converted once into an [`XmlNode`] tree, and every
//! text query goes through [`XmlNode::fold_text`]. Section elements can sit
//! at any depth (under titles, divisions, parts, or quoted blocks), so the
//! walk visits the whole tree.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::extractors::section::{ensure_unique_ids, Section};

// --- Default vocabulary ---
// Bill DTD names first, USLM equivalents after.
const ROOT_NAMES: &[&str] = &["bill", "resolution", "amendment-doc", "engrossed-amendment-doc"];
const SECTION_TAG: &str = "section";
const NUMBER_FIELDS: &[&str] = &["enum", "num"];
const HEADER_FIELDS: &[&str] = &["header", "heading"];
const BODY_FIELDS: &[&str] = &["text", "content"];
const ID_ATTRIBUTE: &str = "id";

/// Deepest element nesting [`XmlNode::parse`] accepts. Bill XML stays well
/// under a hundred levels even inside nested quoted blocks.
pub const MAX_DEPTH: usize = 512;

#[derive(Error, Debug)]
pub enum XmlTreeError {
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Element and attribute names the extractor looks for.
#[derive(Debug, Clone)]
pub struct XmlVocabulary {
    /// Tried in order; different generations of bill XML use different roots.
    pub root_names: Vec<String>,
    pub section_tag: String,
    pub number_fields: Vec<String>,
    pub header_fields: Vec<String>,
    pub body_fields: Vec<String>,
    pub id_attribute: String,
}

impl Default for XmlVocabulary {
    fn default() -> Self {
        let owned = |names: &[&str]| -> Vec<String> { names.iter().map(|n| n.to_string()).collect() };
        Self {
            root_names: owned(ROOT_NAMES),
            section_tag: SECTION_TAG.to_string(),
            number_fields: owned(NUMBER_FIELDS),
            header_fields: owned(HEADER_FIELDS),
            body_fields: owned(BODY_FIELDS),
            id_attribute: ID_ATTRIBUTE.to_string(),
        }
    }
}

/// Generic XML tree: named elements with attributes and ordered children, or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element {
        name: String,
        attributes: BTreeMap<String, String>,
        children: Vec<XmlNode>,
    },
    Text(String),
}

impl XmlNode {
    /// Parses a document into a tree rooted at the document element.
    /// Comments and processing instructions are dropped.
    ///
    /// Documents nested deeper than [`MAX_DEPTH`] elements are rejected, so
    /// every walk over the resulting tree has bounded recursion.
    pub fn parse(xml: &str) -> Result<Self, XmlTreeError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true, // bill XML ships with a DOCTYPE
            ..roxmltree::ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(xml, options)?;

        let mut stack = vec![OpenElement::new(document.root_element())];
        let mut root = None;
        while let Some(top) = stack.last_mut() {
            let Some(child) = top.next_child.take() else {
                let Some(done) = stack.pop() else { break };
                let element = done.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
                continue;
            };
            top.next_child = child.next_sibling();

            if child.is_text() {
                if let Some(text) = child.text() {
                    top.children.push(XmlNode::Text(text.to_string()));
                }
            } else if child.is_element() {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlTreeError::TooDeep(MAX_DEPTH));
                }
                stack.push(OpenElement::new(child));
            }
        }
        // The root element always closes
        Ok(root.unwrap_or(XmlNode::Text(String::new())))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            XmlNode::Element { name, .. } => Some(name),
            XmlNode::Text(_) => None,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            XmlNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            XmlNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[XmlNode] {
        match self {
            XmlNode::Element { children, .. } => children,
            XmlNode::Text(_) => &[],
        }
    }

    /// All direct children with the given name, in document order.
    ///
    /// A child that appears once and one that repeats come back the same
    /// way, so callers never branch on "single vs. many".
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children().iter().filter(move |c| c.name() == Some(name))
    }

    fn is_named_any(&self, names: &[String]) -> bool {
        self.name().map_or(false, |n| names.iter().any(|candidate| candidate == n))
    }

    /// Folds over every text leaf beneath this node in document order.
    pub fn fold_text<'a, B, F>(&'a self, init: B, f: &mut F) -> B
    where
        F: FnMut(B, &'a str) -> B,
    {
        match self {
            XmlNode::Text(value) => f(init, value.as_str()),
            XmlNode::Element { children, .. } => {
                let mut acc = init;
                for child in children {
                    acc = child.fold_text(acc, f);
                }
                acc
            }
        }
    }

    /// All text beneath this node, leaves trimmed and joined with one space.
    pub fn flatten_text(&self) -> String {
        join_leaves(std::iter::once(self))
    }

    /// Like [`flatten_text`](Self::flatten_text) but skips direct children named in `excluded`.
    pub fn flatten_text_excluding(&self, excluded: &[String]) -> String {
        join_leaves(self.children().iter().filter(|c| !c.is_named_any(excluded)))
    }

    /// Depth-first search for the first element (self included) with this name.
    fn find_element(&self, name: &str) -> Option<&XmlNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_element(name))
    }
}

/// An element whose children are still being converted.
struct OpenElement<'a, 'input> {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<XmlNode>,
    next_child: Option<roxmltree::Node<'a, 'input>>,
}

impl<'a, 'input> OpenElement<'a, 'input> {
    fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: Vec::new(),
            next_child: node.first_child(),
        }
    }

    fn close(self) -> XmlNode {
        XmlNode::Element {
            name: self.name,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

fn join_leaves<'a>(nodes: impl Iterator<Item = &'a XmlNode>) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in nodes {
        pieces = node.fold_text(pieces, &mut |mut acc, text| {
            let text = text.trim();
            if !text.is_empty() {
                acc.push(text);
            }
            acc
        });
    }
    pieces.join(" ")
}

/// Extracts sections from bill XML.
#[derive(Debug, Clone, Default)]
pub struct XmlSectionExtractor {
    vocabulary: XmlVocabulary,
}

impl XmlSectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocabulary: XmlVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Returns every section found, in document order.
    ///
    /// Malformed XML, an unrecognised root, and a document without sections
    /// all produce an empty list.
    pub fn extract(&self, xml: &str) -> Vec<Section> {
        let tree = match XmlNode::parse(xml) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("XML document could not be parsed: {}", e);
                return Vec::new();
            }
        };

        let Some(root) = self.find_bill_root(&tree) else {
            tracing::warn!(
                "No bill root element found (document root is <{}>)",
                tree.name().unwrap_or_default()
            );
            return Vec::new();
        };

        let mut sections = Vec::new();
        self.collect_sections(root, &mut sections);
        ensure_unique_ids(&mut sections);
        tracing::debug!("XML extraction found {} sections", sections.len());
        sections
    }

    fn find_bill_root<'a>(&self, tree: &'a XmlNode) -> Option<&'a XmlNode> {
        let names = &self.vocabulary.root_names;
        if tree.is_named_any(names) {
            return Some(tree);
        }
        names.iter().find_map(|name| tree.find_element(name))
    }

    fn collect_sections(&self, node: &XmlNode, out: &mut Vec<Section>) {
        for child in node.children() {
            if child.name() == Some(self.vocabulary.section_tag.as_str()) {
                if let Some(section) = self.read_candidate(child) {
                    out.push(section);
                }
            }
            self.collect_sections(child, out);
        }
    }

    /// First non-empty flattened value among the named direct children.
    fn field_text(&self, node: &XmlNode, fields: &[String]) -> Option<String> {
        fields
            .iter()
            .flat_map(|field| node.children_named(field))
            .map(XmlNode::flatten_text)
            .find(|text| !text.is_empty())
    }

    fn read_candidate(&self, node: &XmlNode) -> Option<Section> {
        let vocab = &self.vocabulary;

        let Some(number) = self.field_text(node, &vocab.number_fields) else {
            tracing::trace!("Skipping section without a number: {:?}", node.attribute(&vocab.id_attribute));
            return None;
        };

        let header = self.field_text(node, &vocab.header_fields)?;

        let content = self.field_text(node, &vocab.body_fields).unwrap_or_else(|| {
            let excluded: Vec<String> = vocab.number_fields.iter().chain(&vocab.header_fields).cloned().collect();
            node.flatten_text_excluding(&excluded)
        });

        let id = node
            .attribute(&vocab.id_attribute)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("section-{}", number.trim_end_matches('.').trim()));

        Section::new(id, number, &header, &content)
    }
}
