//! Small helpers over `roxmltree` shared by the RSS parsers.

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::warn;

/// Parse an RSS document. Empty or malformed input yields `None` (logged).
pub fn parse_document<'a>(xml: &'a str, source_name: &'static str) -> Option<Document<'a>> {
    if xml.trim().is_empty() {
        warn!(source = source_name, "Empty XML content received");
        return None;
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    match Document::parse_with_options(xml, options) {
        Ok(doc) => Some(doc),
        Err(e) => {
            let preview: String = xml.chars().take(200).collect();
            warn!(source = source_name, error = %e, preview = %preview, "XML parsing error");
            None
        }
    }
}

/// Every `<item>` element in the document, in document order.
pub fn items<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "item" && n.tag_name().namespace().is_none())
}

/// Concatenated text content of a node, CDATA included.
pub fn node_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Trimmed text of the first un-namespaced direct child called `name`.
pub fn child_text(node: Node, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name && n.tag_name().namespace().is_none())
        .map(|n| node_text(n).trim().to_string())
}

/// Trimmed text of the first descendant with the given namespace and local
/// name. `namespace = None` matches un-namespaced elements only.
pub fn descendant_text(node: Node, namespace: Option<&str>, name: &str) -> Option<String> {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == namespace)
        .map(|n| node_text(n).trim().to_string())
}

/// RFC 2822 `pubDate` as UTC.
pub fn parse_pub_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
