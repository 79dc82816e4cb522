//! richtext-html - HTML <-> rich-text document conversion
//!
//! ## Core Concepts
//!
//! **Document model**: an ordered list of blocks (styled text runs, or an
//! atomic embed) plus an entity table. Links and images are entities that
//! runs and atomic blocks reference by key, so their metadata is stored once.
//!
//! **Two directions**: [`html_to_document`] parses HTML (after injecting
//! consistent link styling), [`document_to_html`] renders a document back,
//! re-expanding `LINK` entities into anchors and image blocks into `<img>`.
//!
//! ## Modules
//! - `model`: Document, Block, Run, Entity types
//! - `parse`: HTML -> Document
//! - `render`: Document -> HTML
//! - `style`: anchor style injection
//! - `source`: input/output seams for editor-state holders
//!
//! ## Usage
//!
//! ```ignore
//! use richtext_html::{document_to_html, html_to_document};
//!
//! let doc = html_to_document(r#"<p>see <a href="https://example.com">here</a></p>"#);
//! let html = document_to_html(&doc).unwrap_or_default();
//! assert!(html.contains(r#"rel="noreferrer""#));
//! ```

#[macro_use]
mod macros;

/// Document model: blocks, runs, entities
pub mod model;

/// HTML -> Document conversion
pub mod parse;

/// Document -> HTML rendering
pub mod render;

/// Anchor style injection
pub mod style;

/// Caller-side conversion seams
pub mod source;

/// Attribute lists
pub mod attr;

/// Deterministic hashing
pub mod hash;

/// Error types
pub mod error;

/// Common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use model::{
    Block, BlockBody, BlockKey, BlockType, Document, Entity, EntityData, EntityKey, EntityKind,
    EntityMap, ImageData, InlineStyle, InlineStyles, LinkData, Mutability, Run,
};

pub use parse::{ParseConfig, parse, parse_with};

#[cfg(feature = "parallel")]
pub use parse::parse_batch;

pub use render::{RenderConfig, serialize, serialize_with, try_serialize, try_serialize_with};

pub use style::{LinkStyle, inject_link_style};

pub use source::{ContentSource, IntoDocument, serialize_state, serialize_state_with};

pub use error::{ConvertError, ConvertResult};

// =============================================================================
// Entry points
// =============================================================================

/// Convert input into a document with the default parse config
///
/// Strings are parsed; a [`Document`] is returned as is, never re-parsed.
pub fn html_to_document(input: impl IntoDocument) -> Document {
    input.into_document(&ParseConfig::DEFAULT)
}

/// Render a document to HTML with the default render config
///
/// `None` signals a failed render (already logged): nothing to display.
pub fn document_to_html(doc: &Document) -> Option<String> {
    serialize(doc)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Document: Send, Sync, Clone);
    assert_impl_all!(ParseConfig: Send, Sync);
    assert_impl_all!(RenderConfig: Send, Sync);

    fn round_trip(html: &str) -> (Document, Document) {
        let first = html_to_document(html);
        let rendered = document_to_html(&first).expect("render succeeds");
        let second = html_to_document(rendered.as_str());
        (first, second)
    }

    #[test]
    fn test_round_trip_paragraphs_links_images() {
        let (a, b) = round_trip(concat!(
            r#"<p>Read <a href="https://example.com/a?x=1&amp;y=2">the docs</a> first.</p>"#,
            r#"<img src="a.png" srcset="a.png 1x, b.png 2x" title="T" alt="A">"#,
            r#"<p>Then <a href="/b"><strong>this</strong> one</a>.</p>"#,
        ));

        assert_eq!(a.blocks.len(), 3);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let kinds = |d: &Document| -> Vec<String> {
            d.entity_refs()
                .filter_map(|k| d.entity(k))
                .map(|e| e.type_name().to_owned())
                .collect()
        };
        assert_eq!(kinds(&a), kinds(&b));

        let urls = |d: &Document| -> Vec<String> {
            d.entities_of_kind(EntityKind::Link)
                .iter()
                .filter_map(|e| e.data.as_link().map(|l| l.url.clone()))
                .collect()
        };
        assert_eq!(urls(&a), vec!["https://example.com/a?x=1&y=2", "/b"]);
        assert_eq!(urls(&a), urls(&b));
    }

    #[test]
    fn test_round_trip_rich_structure() {
        let (a, b) = round_trip(concat!(
            "<h2>Heading</h2>",
            "<ul><li>one<ul><li>nested <em>item</em></li></ul></li><li>two</li></ul>",
            "<ol><li>first</li></ol>",
            "<blockquote>quote<br>continued</blockquote>",
            "<pre>fn main() {\n    x &lt; y\n}</pre>",
            "<p>a &amp; b <code>c</code> <s>d</s> <u>e</u></p>",
        ));
        assert_eq!(a.blocks.len(), 8);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_null_handling() {
        assert!(html_to_document(None::<&str>).is_empty());
        assert!(html_to_document("").is_empty());
        assert_eq!(document_to_html(&Document::new()).as_deref(), Some(""));
    }

    #[test]
    fn test_document_input_is_not_reparsed() {
        let doc = html_to_document(r#"<p><a href="/x">t</a></p>"#);
        let entities = doc.entities.len();
        let fingerprint = doc.fingerprint();

        let again = html_to_document(doc);
        assert_eq!(again.entities.len(), entities);
        assert_eq!(again.fingerprint(), fingerprint);
    }

    #[test]
    fn test_link_example_end_to_end() {
        let doc = html_to_document(r#"<a href="https://example.com">hi</a>"#);
        assert_eq!(
            document_to_html(&doc).as_deref(),
            Some(r#"<p><a href="https://example.com" rel="noreferrer" target="_blank">hi</a></p>"#)
        );
    }

    #[test]
    fn test_image_example_end_to_end() {
        let doc = html_to_document(r#"<img src="a.png" alt="A">"#);
        assert_eq!(
            document_to_html(&doc).as_deref(),
            Some(r#"<img src="a.png" alt="A">"#)
        );
    }

    #[test]
    fn test_custom_link_style_flows_through_parse_config() {
        let config = ParseConfig::default().with_link_style(LinkStyle::default().with_color("red"));
        let doc = parse_with(Some(r#"<a href="/x">t</a>"#), &config);
        // Styling is cosmetic and does not reach the model
        assert_eq!(doc.plain_text(), "t");
        assert_eq!(doc.entities.len(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parse_batch_matches_sequential() {
        let inputs = ["<p>a</p>", r#"<a href="/b">b</a>"#, r#"<img src="c.png">"#];
        let batch = parse_batch(&inputs, &ParseConfig::DEFAULT);
        for (doc, html) in batch.iter().zip(inputs) {
            assert_eq!(doc.fingerprint(), parse(Some(html)).fingerprint());
        }
    }
}
