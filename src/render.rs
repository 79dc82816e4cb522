//! HTML rendering for documents
//!
//! Walks blocks in order and emits HTML. Runs bound to a `LINK` entity are
//! wrapped in an anchor; other inline entities fall back to their text.
//! Atomic image blocks become `<img>` tags.
//!
//! Rendering is all-or-nothing: [`serialize`] logs the failure and returns
//! `None` rather than hand back half-formed HTML.

use std::borrow::Cow;
use std::fmt::Write;

use smallvec::SmallVec;

use crate::attr::Attrs;
use crate::error::{ConvertError, ConvertResult};
use crate::model::{Block, BlockBody, BlockType, Document, EntityData, EntityKey, Run};

// =============================================================================
// RenderConfig
// =============================================================================

/// Configuration for HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// `rel` attribute for links (omitted when empty).
    pub link_rel: Cow<'static, str>,
    /// `target` attribute for links (omitted when empty).
    pub link_target: Cow<'static, str>,
    /// Close void elements XHTML-style (`<img ... />`).
    pub self_close_void: bool,
}

impl RenderConfig {
    /// HTML5 output, links open in a new tab without a referrer.
    pub const DEFAULT: Self = Self {
        link_rel: Cow::Borrowed("noreferrer"),
        link_target: Cow::Borrowed("_blank"),
        self_close_void: false,
    };

    /// Same as [`DEFAULT`](Self::DEFAULT) with self-closing void elements.
    pub const XHTML: Self = Self {
        link_rel: Cow::Borrowed("noreferrer"),
        link_target: Cow::Borrowed("_blank"),
        self_close_void: true,
    };

    /// Set the `rel` attribute emitted on links.
    pub fn with_link_rel(mut self, rel: impl Into<Cow<'static, str>>) -> Self {
        self.link_rel = rel.into();
        self
    }

    /// Set the `target` attribute emitted on links.
    pub fn with_link_target(mut self, target: impl Into<Cow<'static, str>>) -> Self {
        self.link_target = target.into();
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a document to HTML with the default config.
///
/// The empty document renders as `Some("")`. `None` means rendering failed
/// (the failure is logged) and there is nothing to display.
pub fn serialize(doc: &Document) -> Option<String> {
    serialize_with(doc, &RenderConfig::DEFAULT)
}

/// Render a document to HTML, logging and swallowing failures.
pub fn serialize_with(doc: &Document, config: &RenderConfig) -> Option<String> {
    match try_serialize_with(doc, config) {
        Ok(html) => Some(html),
        Err(err) => {
            log::error!("failed to render document to html: {err}");
            None
        }
    }
}

/// Render a document to HTML, returning the failure to the caller.
pub fn try_serialize(doc: &Document) -> ConvertResult<String> {
    try_serialize_with(doc, &RenderConfig::DEFAULT)
}

/// Render a document to HTML with an explicit config.
pub fn try_serialize_with(doc: &Document, config: &RenderConfig) -> ConvertResult<String> {
    let mut renderer = Renderer {
        doc,
        config,
        output: String::new(),
        lists: SmallVec::new(),
    };
    for block in &doc.blocks {
        renderer.render_block(block)?;
    }
    renderer.close_lists(0);
    Ok(renderer.output)
}

// =============================================================================
// Renderer
// =============================================================================

struct Renderer<'a> {
    doc: &'a Document,
    config: &'a RenderConfig,
    output: String,
    /// Open lists, outermost first. Each open list has an open `<li>`.
    lists: SmallVec<[BlockType; 4]>,
}

impl Renderer<'_> {
    fn render_block(&mut self, block: &Block) -> ConvertResult<()> {
        if block.block_type.is_list_item() && !block.is_atomic() {
            self.enter_list_item(block);
            self.render_inline(block)?;
            return Ok(());
        }
        self.close_lists(0);

        match &block.body {
            BlockBody::Atomic(key) => self.render_atomic(block, *key),
            BlockBody::Text(_) if block.block_type == BlockType::Atomic => {
                Err(ConvertError::MissingAtomicEntity {
                    block: block.key.clone(),
                })
            }
            BlockBody::Text(_) => {
                let tag = block_tag(block.block_type);
                write!(self.output, "<{tag}>")?;
                if block.block_type.preserves_whitespace() && block.plain_text().starts_with('\n') {
                    // Parsers drop one newline right after `<pre>`
                    self.output.push('\n');
                }
                self.render_inline(block)?;
                write!(self.output, "</{tag}>")?;
                Ok(())
            }
        }
    }

    /// Open, continue or close lists so that `block` sits at its depth
    fn enter_list_item(&mut self, block: &Block) {
        let level = block.depth + 1;
        self.close_lists(level);

        if self.lists.len() == level {
            if self.lists.last() == Some(&block.block_type) {
                self.output.push_str("</li>");
            } else {
                self.pop_list();
            }
        }

        while self.lists.len() < level {
            self.output.push('<');
            self.output.push_str(list_tag(block.block_type));
            self.output.push('>');
            self.lists.push(block.block_type);
            if self.lists.len() < level {
                // Depth skipped a level: wrap the nested list in an item
                self.output.push_str("<li>");
            }
        }
        self.output.push_str("<li>");
    }

    /// Close lists until at most `level` remain open
    fn close_lists(&mut self, level: usize) {
        while self.lists.len() > level {
            self.pop_list();
        }
    }

    fn pop_list(&mut self) {
        if let Some(kind) = self.lists.pop() {
            self.output.push_str("</li></");
            self.output.push_str(list_tag(kind));
            self.output.push('>');
        }
    }

    fn render_atomic(&mut self, block: &Block, key: EntityKey) -> ConvertResult<()> {
        let doc = self.doc;
        let entity = doc
            .entity(key)
            .ok_or_else(|| ConvertError::dangling(&block.key, key))?;

        match &entity.data {
            EntityData::Image(image) => {
                self.output.push_str("<img");
                render_attrs(&image.to_attrs(), &mut self.output);
                self.close_void();
            }
            _ => {
                log::debug!(
                    "skipping atomic block {} with {} entity",
                    block.key,
                    entity.type_name()
                );
            }
        }
        Ok(())
    }

    /// Render runs, grouping consecutive runs that share an entity
    fn render_inline(&mut self, block: &Block) -> ConvertResult<()> {
        let doc = self.doc;
        let preserve = block.block_type.preserves_whitespace();

        for group in block.runs().chunk_by(|a, b| a.entity == b.entity) {
            let link = match group[0].entity {
                None => None,
                Some(key) => {
                    let entity = doc
                        .entity(key)
                        .ok_or_else(|| ConvertError::dangling(&block.key, key))?;
                    entity.data.as_link()
                }
            };

            match link {
                Some(link) => {
                    self.output.push_str("<a");
                    let mut attrs: Attrs = vec![("href".into(), link.url.clone())];
                    if !self.config.link_rel.is_empty() {
                        attrs.push(("rel".into(), self.config.link_rel.to_string()));
                    }
                    if !self.config.link_target.is_empty() {
                        attrs.push(("target".into(), self.config.link_target.to_string()));
                    }
                    render_attrs(&attrs, &mut self.output);
                    self.output.push('>');
                    render_runs(group, preserve, &mut self.output);
                    self.output.push_str("</a>");
                }
                // Unhandled entity kinds degrade to their text
                None => render_runs(group, preserve, &mut self.output),
            }
        }
        Ok(())
    }

    fn close_void(&mut self) {
        if self.config.self_close_void {
            self.output.push_str(" />");
        } else {
            self.output.push('>');
        }
    }
}

/// Render runs with their style tags
fn render_runs(runs: &[Run], preserve_whitespace: bool, output: &mut String) {
    for run in runs {
        for style in run.styles.iter() {
            output.push('<');
            output.push_str(style.tag());
            output.push('>');
        }

        if preserve_whitespace {
            output.push_str(&escape_html(&run.text));
        } else {
            let mut lines = run.text.split('\n');
            if let Some(first) = lines.next() {
                output.push_str(&escape_html(first));
            }
            for line in lines {
                output.push_str("<br>");
                output.push_str(&escape_html(line));
            }
        }

        for style in run.styles.iter().rev() {
            output.push_str("</");
            output.push_str(style.tag());
            output.push('>');
        }
    }
}

/// Render attributes to HTML.
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Tag of a non-list text block
fn block_tag(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::HeaderOne => "h1",
        BlockType::HeaderTwo => "h2",
        BlockType::HeaderThree => "h3",
        BlockType::HeaderFour => "h4",
        BlockType::HeaderFive => "h5",
        BlockType::HeaderSix => "h6",
        BlockType::Blockquote => "blockquote",
        BlockType::CodeBlock => "pre",
        BlockType::Unstyled
        | BlockType::UnorderedListItem
        | BlockType::OrderedListItem
        | BlockType::Atomic => "p",
    }
}

fn list_tag(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::OrderedListItem => "ol",
        _ => "ul",
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, ImageData, InlineStyle, InlineStyles};

    fn para(doc: &mut Document, block_type: BlockType, runs: Vec<Run>) {
        let mut block = Block::text(block_type);
        for run in runs {
            block.push_run(run);
        }
        doc.push_block(block);
    }

    #[test]
    fn test_empty_document_renders_empty_string() {
        assert_eq!(serialize(&Document::new()).as_deref(), Some(""));
    }

    #[test]
    fn test_link_run() {
        let mut doc = Document::new();
        let link = doc.add_entity(Entity::link("https://example.com"));
        para(&mut doc, BlockType::Unstyled, vec![Run::new("hi").with_entity(link)]);

        assert_eq!(
            serialize(&doc).as_deref(),
            Some(r#"<p><a href="https://example.com" rel="noreferrer" target="_blank">hi</a></p>"#)
        );
    }

    #[test]
    fn test_styled_runs_share_one_anchor() {
        let mut doc = Document::new();
        let link = doc.add_entity(Entity::link("/x"));
        let bold = InlineStyles::NONE.with(InlineStyle::Bold);
        para(
            &mut doc,
            BlockType::Unstyled,
            vec![
                Run::new("a ").with_entity(link),
                Run::new("b").with_entity(link).with_styles(bold),
                Run::new(" c"),
            ],
        );

        let html = serialize(&doc).unwrap_or_default();
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(">a <strong>b</strong></a> c</p>"));
    }

    #[test]
    fn test_non_link_inline_entity_degrades_to_text() {
        let mut doc = Document::new();
        let mention = doc.add_entity(Entity::other(
            "MENTION",
            crate::model::Mutability::Immutable,
            Vec::new(),
        ));
        para(&mut doc, BlockType::Unstyled, vec![Run::new("@ann").with_entity(mention)]);
        assert_eq!(serialize(&doc).as_deref(), Some("<p>@ann</p>"));
    }

    #[test]
    fn test_image_block() {
        let mut doc = Document::new();
        let image = doc.add_entity(Entity::image(
            ImageData::new("a.png").with_alt("A").with_src_set("a@2x.png 2x"),
        ));
        doc.push_block(Block::atomic(image));

        assert_eq!(
            serialize(&doc).as_deref(),
            Some(r#"<img src="a.png" srcset="a@2x.png 2x" alt="A">"#)
        );
        assert_eq!(
            serialize_with(&doc, &RenderConfig::XHTML).as_deref(),
            Some(r#"<img src="a.png" srcset="a@2x.png 2x" alt="A" />"#)
        );
    }

    #[test]
    fn test_dangling_reference_yields_none() {
        let mut doc = Document::new();
        para(
            &mut doc,
            BlockType::Unstyled,
            vec![Run::new("x").with_entity(EntityKey::from_raw(42))],
        );
        assert!(serialize(&doc).is_none());
        assert!(matches!(
            try_serialize(&doc),
            Err(ConvertError::DanglingEntity { .. })
        ));
    }

    #[test]
    fn test_dangling_atomic_yields_none() {
        let mut doc = Document::new();
        para(&mut doc, BlockType::Unstyled, vec![Run::new("before")]);
        doc.push_block(Block::atomic(EntityKey::from_raw(9)));
        // No partial output even though the first block rendered fine
        assert_eq!(serialize(&doc), None);
    }

    #[test]
    fn test_textual_atomic_block_is_an_error() {
        let mut doc = Document::new();
        doc.push_block(Block::text(BlockType::Atomic));
        assert!(matches!(
            try_serialize(&doc),
            Err(ConvertError::MissingAtomicEntity { .. })
        ));
    }

    #[test]
    fn test_block_tags_and_escaping() {
        let mut doc = Document::new();
        para(&mut doc, BlockType::HeaderTwo, vec![Run::new("a < b & c")]);
        para(&mut doc, BlockType::Blockquote, vec![Run::new("line\nbreak")]);
        para(&mut doc, BlockType::CodeBlock, vec![Run::new("x\n  y")]);

        assert_eq!(
            serialize(&doc).as_deref(),
            Some("<h2>a &lt; b &amp; c</h2><blockquote>line<br>break</blockquote><pre>x\n  y</pre>")
        );
    }

    #[test]
    fn test_code_block_leading_newline_survives() {
        let mut doc = Document::new();
        para(&mut doc, BlockType::CodeBlock, vec![Run::new("\nx")]);
        assert_eq!(serialize(&doc).as_deref(), Some("<pre>\n\nx</pre>"));
    }

    #[test]
    fn test_lists_group_and_nest() {
        let mut doc = Document::new();
        para(&mut doc, BlockType::UnorderedListItem, vec![Run::new("a")]);
        doc.push_block({
            let mut b = Block::text(BlockType::UnorderedListItem).with_depth(1);
            b.push_run(Run::new("a1"));
            b
        });
        para(&mut doc, BlockType::UnorderedListItem, vec![Run::new("b")]);
        para(&mut doc, BlockType::OrderedListItem, vec![Run::new("one")]);
        para(&mut doc, BlockType::Unstyled, vec![Run::new("end")]);

        assert_eq!(
            serialize(&doc).as_deref(),
            Some(concat!(
                "<ul><li>a<ul><li>a1</li></ul></li><li>b</li></ul>",
                "<ol><li>one</li></ol>",
                "<p>end</p>"
            ))
        );
    }

    #[test]
    fn test_list_depth_jump_stays_well_formed() {
        let mut doc = Document::new();
        doc.push_block({
            let mut b = Block::text(BlockType::OrderedListItem).with_depth(1);
            b.push_run(Run::new("deep"));
            b
        });
        assert_eq!(
            serialize(&doc).as_deref(),
            Some("<ol><li><ol><li>deep</li></ol></li></ol>")
        );
    }

    #[test]
    fn test_custom_link_attributes() {
        let mut doc = Document::new();
        let link = doc.add_entity(Entity::link("https://a\"b"));
        para(&mut doc, BlockType::Unstyled, vec![Run::new("x").with_entity(link)]);

        let config = RenderConfig::DEFAULT
            .with_link_rel("noopener noreferrer")
            .with_link_target("");
        assert_eq!(
            serialize_with(&doc, &config).as_deref(),
            Some(r#"<p><a href="https://a&quot;b" rel="noopener noreferrer">x</a></p>"#)
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }
}
