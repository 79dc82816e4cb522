//! HTML to document conversion
//!
//! The input first gets link styles injected, then html5ever builds a DOM,
//! and a single depth-first walk turns it into blocks, runs and entities:
//!
//! ```text
//! raw html ──inject_link_style──▶ styled html ──html5ever──▶ RcDom
//!                                                              │ Walker
//!                                                              ▼
//!                                                          Document
//! ```
//!
//! `<img>` becomes an atomic block bound to an `IMAGE` entity and `<a>`
//! binds its text to a `LINK` entity. Other tags map onto the generic
//! block and inline-style vocabulary. Unknown tags are transparent and
//! their text is kept. Parsing never fails.

use std::borrow::Cow;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt};
use crate::model::{
    Block, BlockBody, BlockKey, BlockType, Document, Entity, EntityKey, ImageData, InlineStyle,
    InlineStyles, Run,
};
use crate::style::{LinkStyle, inject_link_style};

/// Content nested deeper than this is flattened to its text
const MAX_NESTING: usize = 512;

/// Elements whose content never reaches the document
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "title", "iframe", "object", "svg", "math",
];

// =============================================================================
// ParseConfig
// =============================================================================

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Style injected into anchors before parsing
    pub link_style: LinkStyle,
    /// Run the style injector at all
    pub inject_link_style: bool,
}

impl ParseConfig {
    pub const DEFAULT: Self = Self {
        link_style: LinkStyle::DEFAULT,
        inject_link_style: true,
    };

    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    /// Skip style injection (for HTML that was already injected once)
    pub fn without_link_style(mut self) -> Self {
        self.inject_link_style = false;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Parse HTML with the default config.
///
/// `None` and `""` both yield the empty document.
pub fn parse(html: Option<&str>) -> Document {
    parse_with(html, &ParseConfig::DEFAULT)
}

/// Parse HTML with an explicit config.
pub fn parse_with(html: Option<&str>, config: &ParseConfig) -> Document {
    let html = match html {
        Some(html) if !html.is_empty() => html,
        _ => return Document::new(),
    };

    let styled = if config.inject_link_style {
        Cow::Owned(inject_link_style(html, &config.link_style))
    } else {
        Cow::Borrowed(html)
    };

    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(&*styled);
    if !dom.errors.is_empty() {
        log::debug!("html recovered from {} parse error(s)", dom.errors.len());
    }

    let mut walker = Walker::new();
    walker.walk(&dom.document, 0);
    walker.finish()
}

/// Parse independent inputs in parallel.
#[cfg(feature = "parallel")]
pub fn parse_batch(inputs: &[&str], config: &ParseConfig) -> Vec<Document> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|html| parse_with(Some(html), config))
        .collect()
}

// =============================================================================
// Walker
// =============================================================================

/// Block type and depth that implicit text blocks inherit
#[derive(Debug, Clone, Copy)]
struct BlockContext {
    block_type: BlockType,
    depth: usize,
}

/// DOM walk state
struct Walker {
    doc: Document,
    /// Text block being filled
    current: Option<Block>,
    contexts: SmallVec<[BlockContext; 8]>,
    /// Item type of each open `ul`/`ol`
    lists: SmallVec<[BlockType; 4]>,
    styles: InlineStyles,
    link: Option<EntityKey>,
    /// Open `<pre>` elements
    pre: usize,
    key_seed: u64,
    used_keys: FxHashSet<BlockKey>,
}

impl Walker {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            current: None,
            contexts: SmallVec::new(),
            lists: SmallVec::new(),
            styles: InlineStyles::NONE,
            link: None,
            pre: 0,
            key_seed: 0,
            used_keys: FxHashSet::default(),
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        self.doc.retain_referenced_entities();
        self.doc
    }

    fn walk(&mut self, handle: &Handle, nesting: usize) {
        if nesting > MAX_NESTING {
            log::debug!("flattening content nested deeper than {MAX_NESTING}");
            self.flatten_text(handle);
            return;
        }
        match &handle.data {
            NodeData::Document => self.walk_children(handle, nesting),
            NodeData::Element { name, attrs, .. } => {
                let attrs: Attrs = attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                self.element(&name.local, &attrs, handle, nesting);
            }
            NodeData::Text { contents } => self.text(&contents.borrow()),
            // Comments, doctypes, processing instructions
            _ => {}
        }
    }

    fn walk_children(&mut self, handle: &Handle, nesting: usize) {
        for child in handle.children.borrow().iter() {
            self.walk(child, nesting + 1);
        }
    }

    /// Append the text under `handle` with an explicit stack, dropping markup
    fn flatten_text(&mut self, handle: &Handle) {
        let mut stack: Vec<Handle> = vec![handle.clone()];
        while let Some(node) = stack.pop() {
            match &node.data {
                NodeData::Text { contents } => self.text(&contents.borrow()),
                NodeData::Element { name, .. } => match &*name.local {
                    tag if SKIPPED_TAGS.contains(&tag) => {}
                    "br" => self.line_break(),
                    _ => stack.extend(node.children.borrow().iter().rev().cloned()),
                },
                _ => {}
            }
        }
    }

    fn element(&mut self, tag: &str, attrs: &Attrs, handle: &Handle, nesting: usize) {
        match tag {
            _ if SKIPPED_TAGS.contains(&tag) => {
                log::debug!("skipping <{tag}>");
            }

            "img" => self.image(attrs),

            "br" => self.line_break(),

            "hr" => self.flush(),

            "a" => {
                let url = attrs.get_owned("href").unwrap_or_default();
                let key = self.doc.add_entity(Entity::link(url));
                let saved = self.link.replace(key);
                self.walk_children(handle, nesting);
                self.link = saved;
            }

            "ul" | "ol" => {
                let item = if tag == "ol" {
                    BlockType::OrderedListItem
                } else {
                    BlockType::UnorderedListItem
                };
                self.flush();
                self.lists.push(item);
                self.walk_children(handle, nesting);
                self.flush();
                self.lists.pop();
            }

            "li" => {
                let block_type = self
                    .lists
                    .last()
                    .copied()
                    .unwrap_or(BlockType::UnorderedListItem);
                let depth = self.lists.len().saturating_sub(1);
                self.block(block_type, depth, handle, nesting);
            }

            "pre" => {
                self.pre += 1;
                self.block(BlockType::CodeBlock, 0, handle, nesting);
                self.pre -= 1;
            }

            "blockquote" => self.block(BlockType::Blockquote, 0, handle, nesting),

            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag.as_bytes()[1] - b'0';
                let block_type = BlockType::header(level).unwrap_or_default();
                self.block(block_type, 0, handle, nesting);
            }

            "p" | "div" | "section" | "article" | "main" | "header" | "footer" | "aside"
            | "nav" | "figure" | "figcaption" | "address" | "details" | "summary" | "dd"
            | "dt" => {
                // Generic containers inherit the enclosing block, e.g. `<li><p>`
                let context = self.contexts.last().copied().unwrap_or(BlockContext {
                    block_type: BlockType::Unstyled,
                    depth: 0,
                });
                self.block(context.block_type, context.depth, handle, nesting);
            }

            _ => match InlineStyle::from_tag(tag) {
                // Code blocks already mark their text as code
                Some(InlineStyle::Code) if self.pre > 0 => self.walk_children(handle, nesting),
                Some(style) => {
                    let saved = self.styles;
                    self.styles.insert(style);
                    self.walk_children(handle, nesting);
                    self.styles = saved;
                }
                // Unknown or purely presentational: keep the text
                None => self.walk_children(handle, nesting),
            },
        }
    }

    /// Walk `handle` as its own block
    fn block(&mut self, block_type: BlockType, depth: usize, handle: &Handle, nesting: usize) {
        self.flush();
        self.contexts.push(BlockContext { block_type, depth });
        self.walk_children(handle, nesting);
        self.flush();
        self.contexts.pop();
    }

    fn image(&mut self, attrs: &Attrs) {
        self.flush();
        let key = self.doc.add_entity(Entity::image(ImageData::from_attrs(attrs)));
        self.push_block(Block::atomic(key));
    }

    fn text(&mut self, text: &str) {
        if self.pre > 0 {
            self.append(text);
            return;
        }

        let collapsed = collapse_whitespace(text);
        let at_line_start = self.current.as_ref().is_none_or(|block| {
            block
                .runs()
                .last()
                .is_none_or(|run| run.text.ends_with([' ', '\n']))
        });
        let text = if at_line_start {
            collapsed.trim_start_matches(' ')
        } else {
            collapsed.as_str()
        };
        if !text.is_empty() {
            self.append(text);
        }
    }

    /// `<br>`: end the line, dropping spaces left before it
    fn line_break(&mut self) {
        if self.pre == 0 {
            if let Some(BlockBody::Text(runs)) = self.current.as_mut().map(|b| &mut b.body) {
                trim_trailing_spaces(runs);
            }
        }
        self.append("\n");
    }

    /// Append text verbatim to the current block, opening one if needed
    fn append(&mut self, text: &str) {
        let run = Run {
            text: text.to_owned(),
            styles: self.styles,
            entity: self.link,
        };
        let context = self.contexts.last().copied();
        self.current
            .get_or_insert_with(|| match context {
                Some(ctx) => Block::text(ctx.block_type).with_depth(ctx.depth),
                None => Block::text(BlockType::Unstyled),
            })
            .push_run(run);
    }

    /// Close the current text block
    fn flush(&mut self) {
        let Some(mut block) = self.current.take() else {
            return;
        };
        if !block.block_type.preserves_whitespace() {
            if let BlockBody::Text(runs) = &mut block.body {
                trim_trailing_spaces(runs);
            }
        }
        if block.is_blank() {
            return;
        }
        self.push_block(block);
    }

    fn push_block(&mut self, block: Block) {
        let key = self.next_key();
        self.doc.push_block(block.with_key(key));
    }

    fn next_key(&mut self) -> BlockKey {
        loop {
            let key = BlockKey::generate(self.key_seed);
            self.key_seed += 1;
            if self.used_keys.insert(key.clone()) {
                return key;
            }
        }
    }
}

/// Collapse runs of HTML whitespace into single spaces
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn trim_trailing_spaces(runs: &mut crate::model::Runs) {
    while let Some(last) = runs.last_mut() {
        let len = last.text.trim_end_matches(' ').len();
        last.text.truncate(len);
        if !last.text.is_empty() {
            break;
        }
        runs.pop();
    }
}

// =============================================================================
// Tests
// =============================================================================
