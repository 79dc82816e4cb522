//! Blocks and runs
//!
//! A block is one top-level content unit: either a text block made of
//! styled runs, or an atomic block bound to a single entity.

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

use super::entity::EntityKey;
use super::inline::InlineStyles;
use crate::hash::StableHasher;

// =============================================================================
// BlockKey
// =============================================================================

const KEY_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const KEY_LEN: usize = 5;

/// Short opaque block identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BlockKey(CompactString);

impl BlockKey {
    /// Derive a 5-character base36 key from a seed
    ///
    /// Deterministic: the same seed always yields the same key. Callers
    /// that need uniqueness vary the seed until an unused key comes out.
    pub fn generate(seed: u64) -> Self {
        let mut n = StableHasher::new()
            .update_str("__block__")
            .update_u64(seed)
            .finish();
        let mut key = CompactString::default();
        for _ in 0..KEY_LEN {
            key.push(KEY_ALPHABET[(n % 36) as usize] as char);
            n /= 36;
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for BlockKey {
    fn from(s: &str) -> Self {
        Self(CompactString::from(s))
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// BlockType
// =============================================================================

/// Block classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
    Atomic,
}

impl BlockType {
    impl_name_table!(
        Unstyled => "unstyled",
        HeaderOne => "header-one",
        HeaderTwo => "header-two",
        HeaderThree => "header-three",
        HeaderFour => "header-four",
        HeaderFive => "header-five",
        HeaderSix => "header-six",
        Blockquote => "blockquote",
        CodeBlock => "code-block",
        UnorderedListItem => "unordered-list-item",
        OrderedListItem => "ordered-list-item",
        Atomic => "atomic",
    );

    /// Header type for `h1`..`h6`
    pub fn header(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::HeaderOne),
            2 => Some(Self::HeaderTwo),
            3 => Some(Self::HeaderThree),
            4 => Some(Self::HeaderFour),
            5 => Some(Self::HeaderFive),
            6 => Some(Self::HeaderSix),
            _ => None,
        }
    }

    #[inline]
    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::UnorderedListItem | Self::OrderedListItem)
    }

    /// Whitespace inside this block is significant
    #[inline]
    pub fn preserves_whitespace(&self) -> bool {
        matches!(self, Self::CodeBlock)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Run
// =============================================================================

/// A contiguous span of text sharing styles and entity binding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub styles: InlineStyles,
    pub entity: Option<EntityKey>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_styles(mut self, styles: InlineStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_entity(mut self, entity: EntityKey) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Same styles and entity binding
    #[inline]
    pub fn same_format(&self, other: &Run) -> bool {
        self.styles == other.styles && self.entity == other.entity
    }
}

/// Run collection of a text block.
pub type Runs = SmallVec<[Run; 4]>;

// =============================================================================
// Block
// =============================================================================

/// Block body: styled text, or a single embedded entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Text(Runs),
    Atomic(EntityKey),
}

impl BlockBody {
    impl_variant_accessors!(text => Runs, atomic => EntityKey);
}

/// One top-level content unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: BlockKey,
    pub block_type: BlockType,
    /// List nesting level, 0 outside lists
    pub depth: usize,
    pub body: BlockBody,
}

impl Block {
    /// Empty text block of the given type
    pub fn text(block_type: BlockType) -> Self {
        Self {
            key: BlockKey::default(),
            block_type,
            depth: 0,
            body: BlockBody::Text(Runs::new()),
        }
    }

    /// Atomic block bound to `entity`
    pub fn atomic(entity: EntityKey) -> Self {
        Self {
            key: BlockKey::default(),
            block_type: BlockType::Atomic,
            depth: 0,
            body: BlockBody::Atomic(entity),
        }
    }

    pub fn with_key(mut self, key: BlockKey) -> Self {
        self.key = key;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Append a run, merging into the previous run when formats match
    ///
    /// Empty text is ignored. Has no effect on atomic blocks.
    pub fn push_run(&mut self, run: Run) -> &mut Self {
        if run.text.is_empty() {
            return self;
        }
        if let BlockBody::Text(runs) = &mut self.body {
            match runs.last_mut() {
                Some(last) if last.same_format(&run) => last.text.push_str(&run.text),
                _ => runs.push(run),
            }
        }
        self
    }

    /// Runs of a text block; empty for atomic blocks
    pub fn runs(&self) -> &[Run] {
        match &self.body {
            BlockBody::Text(runs) => runs.as_slice(),
            BlockBody::Atomic(_) => &[],
        }
    }

    #[inline]
    pub fn is_atomic(&self) -> bool {
        self.body.is_atomic()
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        self.runs().iter().map(|r| r.text.as_str()).collect()
    }

    /// Text block with no text
    pub fn is_blank(&self) -> bool {
        !self.is_atomic() && self.runs().iter().all(|r| r.text.is_empty())
    }

    /// Every entity key this block references, in order, duplicates included
    pub fn entity_refs(&self) -> impl Iterator<Item = EntityKey> + '_ {
        let atomic = self.body.as_atomic().copied();
        atomic
            .into_iter()
            .chain(self.runs().iter().filter_map(|r| r.entity))
    }
}
