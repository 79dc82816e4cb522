//! Inline style markers carried by text runs.

use std::fmt;

// =============================================================================
// InlineStyle
// =============================================================================

/// A character-level style marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl InlineStyle {
    /// All styles in canonical order (outermost tag first when rendered)
    pub const ALL: [InlineStyle; 5] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::Code,
    ];

    impl_name_table!(
        Bold => "BOLD",
        Italic => "ITALIC",
        Underline => "UNDERLINE",
        Strikethrough => "STRIKETHROUGH",
        Code => "CODE",
    );

    /// Style implied by an inline HTML tag, if any
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" | "strong" => Some(Self::Bold),
            "i" | "em" => Some(Self::Italic),
            "u" | "ins" => Some(Self::Underline),
            "s" | "del" | "strike" => Some(Self::Strikethrough),
            "code" | "kbd" | "samp" | "tt" => Some(Self::Code),
            _ => None,
        }
    }

    /// Tag emitted when rendering this style
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Bold => "strong",
            Self::Italic => "em",
            Self::Underline => "u",
            Self::Strikethrough => "s",
            Self::Code => "code",
        }
    }

    const fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// InlineStyles - compact set
// =============================================================================

/// Set of inline styles, stored as a bitmask
///
/// Iteration always follows [`InlineStyle::ALL`] order, so two equal sets
/// render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InlineStyles(u8);

impl InlineStyles {
    /// The empty set
    pub const NONE: Self = Self(0);

    /// Check whether the set is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(&self, style: InlineStyle) -> bool {
        self.0 & style.bit() != 0
    }

    /// Return a copy with `style` added
    #[inline]
    #[must_use]
    pub const fn with(self, style: InlineStyle) -> Self {
        Self(self.0 | style.bit())
    }

    #[inline]
    pub fn insert(&mut self, style: InlineStyle) {
        self.0 |= style.bit();
    }

    #[inline]
    pub fn remove(&mut self, style: InlineStyle) {
        self.0 &= !style.bit();
    }

    /// Number of styles in the set
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = InlineStyle> + use<> {
        let set = *self;
        InlineStyle::ALL.into_iter().filter(move |s| set.contains(*s))
    }

    /// Raw bitmask (stable across versions, used for fingerprints)
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

impl FromIterator<InlineStyle> for InlineStyles {
    fn from_iter<I: IntoIterator<Item = InlineStyle>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for style in iter {
            set.insert(style);
        }
        set
    }
}
