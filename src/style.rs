//! Anchor style injection
//!
//! Rewrites every `<a ...>` opening tag in raw HTML to carry an inline
//! `style` with a color and a text decoration, both `!important`, so links
//! look the same whatever stylesheet the HTML came from.
//!
//! The rewrite is cosmetic and best effort: it never fails, and on any
//! internal problem it hands back the input untouched.
//!
//! It is also not idempotent. Running it on already-styled HTML appends a
//! second `style` attribute, so inject at most once per raw string.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Default link color (a theme variable, blue)
pub const DEFAULT_LINK_COLOR: &str = "var(--chakra-colors-blue-500)";

/// Default link decoration
pub const DEFAULT_TEXT_DECORATION: &str = "underline";

const IMPORTANT: &str = "!important";

/// Matches an anchor opening tag: `<a>` or `<a` followed by whitespace and attributes
static ANCHOR_OPEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<a(\s[^>]*)?>").ok());

// =============================================================================
// LinkStyle
// =============================================================================

/// Link appearance overrides
///
/// Each field independently replaces one default; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStyle {
    /// CSS color or variable reference
    pub color: Option<String>,
    /// CSS `text-decoration` value
    pub text_decoration: Option<String>,
}

impl LinkStyle {
    /// All defaults.
    pub const DEFAULT: Self = Self {
        color: None,
        text_decoration: None,
    };

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_text_decoration(mut self, decoration: impl Into<String>) -> Self {
        self.text_decoration = Some(decoration.into());
        self
    }

    /// Effective color; a blank override counts as absent
    pub fn color(&self) -> &str {
        non_blank(self.color.as_deref()).unwrap_or(DEFAULT_LINK_COLOR)
    }

    /// Effective decoration; a blank override counts as absent
    pub fn text_decoration(&self) -> &str {
        non_blank(self.text_decoration.as_deref()).unwrap_or(DEFAULT_TEXT_DECORATION)
    }

    /// The inline declaration list, e.g.
    /// `color: red !important; text-decoration: underline !important;`
    pub fn declarations(&self) -> String {
        format!(
            "color: {}; text-decoration: {};",
            important(self.color()),
            important(self.text_decoration())
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Append `!important` unless the value already carries it
fn important(value: &str) -> Cow<'_, str> {
    let value = value.trim();
    if value.ends_with(IMPORTANT) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{value} {IMPORTANT}"))
    }
}

// =============================================================================
// Injection
// =============================================================================

/// Append an inline link style to every anchor opening tag in `html`
///
/// Returns the input unchanged if the rewrite cannot be performed.
pub fn inject_link_style(html: &str, style: &LinkStyle) -> String {
    let Some(pattern) = ANCHOR_OPEN.as_ref() else {
        log::debug!("anchor pattern unavailable, leaving html unstyled");
        return html.to_owned();
    };

    let declarations = style.declarations();
    let styled = pattern.replace_all(html, |caps: &Captures<'_>| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        // Closure replacer: `$` in caller-supplied values stays literal
        format!("<a{attrs} style=\"{}\">", escape_quotes(&declarations))
    });
    styled.into_owned()
}

/// A quote in a caller value would end the attribute early
fn escape_quotes(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(s.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(s)
    }
}
