//! Conversion seams between callers and the converter
//!
//! - [`IntoDocument`]: what can become a [`Document`]. Raw HTML is parsed,
//!   a `Document` passes through untouched, so an already-parsed document
//!   can never be parsed twice.
//! - [`ContentSource`]: an externally owned editor state that can hand out
//!   its current document, or fail to.

use crate::model::Document;
use crate::parse::{ParseConfig, parse_with};
use crate::render::{RenderConfig, serialize_with};

// =============================================================================
// IntoDocument
// =============================================================================

/// Input accepted by [`html_to_document`](crate::html_to_document)
pub trait IntoDocument {
    fn into_document(self, config: &ParseConfig) -> Document;
}

impl IntoDocument for Document {
    #[inline]
    fn into_document(self, _config: &ParseConfig) -> Document {
        self
    }
}

impl IntoDocument for &str {
    fn into_document(self, config: &ParseConfig) -> Document {
        parse_with(Some(self), config)
    }
}

impl IntoDocument for String {
    fn into_document(self, config: &ParseConfig) -> Document {
        parse_with(Some(&self), config)
    }
}

impl IntoDocument for &String {
    fn into_document(self, config: &ParseConfig) -> Document {
        parse_with(Some(self), config)
    }
}

impl<T: IntoDocument> IntoDocument for Option<T> {
    fn into_document(self, config: &ParseConfig) -> Document {
        match self {
            Some(input) => input.into_document(config),
            None => Document::new(),
        }
    }
}

// =============================================================================
// ContentSource
// =============================================================================

/// Something that holds the document currently being edited
///
/// The holder owns and mutates its document; the converter only reads the
/// snapshot it returns. `None` means the content is unavailable.
pub trait ContentSource {
    fn current_content(&self) -> Option<&Document>;
}

impl ContentSource for Document {
    #[inline]
    fn current_content(&self) -> Option<&Document> {
        Some(self)
    }
}

impl<T: ContentSource> ContentSource for Option<T> {
    fn current_content(&self) -> Option<&Document> {
        self.as_ref().and_then(ContentSource::current_content)
    }
}

/// Render the current content of an editor state
///
/// A missing state, or a state without content, renders as the empty
/// document (`Some("")`). `None` still means rendering failed.
pub fn serialize_state<S>(state: Option<&S>) -> Option<String>
where
    S: ContentSource + ?Sized,
{
    serialize_state_with(state, &RenderConfig::DEFAULT)
}

/// [`serialize_state`] with an explicit render config
pub fn serialize_state_with<S>(state: Option<&S>, config: &RenderConfig) -> Option<String>
where
    S: ContentSource + ?Sized,
{
    match state.and_then(ContentSource::current_content) {
        Some(doc) => serialize_with(doc, config),
        None => serialize_with(&Document::new(), config),
    }
}
