//! Prelude module for common imports.
//!
//! ```ignore
//! use richtext_html::prelude::*;
//! ```

// Entry points
pub use crate::{document_to_html, html_to_document};

// Model
pub use crate::model::{
    Block, BlockBody, BlockKey, BlockType, Document, Entity, EntityData, EntityKey, EntityKind,
    ImageData, InlineStyle, InlineStyles, LinkData, Mutability, Run,
};

// Parse
pub use crate::parse::{ParseConfig, parse, parse_with};

#[cfg(feature = "parallel")]
pub use crate::parse::parse_batch;

// Render
pub use crate::render::{RenderConfig, serialize, serialize_with, try_serialize};

// Style
pub use crate::style::{LinkStyle, inject_link_style};

// Seams
pub use crate::source::{ContentSource, IntoDocument, serialize_state};

// Error
pub use crate::error::{ConvertError, ConvertResult};
