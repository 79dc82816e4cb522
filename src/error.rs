//! Error types for richtext-html.
//!
//! Parsing never fails and the style injector swallows its own failures,
//! so these errors only describe documents that cannot be rendered.

use thiserror::Error;

use crate::model::{BlockKey, EntityKey};

/// Errors that can occur while rendering a document to HTML.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A block references an entity that is not in the document's entity map
    #[error("block {block} references missing entity {key}")]
    DanglingEntity {
        /// Key of the offending block
        block: BlockKey,
        /// The unresolved entity key
        key: EntityKey,
    },

    /// An atomic block without its entity reference
    #[error("atomic block {block} has no entity")]
    MissingAtomicEntity {
        /// Key of the offending block
        block: BlockKey,
    },

    /// Writing to the output buffer failed
    #[error("write failed: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// Create a dangling-entity error.
    pub fn dangling(block: &BlockKey, key: EntityKey) -> Self {
        Self::DanglingEntity {
            block: block.clone(),
            key,
        }
    }
}
