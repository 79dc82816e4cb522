//! Rich-text document model
//!
//! Shared between the parser and the renderer:
//!
//! - [`Document`]: ordered [`Block`]s plus an [`EntityMap`]
//! - [`Block`]: a text block of [`Run`]s, or an atomic block bound to one entity
//! - [`Entity`]: link or image metadata, stored once and referenced by key

mod block;
mod document;
mod entity;
mod inline;

pub use block::{Block, BlockBody, BlockKey, BlockType, Run, Runs};
pub use document::{Document, Stats};
pub use entity::{
    Entity, EntityData, EntityKey, EntityKind, EntityMap, ImageData, LinkData, Mutability,
    OtherData,
};
pub use inline::{InlineStyle, InlineStyles};
