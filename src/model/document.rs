//! Document type and related utilities
//!
//! The root container: ordered blocks plus the entity map they reference.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ConvertError, ConvertResult};
use crate::hash::StableHasher;

use super::block::{Block, BlockBody};
use super::entity::{Entity, EntityKey, EntityKind, EntityMap};

// =============================================================================
// Document
// =============================================================================

/// Rich-text document: blocks in reading order plus an entity table
///
/// A fresh document is built by every parse. The renderer only reads it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Blocks in reading order
    pub blocks: Vec<Block>,
    /// Entities referenced by runs and atomic blocks
    pub entities: EntityMap,
}

impl Document {
    /// The empty document: no blocks, no entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the document holds no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Store an entity and return its key
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        self.entities.insert(entity)
    }

    /// Look up an entity by key
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Drop entities that no block references
    ///
    /// Removed keys stay retired; the map never hands them out again.
    pub fn retain_referenced_entities(&mut self) {
        let referenced: FxHashSet<EntityKey> = self.entity_refs().collect();
        let orphans: Vec<EntityKey> = self
            .entities
            .iter()
            .map(|(key, _)| key)
            .filter(|key| !referenced.contains(key))
            .collect();
        for key in orphans {
            self.entities.remove(key);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first block matching predicate
    pub fn find_block<F>(&self, predicate: F) -> Option<&Block>
    where
        F: Fn(&Block) -> bool,
    {
        self.blocks.iter().find(|b| predicate(b))
    }

    /// Entities of the given kind, in the order blocks first reference them
    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        for key in self.entity_refs() {
            if !seen.insert(key) {
                continue;
            }
            if let Some(entity) = self.entity(key).filter(|e| e.kind() == kind) {
                found.push(entity);
            }
        }
        found
    }

    /// Every entity reference in reading order, duplicates included
    pub fn entity_refs(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.blocks.iter().flat_map(Block::entity_refs)
    }

    /// Text of every block, joined by newlines (atomic blocks contribute "")
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the structural invariants
    ///
    /// Every entity reference resolves, and every atomic-typed block
    /// carries an entity.
    pub fn validate(&self) -> ConvertResult<()> {
        for block in &self.blocks {
            if block.block_type == super::BlockType::Atomic && !block.is_atomic() {
                return Err(ConvertError::MissingAtomicEntity {
                    block: block.key.clone(),
                });
            }
            if let Some(key) = block.entity_refs().find(|k| !self.entities.contains(*k)) {
                return Err(ConvertError::dangling(&block.key, key));
            }
        }
        Ok(())
    }

    /// Deterministic content hash
    ///
    /// Covers block types, depths, text, styles and the resolved entity
    /// payloads. Raw block and entity keys are left out, so documents that
    /// differ only in key numbering hash equally. Each entity is hashed as
    /// the ordinal of its first reference, so two runs sharing one link
    /// differ from two links with the same URL.
    pub fn fingerprint(&self) -> u64 {
        let mut ordinals = FxHashMap::default();
        let mut hasher = StableHasher::new().update_usize(self.blocks.len());
        for block in &self.blocks {
            hasher = hasher
                .update_str(block.block_type.as_str())
                .update_usize(block.depth);
            hasher = match &block.body {
                BlockBody::Atomic(key) => {
                    self.hash_entity_ref(hasher.update(&[0]), Some(*key), &mut ordinals)
                }
                BlockBody::Text(runs) => {
                    let mut h = hasher.update(&[1]).update_usize(runs.len());
                    for run in runs {
                        h = h.update_str(&run.text).update(&[run.styles.bits()]);
                        h = self.hash_entity_ref(h, run.entity, &mut ordinals);
                    }
                    h
                }
            };
        }
        hasher.finish()
    }

    fn hash_entity_ref(
        &self,
        hasher: StableHasher,
        key: Option<EntityKey>,
        ordinals: &mut FxHashMap<EntityKey, usize>,
    ) -> StableHasher {
        let Some(key) = key else {
            return hasher.update(&[0]);
        };
        let next = ordinals.len();
        let ordinal = *ordinals.entry(key).or_insert(next);
        let hasher = hasher.update_usize(ordinal);
        match self.entity(key) {
            None => hasher.update(&[1]),
            Some(entity) => entity.hash_into(hasher.update(&[2])),
        }
    }

    /// Collect statistics about the document
    pub fn collect_stats(&self) -> Stats {
        let mut stats = Stats {
            block_count: self.blocks.len(),
            entity_count: self.entities.len(),
            ..Default::default()
        };
        for block in &self.blocks {
            if block.is_atomic() {
                stats.atomic_count += 1;
            }
            stats.run_count += block.runs().len();
            stats.text_len += block.runs().iter().map(|r| r.text.chars().count()).sum::<usize>();
        }
        for (_, entity) in self.entities.iter() {
            match entity.kind() {
                EntityKind::Link => stats.link_count += 1,
                EntityKind::Image => stats.image_count += 1,
                EntityKind::Other => {}
            }
        }
        stats
    }
}

// =============================================================================
// Stats - document statistics
// =============================================================================

/// Document statistics collected from traversal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub block_count: usize,
    pub atomic_count: usize,
    pub run_count: usize,
    pub entity_count: usize,
    pub link_count: usize,
    pub image_count: usize,
    /// Characters across all runs
    pub text_len: usize,
}

impl Stats {
    pub fn has_links(&self) -> bool {
        self.link_count > 0
    }

    pub fn has_images(&self) -> bool {
        self.image_count > 0
    }
}
