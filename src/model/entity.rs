//! Entities: separately stored link and image records
//!
//! Runs and atomic blocks hold a lightweight [`EntityKey`]; the payload
//! lives once in the document's [`EntityMap`]. A link spanning several
//! runs therefore stores its URL exactly once.

use std::fmt;

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::attr::{Attrs, AttrsExt};
use crate::hash::StableHasher;

// =============================================================================
// EntityKey
// =============================================================================

/// Identifier of an entity within one document
///
/// Allocated by [`EntityMap::insert`] from a monotonic counter, so a key
/// is never handed out twice by the same map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(u32);

impl EntityKey {
    /// Create a key from its raw value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Kind / Mutability
// =============================================================================

/// Entity classification, derived from the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Link,
    Image,
    Other,
}

/// How the content bound to an entity may be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    /// Bound text may be edited or extended; removal drops only the binding
    #[default]
    Mutable,
    /// The bound unit is edited or removed only as a whole
    Immutable,
    /// Bound text is removed word by word
    Segmented,
}

impl Mutability {
    impl_name_table!(
        Mutable => "MUTABLE",
        Immutable => "IMMUTABLE",
        Segmented => "SEGMENTED",
    );
}

// =============================================================================
// Payloads
// =============================================================================

/// Link payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkData {
    /// Target URL, verbatim from `href` (empty when absent)
    pub url: String,
}

impl LinkData {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Image payload, attributes taken verbatim from the `<img>` tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    pub src: Option<String>,
    pub src_set: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
}

impl ImageData {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_src_set(mut self, src_set: impl Into<String>) -> Self {
        self.src_set = Some(src_set.into());
        self
    }

    /// Read `src`, `srcset`, `title` and `alt` from an attribute list
    pub fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            src: attrs.get_owned("src"),
            src_set: attrs.get_owned("srcset"),
            title: attrs.get_owned("title"),
            alt: attrs.get_owned("alt"),
        }
    }

    /// Attributes to emit, in `src, srcset, title, alt` order, absent ones skipped
    pub fn to_attrs(&self) -> Attrs {
        [
            ("src", &self.src),
            ("srcset", &self.src_set),
            ("title", &self.title),
            ("alt", &self.alt),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
    }
}

/// Payload of an entity kind this crate does not interpret
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtherData {
    /// Type name, e.g. `"MENTION"`
    pub type_name: CompactString,
    pub attrs: Attrs,
}

/// Entity payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityData {
    Link(LinkData),
    Image(ImageData),
    Other(OtherData),
}

impl EntityData {
    impl_variant_accessors!(link => LinkData, image => ImageData, other => OtherData);
}

// =============================================================================
// Entity
// =============================================================================

/// A typed, separately stored record referenced by runs or atomic blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub mutability: Mutability,
    pub data: EntityData,
}

impl Entity {
    /// Link entity (`MUTABLE`)
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            mutability: Mutability::Mutable,
            data: EntityData::Link(LinkData::new(url)),
        }
    }

    /// Image entity (`IMMUTABLE`)
    pub fn image(data: ImageData) -> Self {
        Self {
            mutability: Mutability::Immutable,
            data: EntityData::Image(data),
        }
    }

    /// Entity of a caller-defined kind
    pub fn other(type_name: impl Into<CompactString>, mutability: Mutability, attrs: Attrs) -> Self {
        Self {
            mutability,
            data: EntityData::Other(OtherData {
                type_name: type_name.into(),
                attrs,
            }),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match &self.data {
            EntityData::Link(_) => EntityKind::Link,
            EntityData::Image(_) => EntityKind::Image,
            EntityData::Other(_) => EntityKind::Other,
        }
    }

    /// Type name: `"LINK"`, `"IMAGE"`, or the custom name
    pub fn type_name(&self) -> &str {
        match &self.data {
            EntityData::Link(_) => "LINK",
            EntityData::Image(_) => "IMAGE",
            EntityData::Other(other) => &other.type_name,
        }
    }

    /// Feed kind, mutability and payload into a hasher
    pub(crate) fn hash_into(&self, hasher: StableHasher) -> StableHasher {
        let hasher = hasher
            .update_str(self.type_name())
            .update_str(self.mutability.as_str());
        match &self.data {
            EntityData::Link(link) => hasher.update_str(&link.url),
            EntityData::Image(image) => hasher
                .update_opt_str(image.src.as_deref())
                .update_opt_str(image.src_set.as_deref())
                .update_opt_str(image.title.as_deref())
                .update_opt_str(image.alt.as_deref()),
            EntityData::Other(other) => other
                .attrs
                .iter()
                .fold(hasher.update_usize(other.attrs.len()), |h, (k, v)| {
                    h.update_str(k).update_str(v)
                }),
        }
    }
}

// =============================================================================
// EntityMap
// =============================================================================

/// Entity table keyed by [`EntityKey`]
///
/// Keys carry no ordering guarantee; iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    entries: FxHashMap<EntityKey, Entity>,
    last_key: u32,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity under a freshly allocated key
    pub fn insert(&mut self, entity: Entity) -> EntityKey {
        self.last_key += 1;
        let key = EntityKey(self.last_key);
        self.entries.insert(key, entity);
        key
    }

    #[inline]
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entries.get(&key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entries.get_mut(&key)
    }

    /// Remove an entity. Its key is not handed out again.
    pub fn remove(&mut self, key: EntityKey) -> Option<Entity> {
        self.entries.remove(&key)
    }

    #[inline]
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entries.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_never_reused() {
        let mut map = EntityMap::new();
        let a = map.insert(Entity::link("https://a"));
        let b = map.insert(Entity::link("https://a"));
        assert_ne!(a, b);
        assert_eq!(map.len(), 2);

        map.remove(b);
        let c = map.insert(Entity::link("https://c"));
        assert_ne!(b, c);
        assert!(!map.contains(b));
    }

    #[test]
    fn test_kind_follows_payload() {
        let link = Entity::link("https://example.com");
        assert_eq!(link.kind(), EntityKind::Link);
        assert_eq!(link.type_name(), "LINK");
        assert_eq!(link.mutability, Mutability::Mutable);

        let image = Entity::image(ImageData::new("a.png"));
        assert_eq!(image.kind(), EntityKind::Image);
        assert_eq!(image.mutability, Mutability::Immutable);

        let mention = Entity::other("MENTION", Mutability::Segmented, Vec::new());
        assert_eq!(mention.kind(), EntityKind::Other);
        assert_eq!(mention.type_name(), "MENTION");
    }

    #[test]
    fn test_image_attrs_skip_absent() {
        let attrs: Attrs = vec![
            ("alt".into(), "A".into()),
            ("src".into(), "a.png".into()),
            ("class".into(), "wide".into()),
        ];
        let image = ImageData::from_attrs(&attrs);
        assert_eq!(image, ImageData::new("a.png").with_alt("A"));
        assert_eq!(
            image.to_attrs(),
            vec![("src".to_string(), "a.png".to_string()), ("alt".to_string(), "A".to_string())]
        );
    }

    #[test]
    fn test_payload_accessors() {
        let entity = Entity::link("https://example.com");
        assert_eq!(entity.data.as_link().map(|l| l.url.as_str()), Some("https://example.com"));
        assert!(entity.data.as_image().is_none());
    }
}
