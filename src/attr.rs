//! Attribute lists for parsed elements and opaque entity payloads
//!
//! Attributes stay a plain `Vec<(String, String)>`: element attribute
//! lists are short and their source order is worth keeping.

/// Element attributes as ordered key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
///
/// Name lookups ignore ASCII case, matching HTML attribute semantics
/// (`srcSet` and `srcset` are the same attribute).
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Get an attribute value by name as an owned string
    fn get_owned(&self, name: &str) -> Option<String> {
        self.get_attr(name).map(str::to_owned)
    }
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
