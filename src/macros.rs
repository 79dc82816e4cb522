//! Accessor and name-table macros
//!
//! These macros eliminate repetitive match code on the model enums.
//! Accessor generation uses `paste` for identifier concatenation.

// =============================================================================
// Variant accessor generation
// =============================================================================

/// Generate is_xxx, as_xxx, as_xxx_mut for enums with single-field variants
///
/// Uses paste's `:camel` modifier to convert method name to variant name.
/// # Generated methods per variant:
/// - `is_xxx(&self) -> bool`
/// - `as_xxx(&self) -> Option<&Type>`
/// - `as_xxx_mut(&mut self) -> Option<&mut Type>`
///
/// # Example
/// ```ignore
/// impl EntityData {
///     // link -> Link, image -> Image
///     impl_variant_accessors!(link => LinkData, image => ImageData);
/// }
/// ```
macro_rules! impl_variant_accessors {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " [<$variant:camel>] " variant"]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get the " $variant " payload"]
                pub fn [<as_ $variant>](&self) -> Option<&$ty> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }

                #[doc = "Try to get the " $variant " payload mutably"]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut $ty> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }
            )*
        }
    };
}

/// Generate `as_str` / `from_name` for fieldless enums with canonical names
///
/// # Example
/// ```ignore
/// impl BlockType {
///     impl_name_table!(Unstyled => "unstyled", Atomic => "atomic");
/// }
/// ```
macro_rules! impl_name_table {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Canonical string name
        pub const fn as_str(&self) -> &'static str {
            match self {
                $(Self::$variant => $name,)*
            }
        }

        /// Look up a variant by its canonical name
        pub fn from_name(name: &str) -> Option<Self> {
            match name {
                $($name => Some(Self::$variant),)*
                _ => None,
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(u32),
        Label(String),
    }

    impl Shape {
        impl_variant_accessors!(circle => u32, label => String);
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        DarkBlue,
    }

    impl Color {
        impl_name_table!(Red => "red", DarkBlue => "dark-blue");
    }

    #[test]
    fn test_variant_accessors() {
        let mut shape = Shape::Circle(3);
        assert!(shape.is_circle());
        assert!(!shape.is_label());
        assert_eq!(shape.as_circle(), Some(&3));
        assert_eq!(shape.as_label(), None);

        if let Some(r) = shape.as_circle_mut() {
            *r = 5;
        }
        assert_eq!(shape, Shape::Circle(5));
    }

    #[test]
    fn test_name_table() {
        assert_eq!(Color::DarkBlue.as_str(), "dark-blue");
        assert_eq!(Color::from_name("red"), Some(Color::Red));
        assert_eq!(Color::from_name("green"), None);
    }
}
