//! Schema declaration surface.
//!
//! Each configuration structure exposes a static table of [`FieldDescriptor`]s
//! and a name-keyed accessor that hands out typed mutable slots. The
//! [`configurable!`](crate::configurable) macro generates both from a field
//! listing, so no runtime reflection is involved:
//!
//! ```
//! use config_tiers::configurable;
//!
//! #[derive(Debug, Default)]
//! pub struct Http {
//!     pub port: u16,
//!     pub name: String,
//! }
//!
//! configurable! {
//!     Http {
//!         leaf port: u16 { json: "Port", env: "HTTP_PORT", default: "8080" },
//!         leaf name: String { json: "Name", default: "app" },
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// Marker that suppresses a source, kept for compatibility with tag-style schemas.
pub const OMIT: &str = "-";

/// Bit width of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Pointer-sized (`isize` / `usize`).
    Size,
}

impl IntWidth {
    fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
            IntWidth::Size => usize::BITS,
        }
    }
}

/// Declared primitive kind of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "width", rename_all = "lowercase")]
pub enum FieldKind {
    Str,
    Int(IntWidth),
    Uint(IntWidth),
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Str => write!(f, "string"),
            FieldKind::Int(IntWidth::Size) => write!(f, "isize"),
            FieldKind::Int(w) => write!(f, "i{}", w.bits()),
            FieldKind::Uint(IntWidth::Size) => write!(f, "usize"),
            FieldKind::Uint(w) => write!(f, "u{}", w.bits()),
            FieldKind::Bool => write!(f, "bool"),
        }
    }
}

/// Whether a field holds a primitive or a nested configuration scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Leaf(FieldKind),
    Nested,
}

/// Static description of one field: its name, shape and source keys.
///
/// Built in const context so each schema's table lives in a `static` slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub shape: FieldShape,
    json: Option<&'static str>,
    env: Option<&'static str>,
    default: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn leaf(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            shape: FieldShape::Leaf(kind),
            json: None,
            env: None,
            default: None,
        }
    }

    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            shape: FieldShape::Nested,
            json: None,
            env: None,
            default: None,
        }
    }

    pub const fn json(mut self, key: &'static str) -> Self {
        self.json = Some(key);
        self
    }

    pub const fn env(mut self, key: &'static str) -> Self {
        self.env = Some(key);
        self
    }

    pub const fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    /// JSON key, or `None` when absent or omitted.
    pub fn json_key(&self) -> Option<&'static str> {
        self.json.filter(|k| *k != OMIT)
    }

    /// Environment variable name, or `None` when absent or omitted.
    pub fn env_key(&self) -> Option<&'static str> {
        self.env.filter(|k| *k != OMIT)
    }

    /// Default literal, or `None` when absent or omitted.
    pub fn default_literal(&self) -> Option<&'static str> {
        self.default.filter(|d| *d != OMIT)
    }
}

/// Typed mutable handle to a leaf field.
#[derive(Debug)]
pub enum ValueMut<'a> {
    Str(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    Bool(&'a mut bool),
}

impl ValueMut<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            ValueMut::Str(_) => FieldKind::Str,
            ValueMut::I8(_) => FieldKind::Int(IntWidth::W8),
            ValueMut::I16(_) => FieldKind::Int(IntWidth::W16),
            ValueMut::I32(_) => FieldKind::Int(IntWidth::W32),
            ValueMut::I64(_) => FieldKind::Int(IntWidth::W64),
            ValueMut::Isize(_) => FieldKind::Int(IntWidth::Size),
            ValueMut::U8(_) => FieldKind::Uint(IntWidth::W8),
            ValueMut::U16(_) => FieldKind::Uint(IntWidth::W16),
            ValueMut::U32(_) => FieldKind::Uint(IntWidth::W32),
            ValueMut::U64(_) => FieldKind::Uint(IntWidth::W64),
            ValueMut::Usize(_) => FieldKind::Uint(IntWidth::Size),
            ValueMut::Bool(_) => FieldKind::Bool,
        }
    }
}

/// Slot returned by [`Configurable::field_mut`].
pub enum FieldMut<'a> {
    Leaf(ValueMut<'a>),
    Nested(&'a mut dyn Configurable),
}

/// A configuration structure the resolver can walk.
///
/// `descriptors` and `field_mut` must agree: every declared field must be
/// reachable through `field_mut` with the declared shape and kind. A mismatch
/// is a schema bug and aborts resolution.
pub trait Configurable {
    fn schema_name(&self) -> &'static str;

    fn descriptors(&self) -> &'static [FieldDescriptor];

    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// Primitive types usable as leaf fields.
pub trait Leaf {
    const KIND: FieldKind;

    fn value_mut(&mut self) -> ValueMut<'_>;
}

macro_rules! impl_leaf {
    ($($ty:ty => $variant:ident, $kind:expr;)*) => {
        $(
            impl Leaf for $ty {
                const KIND: FieldKind = $kind;

                fn value_mut(&mut self) -> ValueMut<'_> {
                    ValueMut::$variant(self)
                }
            }
        )*
    };
}

impl_leaf! {
    String => Str, FieldKind::Str;
    i8 => I8, FieldKind::Int(IntWidth::W8);
    i16 => I16, FieldKind::Int(IntWidth::W16);
    i32 => I32, FieldKind::Int(IntWidth::W32);
    i64 => I64, FieldKind::Int(IntWidth::W64);
    isize => Isize, FieldKind::Int(IntWidth::Size);
    u8 => U8, FieldKind::Uint(IntWidth::W8);
    u16 => U16, FieldKind::Uint(IntWidth::W16);
    u32 => U32, FieldKind::Uint(IntWidth::W32);
    u64 => U64, FieldKind::Uint(IntWidth::W64);
    usize => Usize, FieldKind::Uint(IntWidth::Size);
    bool => Bool, FieldKind::Bool;
}

/// Implement [`Configurable`] for a struct from a field listing.
///
/// Each entry is `leaf <field>: <type> { ... }` or `nested <field>: <type> { ... }`.
/// The braces accept `json`, `env` and `default`, each optional. A nested
/// field without a `json` key reads its fields from the parent's JSON object.
#[macro_export]
macro_rules! configurable {
    (
        $name:ident {
            $(
                $role:ident $field:ident : $fty:ty { $( $key:ident : $val:literal ),* $(,)? }
            ),* $(,)?
        }
    ) => {
        impl $crate::Configurable for $name {
            fn schema_name(&self) -> &'static str {
                stringify!($name)
            }

            fn descriptors(&self) -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::configurable!(@descriptor $role $field $fty)
                            $( .$key($val) )*
                    ),*
                ];
                FIELDS
            }

            fn field_mut(&mut self, name: &str) -> Option<$crate::FieldMut<'_>> {
                match name {
                    $(
                        stringify!($field) => {
                            Some($crate::configurable!(@slot $role &mut self.$field))
                        }
                    )*
                    _ => None,
                }
            }
        }
    };
    (@descriptor leaf $field:ident $fty:ty) => {
        $crate::FieldDescriptor::leaf(stringify!($field), <$fty as $crate::Leaf>::KIND)
    };
    (@descriptor nested $field:ident $fty:ty) => {
        $crate::FieldDescriptor::nested(stringify!($field))
    };
    (@slot leaf $place:expr) => {
        $crate::FieldMut::Leaf($crate::Leaf::value_mut($place))
    };
    (@slot nested $place:expr) => {
        $crate::FieldMut::Nested($place)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Inner {
        depth: u8,
    }

    configurable! {
        Inner {
            leaf depth: u8 { default: "3" },
        }
    }

    #[derive(Debug, Default)]
    struct Outer {
        name: String,
        retries: i32,
        inner: Inner,
    }

    configurable! {
        Outer {
            leaf name: String { json: "Name", env: "OUTER_NAME", default: "outer" },
            leaf retries: i32 { json: "-", env: "-" },
            nested inner: Inner { json: "Inner" },
        }
    }

    #[test]
    fn test_macro_builds_descriptor_table() {
        let outer = Outer::default();
        let fields = outer.descriptors();

        assert_eq!(outer.schema_name(), "Outer");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[0].shape, FieldShape::Leaf(FieldKind::Str));
        assert_eq!(fields[0].json_key(), Some("Name"));
        assert_eq!(fields[0].env_key(), Some("OUTER_NAME"));
        assert_eq!(fields[0].default_literal(), Some("outer"));
        assert_eq!(fields[2].shape, FieldShape::Nested);
        assert_eq!(fields[2].json_key(), Some("Inner"));
    }

    #[test]
    fn test_omit_marker_suppresses_source() {
        let outer = Outer::default();
        let retries = &outer.descriptors()[1];

        assert_eq!(retries.shape, FieldShape::Leaf(FieldKind::Int(IntWidth::W32)));
        assert_eq!(retries.json_key(), None);
        assert_eq!(retries.env_key(), None);
        assert_eq!(retries.default_literal(), None);
    }

    #[test]
    fn test_field_mut_returns_typed_slots() {
        let mut outer = Outer::default();

        match outer.field_mut("name") {
            Some(FieldMut::Leaf(ValueMut::Str(s))) => s.push_str("set"),
            _ => panic!("expected string slot"),
        }
        assert_eq!(outer.name, "set");

        match outer.field_mut("inner") {
            Some(FieldMut::Nested(inner)) => assert_eq!(inner.schema_name(), "Inner"),
            _ => panic!("expected nested slot"),
        }

        assert!(outer.field_mut("missing").is_none());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::Str.to_string(), "string");
        assert_eq!(FieldKind::Int(IntWidth::W64).to_string(), "i64");
        assert_eq!(FieldKind::Uint(IntWidth::W32).to_string(), "u32");
        assert_eq!(FieldKind::Uint(IntWidth::Size).to_string(), "usize");
        assert_eq!(FieldKind::Bool.to_string(), "bool");
    }
}
