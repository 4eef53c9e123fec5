//! Field traversal over [`Configurable`] structures.
//!
//! The walker visits fields in declared order, descending into nested
//! structures at any depth, and hands every leaf to a [`Visitor`] together
//! with the JSON object that is in scope for it.

use crate::schema::{Configurable, FieldDescriptor, FieldMut, FieldShape, ValueMut};
use serde_json::{Map, Value};
use std::fmt::Display;

/// A leaf field reached by the walker.
pub struct LeafField<'s, 'd> {
    /// Dotted path from the root, e.g. `beego.http_port`.
    pub path: String,
    pub descriptor: &'static FieldDescriptor,
    pub slot: ValueMut<'s>,
    /// JSON object for the enclosing scope, if any.
    pub document: Option<&'d Map<String, Value>>,
}

pub trait Visitor<'d> {
    fn leaf(&mut self, field: LeafField<'_, 'd>);

    /// A nested field's JSON key holds something other than an object.
    fn malformed_scope(&mut self, _path: &str, _key: &str, _value: &'d Value) {}
}

/// Walk `target`, calling `visitor` for every leaf.
///
/// # Panics
///
/// Panics when the schema's descriptor table and accessor disagree. That is a
/// programming error in the schema, not bad input.
pub fn walk<'d, V: Visitor<'d>>(
    target: &mut dyn Configurable,
    prefix: &str,
    document: Option<&'d Map<String, Value>>,
    visitor: &mut V,
) {
    let schema = target.schema_name();

    for descriptor in target.descriptors() {
        let path = if prefix.is_empty() {
            descriptor.name.to_string()
        } else {
            format!("{}.{}", prefix, descriptor.name)
        };

        let Some(slot) = target.field_mut(descriptor.name) else {
            schema_violation(schema, descriptor.name, "no accessor for declared field");
        };

        match (descriptor.shape, slot) {
            (FieldShape::Nested, FieldMut::Nested(inner)) => {
                let scope = match descriptor.json_key() {
                    // No key: the nested fields share the parent's object.
                    None => document,
                    Some(key) => match document.and_then(|doc| doc.get(key)) {
                        Some(Value::Object(map)) => Some(map),
                        Some(Value::Null) | None => None,
                        Some(other) => {
                            visitor.malformed_scope(&path, key, other);
                            None
                        }
                    },
                };
                walk(inner, &path, scope, visitor);
            }
            (FieldShape::Leaf(kind), FieldMut::Leaf(slot)) => {
                if slot.kind() != kind {
                    schema_violation(
                        schema,
                        descriptor.name,
                        format!("declared {} but accessor yields {}", kind, slot.kind()),
                    );
                }
                visitor.leaf(LeafField {
                    path,
                    descriptor,
                    slot,
                    document,
                });
            }
            (FieldShape::Leaf(_), FieldMut::Nested(_)) => {
                schema_violation(
                    schema,
                    descriptor.name,
                    "declared as leaf but accessor yields a nested structure",
                );
            }
            (FieldShape::Nested, FieldMut::Leaf(_)) => {
                schema_violation(
                    schema,
                    descriptor.name,
                    "declared as nested but accessor yields a leaf",
                );
            }
        }
    }
}

fn schema_violation(schema: &str, field: &str, reason: impl Display) -> ! {
    tracing::error!(schema, field, %reason, "configuration schema is broken");
    panic!("[config] {} field {} cannot be set: {}", schema, field, reason);
}
