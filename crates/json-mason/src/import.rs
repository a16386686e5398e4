//! JSON value to tree population: the serializer's lossy inverse.
//!
//! Object members become keyed nodes classified by the value's kind; array
//! elements land unnamed, except that an element which is an object with
//! exactly one member is read back as a *named* entry (undoing the
//! `{key: value}` wrapping the serializer applies to named array items).

use json_mason_value::{format_number, JsonValue};

use crate::tree::{NodeId, NodeKind, Tree, TreeError, ValueType};

/// Populate `scope` (a container, normally freshly cleared) from a parsed
/// JSON value.
///
/// A top-level object spreads its members into the scope; a top-level array
/// spreads its elements; a bare scalar becomes a single unnamed value leaf,
/// which the escape hatch will render back as `[scalar]`.
pub fn import_into(tree: &mut Tree, scope: NodeId, value: &JsonValue) -> Result<(), TreeError> {
    match value {
        JsonValue::Object(members) => {
            for (key, member) in members {
                import_member(tree, scope, key, member)?;
            }
            Ok(())
        }
        JsonValue::Array(items) => {
            for item in items {
                import_element(tree, scope, item)?;
            }
            Ok(())
        }
        other => import_element(tree, scope, other),
    }
}

/// Import one keyed member: `null` becomes a null leaf with empty text,
/// scalars become leaves of the matching type with the value's text form,
/// and containers recurse.
fn import_member(
    tree: &mut Tree,
    scope: NodeId,
    key: &str,
    value: &JsonValue,
) -> Result<(), TreeError> {
    match value {
        JsonValue::Null => {
            tree.append(scope, key, leaf(ValueType::Null, String::new()))?;
        }
        JsonValue::Bool(b) => {
            tree.append(scope, key, leaf(ValueType::Boolean, b.to_string()))?;
        }
        JsonValue::Number(n) => {
            tree.append(scope, key, leaf(ValueType::Number, format_number(*n)))?;
        }
        JsonValue::String(s) => {
            tree.append(scope, key, leaf(ValueType::String, s.clone()))?;
        }
        JsonValue::Object(members) => {
            let nested = tree.append(
                scope,
                key,
                NodeKind::Object {
                    children: Vec::new(),
                },
            )?;
            for (k, v) in members {
                import_member(tree, nested, k, v)?;
            }
        }
        JsonValue::Array(items) => {
            let array = tree.append(scope, key, NodeKind::Array { items: Vec::new() })?;
            for item in items {
                import_element(tree, array, item)?;
            }
        }
    }
    Ok(())
}

/// Import one array element. A single-member object is recovered as a named
/// entry; everything else is an unnamed member import.
fn import_element(tree: &mut Tree, scope: NodeId, value: &JsonValue) -> Result<(), TreeError> {
    match value {
        JsonValue::Object(members) if members.len() == 1 => match members.first() {
            Some((key, inner)) => import_member(tree, scope, key, inner),
            None => Ok(()),
        },
        other => import_member(tree, scope, "", other),
    }
}

fn leaf(ty: ValueType, raw: String) -> NodeKind {
    NodeKind::Value { ty, raw }
}
