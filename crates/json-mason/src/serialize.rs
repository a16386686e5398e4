//! Tree to JSON value conversion.
//!
//! # Overview
//!
//! Object scopes emit their members grouped by node category: value leaves
//! first, then nested objects, then arrays. Insertion order is preserved
//! only *within* each category, not across categories; this grouping is
//! part of the observable contract and must not be "corrected" to strict
//! insertion order.
//!
//! Two more rules shape object scopes:
//!
//! - Duplicate keys assign into the same slot, later writes winning while
//!   the key keeps its first position (plain object-assignment semantics).
//!   The duplicate-key analyzer warns about this; serialization never does.
//! - The *unnamed-property escape hatch*: one value leaf with an empty
//!   (trimmed) key flips the whole scope from an object to an array. The
//!   unnamed leaves contribute bare scalars in insertion order, and every
//!   named entry follows them wrapped as a single-key object `{key: value}`.
//!
//! Array scopes emit their items in order; a named item wraps its value as
//! `{key: value}`, an unnamed one pushes the value bare.

use indexmap::IndexMap;

use json_mason_value::{parse_json, JsonValue};

use crate::coerce::coerce;
use crate::tree::{NodeId, NodeKind, Tree, ValueType};

/// Serialize the subtree rooted at `node`.
///
/// Containers yield their scope's JSON; a value leaf yields its coerced
/// scalar. Unknown ids yield `null`, keeping the function total.
pub fn serialize(tree: &Tree, node: NodeId) -> JsonValue {
    match tree.node(node) {
        Some(n) => match &n.kind {
            NodeKind::Value { ty, raw } => leaf_value(*ty, raw),
            NodeKind::Object { children } => object_scope(tree, children),
            NodeKind::Array { items } => array_scope(tree, items),
        },
        None => JsonValue::Null,
    }
}

/// A leaf's JSON value. Raw-JSON leaves (declared type `object`) parse
/// their cached text, falling back to `{}` when it does not parse; the
/// original text is silently lost in that case.
fn leaf_value(ty: ValueType, raw: &str) -> JsonValue {
    match ty {
        ValueType::Object => {
            parse_json(raw).unwrap_or_else(|_| JsonValue::Object(IndexMap::new()))
        }
        _ => coerce(raw, ty),
    }
}

fn object_scope(tree: &Tree, children: &[NodeId]) -> JsonValue {
    let mut named: IndexMap<String, JsonValue> = IndexMap::new();
    let mut loose: Vec<JsonValue> = Vec::new();

    // Category pass 1: value leaves. Unnamed ones arm the escape hatch.
    for &id in children {
        if let Some(node) = tree.node(id) {
            if let NodeKind::Value { ty, raw } = &node.kind {
                let key = node.trimmed_key();
                if key.is_empty() {
                    loose.push(leaf_value(*ty, raw));
                } else {
                    named.insert(key.to_string(), leaf_value(*ty, raw));
                }
            }
        }
    }

    // Category pass 2: nested objects. Unnamed ones are dropped.
    for &id in children {
        if let Some(node) = tree.node(id) {
            if let NodeKind::Object { children: inner } = &node.kind {
                if node.is_named() {
                    named.insert(node.trimmed_key().to_string(), object_scope(tree, inner));
                }
            }
        }
    }

    // Category pass 3: arrays. Unnamed ones are dropped.
    for &id in children {
        if let Some(node) = tree.node(id) {
            if let NodeKind::Array { items } = &node.kind {
                if node.is_named() {
                    named.insert(node.trimmed_key().to_string(), array_scope(tree, items));
                }
            }
        }
    }

    if loose.is_empty() {
        JsonValue::Object(named)
    } else {
        let mut seq = loose;
        for (key, value) in named {
            seq.push(wrap(key, value));
        }
        JsonValue::Array(seq)
    }
}

fn array_scope(tree: &Tree, items: &[NodeId]) -> JsonValue {
    let mut seq = Vec::with_capacity(items.len());
    for &id in items {
        if let Some(node) = tree.node(id) {
            let value = match &node.kind {
                NodeKind::Value { ty, raw } => leaf_value(*ty, raw),
                NodeKind::Object { children } => object_scope(tree, children),
                NodeKind::Array { items: inner } => array_scope(tree, inner),
            };
            if node.is_named() {
                seq.push(wrap(node.trimmed_key().to_string(), value));
            } else {
                seq.push(value);
            }
        }
    }
    JsonValue::Array(seq)
}

fn wrap(key: String, value: JsonValue) -> JsonValue {
    JsonValue::Object(IndexMap::from_iter([(key, value)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeError;
    use serde_json::json;

    fn jv(v: serde_json::Value) -> JsonValue {
        JsonValue::from(v)
    }

    fn leaf(
        tree: &mut Tree,
        scope: NodeId,
        key: &str,
        ty: ValueType,
        raw: &str,
    ) -> Result<NodeId, TreeError> {
        let id = if matches!(tree.node(scope).map(|n| &n.kind), Some(NodeKind::Array { .. })) {
            tree.add_array_value(scope)?
        } else {
            tree.add_property(scope)?
        };
        tree.set_key(id, key)?;
        tree.set_value_type(id, ty)?;
        tree.set_raw_value(id, raw)?;
        Ok(id)
    }

    #[test]
    fn empty_root_is_an_empty_object() {
        let tree = Tree::new();
        assert_eq!(serialize(&tree, tree.root()), jv(json!({})));
    }

    #[test]
    fn properties_coerce_by_declared_type() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "s", ValueType::String, "hi").unwrap();
        leaf(&mut tree, root, "n", ValueType::Number, "2.5").unwrap();
        leaf(&mut tree, root, "b", ValueType::Boolean, "TRUE").unwrap();
        leaf(&mut tree, root, "z", ValueType::Null, "ignored").unwrap();
        assert_eq!(
            serialize(&tree, root),
            jv(json!({"s": "hi", "n": 2.5, "b": true, "z": null}))
        );
    }

    #[test]
    fn categories_group_before_insertion_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let arr = tree.add_array(root).unwrap();
        tree.set_key(arr, "list").unwrap();
        let obj = tree.add_nested_object(root).unwrap();
        tree.set_key(obj, "nested").unwrap();
        leaf(&mut tree, root, "plain", ValueType::String, "v").unwrap();

        // insertion order was array, object, property; output groups
        // properties first, then objects, then arrays
        let members = serialize(&tree, root);
        let members = members.as_object().unwrap();
        let keys: Vec<&str> = members.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["plain", "nested", "list"]);
    }

    #[test]
    fn duplicate_keys_are_last_write_wins_at_first_position() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "x", ValueType::Number, "1").unwrap();
        leaf(&mut tree, root, "mid", ValueType::String, "keep").unwrap();
        leaf(&mut tree, root, "x", ValueType::Number, "2").unwrap();

        let out = serialize(&tree, root);
        assert_eq!(out, jv(json!({"x": 2, "mid": "keep"})));
        let members = out.as_object().unwrap();
        assert_eq!(members.keys().next().map(|k| k.as_str()), Some("x"));
    }

    #[test]
    fn cross_category_duplicates_resolve_by_category_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        // the array wins over the property despite earlier insertion,
        // because arrays are assigned in the last category pass
        let arr = tree.add_array(root).unwrap();
        tree.set_key(arr, "x").unwrap();
        leaf(&mut tree, root, "x", ValueType::Number, "1").unwrap();
        assert_eq!(serialize(&tree, root), jv(json!({"x": []})));
    }

    #[test]
    fn unnamed_property_flips_the_scope_to_an_array() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "", ValueType::Number, "5").unwrap();
        leaf(&mut tree, root, "a", ValueType::Number, "1").unwrap();
        assert_eq!(serialize(&tree, root), jv(json!([5, {"a": 1}])));
    }

    #[test]
    fn escape_hatch_wraps_named_containers_too() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "", ValueType::String, "bare").unwrap();
        let obj = tree.add_nested_object(root).unwrap();
        tree.set_key(obj, "o").unwrap();
        leaf(&mut tree, obj, "k", ValueType::Number, "7").unwrap();
        let arr = tree.add_array(root).unwrap();
        tree.set_key(arr, "l").unwrap();
        assert_eq!(
            serialize(&tree, root),
            jv(json!(["bare", {"o": {"k": 7}}, {"l": []}]))
        );
    }

    #[test]
    fn whitespace_only_keys_count_as_unnamed() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "   ", ValueType::Number, "9").unwrap();
        assert_eq!(serialize(&tree, root), jv(json!([9])));
    }

    #[test]
    fn keys_are_trimmed_in_the_output() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "  padded  ", ValueType::String, "v").unwrap();
        assert_eq!(serialize(&tree, root), jv(json!({"padded": "v"})));
    }

    #[test]
    fn unnamed_containers_in_an_object_scope_are_dropped() {
        let mut tree = Tree::new();
        let root = tree.root();
        let obj = tree.add_nested_object(root).unwrap();
        leaf(&mut tree, obj, "hidden", ValueType::String, "x").unwrap();
        tree.add_array(root).unwrap();
        leaf(&mut tree, root, "kept", ValueType::String, "y").unwrap();
        assert_eq!(serialize(&tree, root), jv(json!({"kept": "y"})));
    }

    #[test]
    fn array_items_wrap_only_when_named() {
        let mut tree = Tree::new();
        let root = tree.root();
        let arr = tree.add_array(root).unwrap();
        tree.set_key(arr, "items").unwrap();
        leaf(&mut tree, arr, "", ValueType::Number, "3").unwrap();
        leaf(&mut tree, arr, "n", ValueType::Number, "4").unwrap();
        let obj = tree.add_array_object(arr).unwrap();
        tree.set_key(obj, "named").unwrap();
        leaf(&mut tree, obj, "inner", ValueType::Boolean, "true").unwrap();
        let bare_obj = tree.add_array_object(arr).unwrap();
        leaf(&mut tree, bare_obj, "a", ValueType::Number, "1").unwrap();
        let nested = tree.add_array_nested_array(arr).unwrap();
        tree.set_key(nested, "deep").unwrap();
        leaf(&mut tree, nested, "", ValueType::String, "s").unwrap();

        assert_eq!(
            serialize(&tree, root),
            jv(json!({
                "items": [
                    3,
                    {"n": 4},
                    {"named": {"inner": true}},
                    {"a": 1},
                    {"deep": ["s"]}
                ]
            }))
        );
    }

    #[test]
    fn raw_json_leaves_parse_or_default_to_an_empty_object() {
        let mut tree = Tree::new();
        let root = tree.root();
        let arr = tree.add_array(root).unwrap();
        tree.set_key(arr, "raw").unwrap();
        leaf(&mut tree, arr, "", ValueType::Object, r#"{"deep": [1, 2]}"#).unwrap();
        leaf(&mut tree, arr, "", ValueType::Object, "not json").unwrap();
        leaf(&mut tree, arr, "blob", ValueType::Object, "[true]").unwrap();
        assert_eq!(
            serialize(&tree, root),
            jv(json!({"raw": [{"deep": [1, 2]}, {}, {"blob": [true]}]}))
        );
    }

    #[test]
    fn raw_json_leaves_resolve_in_object_scopes_too() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "cfg", ValueType::Object, r#"{"a": 1}"#).unwrap();
        assert_eq!(serialize(&tree, root), jv(json!({"cfg": {"a": 1}})));
    }

    #[test]
    fn serializing_a_leaf_yields_its_scalar() {
        let mut tree = Tree::new();
        let root = tree.root();
        let id = leaf(&mut tree, root, "k", ValueType::Number, "8").unwrap();
        assert_eq!(serialize(&tree, id), JsonValue::Number(8.0));
    }

    #[test]
    fn unknown_ids_serialize_to_null() {
        let mut tree = Tree::new();
        let root = tree.root();
        let id = tree.add_property(root).unwrap();
        tree.remove(id).unwrap();
        assert_eq!(serialize(&tree, id), JsonValue::Null);
    }
}
