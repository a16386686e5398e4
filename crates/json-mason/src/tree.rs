//! The editable node tree.
//!
//! # Overview
//!
//! Nodes live in an arena (`HashMap` keyed by [`NodeId`]) owned by [`Tree`];
//! containers hold their children as ordered id lists, and every node
//! records its owning container, so scope lookup never walks the structure.
//! Ids are stable for the life of the node and never reused within a tree.
//!
//! Three node kinds cover the whole model:
//!
//! | kind | in an object-scope | in an array-scope |
//! |---|---|---|
//! | [`NodeKind::Value`] | property | array value (named or bare) |
//! | [`NodeKind::Object`] | nested object | array-object item |
//! | [`NodeKind::Array`] | named array | nested array item |
//!
//! Edit operations are total given a valid reference: they mutate and
//! return `Ok`, or reject a stale id / wrong-kind scope with [`TreeError`]
//! and leave the tree untouched. They never panic.

use std::collections::HashMap;

use thiserror::Error;

/// Stable identifier of a node within a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Scalar type tag carried by value leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    String,
    Number,
    Boolean,
    Null,
    /// Raw-JSON leaf: the node's raw text caches a literal JSON blob which
    /// the serializer parses (or replaces with `{}`) at emission time.
    Object,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::Object => "object",
        }
    }

    /// Map a type tag to its variant. Unrecognized tags fall back to
    /// `String`, so a leaf always coerces to something.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => ValueType::String,
            "number" => ValueType::Number,
            "boolean" => ValueType::Boolean,
            "null" => ValueType::Null,
            "object" => ValueType::Object,
            _ => ValueType::String,
        }
    }
}

/// One editable unit of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Key text exactly as typed. A node counts as *named* only when the
    /// trimmed text is non-empty; the trimmed text is what serialization
    /// and diagnostics use.
    pub key: String,
    /// Owning container; `None` only for the root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A leaf holding raw text and a declared scalar type.
    Value { ty: ValueType, raw: String },
    /// An object-scope with ordered children.
    Object { children: Vec<NodeId> },
    /// An array-scope with ordered items.
    Array { items: Vec<NodeId> },
}

impl Node {
    /// The trimmed key text used for naming and duplicate detection.
    pub fn trimmed_key(&self) -> &str {
        self.key.trim()
    }

    pub fn is_named(&self) -> bool {
        !self.trimmed_key().is_empty()
    }

    pub fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Value { .. })
    }
}

/// Rejection for an invalid node reference; valid references never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Unknown or already-removed node id.
    #[error("NOT_FOUND")]
    NotFound,
    /// The node exists but has the wrong kind for the operation.
    #[error("WRONG_TYPE")]
    WrongType,
}

/// The editable node tree: an arena of [`Node`]s addressed by stable ids,
/// rooted at an object-scope.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next: u64,
}

impl Tree {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                key: String::new(),
                parent: None,
                kind: NodeKind::Object {
                    children: Vec::new(),
                },
            },
        );
        Tree {
            nodes,
            root,
            next: 1,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Total number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ordered children of a container scope.
    pub fn children(&self, scope: NodeId) -> Result<&[NodeId], TreeError> {
        match &self.nodes.get(&scope).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Object { children } => Ok(children),
            NodeKind::Array { items } => Ok(items),
            NodeKind::Value { .. } => Err(TreeError::WrongType),
        }
    }

    // ── Add operations ───────────────────────────────────────────────────
    //
    // Every add appends one default-initialized node (empty key, type
    // `string`, empty value; containers start empty) to the end of the
    // target scope, so insertion order equals call order.

    /// Append a default property to an object-scope.
    pub fn add_property(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        self.check_object_scope(scope)?;
        Ok(self.push_node(scope, String::new(), default_leaf()))
    }

    /// Append an empty nested object to an object-scope.
    pub fn add_nested_object(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        self.check_object_scope(scope)?;
        Ok(self.push_node(scope, String::new(), empty_object()))
    }

    /// Append an empty array to an object-scope.
    pub fn add_array(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        self.check_object_scope(scope)?;
        Ok(self.push_node(scope, String::new(), empty_array()))
    }

    /// Append a default value item to an array-scope.
    pub fn add_array_value(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        self.check_array_scope(array)?;
        Ok(self.push_node(array, String::new(), default_leaf()))
    }

    /// Append an empty object item to an array-scope.
    pub fn add_array_object(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        self.check_array_scope(array)?;
        Ok(self.push_node(array, String::new(), empty_object()))
    }

    /// Append an empty nested array item to an array-scope.
    pub fn add_array_nested_array(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        self.check_array_scope(array)?;
        Ok(self.push_node(array, String::new(), empty_array()))
    }

    /// Append a keyed node of any kind to a container scope. The importer's
    /// entry point; the public add operations cover interactive edits.
    pub(crate) fn append(
        &mut self,
        scope: NodeId,
        key: &str,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        match &self.nodes.get(&scope).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Value { .. } => Err(TreeError::WrongType),
            _ => Ok(self.push_node(scope, key.to_string(), kind)),
        }
    }

    // ── Field edits ──────────────────────────────────────────────────────

    pub fn set_key(&mut self, id: NodeId, key: &str) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::NotFound)?;
        node.key = key.to_string();
        Ok(())
    }

    /// Change a value leaf's declared type. Containers are rejected.
    pub fn set_value_type(&mut self, id: NodeId, ty: ValueType) -> Result<(), TreeError> {
        match &mut self.nodes.get_mut(&id).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Value { ty: slot, .. } => {
                *slot = ty;
                Ok(())
            }
            _ => Err(TreeError::WrongType),
        }
    }

    /// Change a value leaf's raw text. Containers are rejected.
    pub fn set_raw_value(&mut self, id: NodeId, raw: &str) -> Result<(), TreeError> {
        match &mut self.nodes.get_mut(&id).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Value { raw: slot, .. } => {
                *slot = raw.to_string();
                Ok(())
            }
            _ => Err(TreeError::WrongType),
        }
    }

    // ── Removal ──────────────────────────────────────────────────────────

    /// Detach a node from its scope and drop its entire subtree. The root
    /// cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::NotFound);
        }
        if id == self.root {
            return Err(TreeError::WrongType);
        }
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            self.detach(parent, id);
        }
        self.drop_subtree(id);
        Ok(())
    }

    /// Drop every root child, cascading. Infallible: the root is always a
    /// live container. Import and the clear operation use this for full
    /// document replacement.
    pub fn clear_root(&mut self) {
        let ids = match self.nodes.get_mut(&self.root).map(|n| &mut n.kind) {
            Some(NodeKind::Object { children }) => std::mem::take(children),
            _ => Vec::new(),
        };
        for id in ids {
            self.drop_subtree(id);
        }
    }

    /// Drop every child of a container scope, cascading. The scope itself
    /// stays in place.
    pub fn clear_children(&mut self, scope: NodeId) -> Result<(), TreeError> {
        let ids = self.children(scope)?.to_vec();
        if let Some(node) = self.nodes.get_mut(&scope) {
            match &mut node.kind {
                NodeKind::Object { children } => children.clear(),
                NodeKind::Array { items } => items.clear(),
                NodeKind::Value { .. } => {}
            }
        }
        for id in ids {
            self.drop_subtree(id);
        }
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn check_object_scope(&self, scope: NodeId) -> Result<(), TreeError> {
        match self.nodes.get(&scope).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Object { .. } => Ok(()),
            _ => Err(TreeError::WrongType),
        }
    }

    fn check_array_scope(&self, scope: NodeId) -> Result<(), TreeError> {
        match self.nodes.get(&scope).ok_or(TreeError::NotFound)?.kind {
            NodeKind::Array { .. } => Ok(()),
            _ => Err(TreeError::WrongType),
        }
    }

    /// Allocate a node and push it onto the end of `scope`'s child list.
    /// Callers have already validated the scope.
    fn push_node(&mut self, scope: NodeId, key: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(
            id,
            Node {
                key,
                parent: Some(scope),
                kind,
            },
        );
        if let Some(parent) = self.nodes.get_mut(&scope) {
            match &mut parent.kind {
                NodeKind::Object { children } => children.push(id),
                NodeKind::Array { items } => items.push(id),
                NodeKind::Value { .. } => {}
            }
        }
        id
    }

    fn detach(&mut self, scope: NodeId, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&scope) {
            match &mut node.kind {
                NodeKind::Object { children } => children.retain(|c| *c != id),
                NodeKind::Array { items } => items.retain(|c| *c != id),
                NodeKind::Value { .. } => {}
            }
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                match node.kind {
                    NodeKind::Object { children } => stack.extend(children),
                    NodeKind::Array { items } => stack.extend(items),
                    NodeKind::Value { .. } => {}
                }
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

fn default_leaf() -> NodeKind {
    NodeKind::Value {
        ty: ValueType::String,
        raw: String::new(),
    }
}

fn empty_object() -> NodeKind {
    NodeKind::Object {
        children: Vec::new(),
    }
}

fn empty_array() -> NodeKind {
    NodeKind::Array { items: Vec::new() }
}
