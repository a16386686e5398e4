//! The engine facade: one object owning the tree, the JSON preview, the
//! duplicate-key diagnostics, and their scheduling.
//!
//! # Overview
//!
//! Every mutation re-serializes the root and refreshes the cached preview
//! text. Duplicate-key analysis is coalesced behind a trailing-delay timer
//! so bursts of edits cost one pass, with one exception: key edits
//! re-analyze immediately. Hosts drive the timer by calling
//! [`Editor::poll`] (or [`Editor::poll_at`] with their own clock) from
//! their event loop.
//!
//! The import/export boundary is [`Editor::current_json`] and
//! [`Editor::import_json`]; the engine performs no clipboard, file, or
//! network access itself.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace};

use json_mason_value::{parse_json, pretty, JsonValue, ParseError};

use crate::analyze::analyze;
use crate::debounce::Debouncer;
use crate::import::import_into;
use crate::serialize::serialize;
use crate::tree::{NodeId, Tree, TreeError, ValueType};

/// Tunables for an [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Trailing delay for coalesced duplicate-key analysis.
    pub analysis_delay: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            analysis_delay: Duration::from_millis(300),
        }
    }
}

/// Returned by [`Editor::import_json`]. On any error the tree, preview and
/// diagnostics are exactly as they were before the call.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The text did not parse as JSON.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The rebuild hit an invalid tree reference. Not reachable through
    /// [`Editor::import_json`], which always targets the live root.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// The tree-editor engine.
///
/// # Example
///
/// ```
/// use json_mason::Editor;
///
/// let mut editor = Editor::new();
/// let root = editor.root();
/// let name = editor.add_property(root).unwrap();
/// editor.set_key(name, "name").unwrap();
/// editor.set_raw_value(name, "Ada").unwrap();
/// assert_eq!(editor.current_json(), "{\n  \"name\": \"Ada\"\n}");
/// ```
#[derive(Debug)]
pub struct Editor {
    tree: Tree,
    preview: String,
    duplicates: HashSet<NodeId>,
    debounce: Debouncer,
}

impl Editor {
    pub fn new() -> Self {
        Editor::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        let mut editor = Editor {
            tree: Tree::new(),
            preview: String::new(),
            duplicates: HashSet::new(),
            debounce: Debouncer::new(options.analysis_delay),
        };
        editor.refresh_preview();
        editor
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The cached pretty-printed JSON text for the whole document.
    pub fn current_json(&self) -> &str {
        &self.preview
    }

    /// A fresh serialization of the whole document.
    pub fn current_value(&self) -> JsonValue {
        serialize(&self.tree, self.tree.root())
    }

    /// Nodes flagged by the most recent duplicate-key pass.
    pub fn duplicate_keys(&self) -> &HashSet<NodeId> {
        &self.duplicates
    }

    pub fn is_duplicate(&self, id: NodeId) -> bool {
        self.duplicates.contains(&id)
    }

    /// Whether a coalesced analysis pass is still waiting on its deadline.
    pub fn analysis_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    // ── Structural edits ─────────────────────────────────────────────────

    pub fn add_property(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_property(scope)?;
        self.after_edit();
        Ok(id)
    }

    pub fn add_nested_object(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_nested_object(scope)?;
        self.after_edit();
        Ok(id)
    }

    pub fn add_array(&mut self, scope: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_array(scope)?;
        self.after_edit();
        Ok(id)
    }

    pub fn add_array_value(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_array_value(array)?;
        self.after_edit();
        Ok(id)
    }

    pub fn add_array_object(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_array_object(array)?;
        self.after_edit();
        Ok(id)
    }

    pub fn add_array_nested_array(&mut self, array: NodeId) -> Result<NodeId, TreeError> {
        let id = self.tree.add_array_nested_array(array)?;
        self.after_edit();
        Ok(id)
    }

    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.tree.remove(node)?;
        self.after_edit();
        Ok(())
    }

    /// Discard the whole document: every root child is removed and the
    /// diagnostics are reset.
    pub fn clear(&mut self) {
        self.tree.clear_root();
        self.duplicates.clear();
        self.after_edit();
    }

    // ── Field edits ──────────────────────────────────────────────────────

    /// Edit a node's key text. Unlike every other edit this re-analyzes
    /// immediately, dropping any pending coalesced pass.
    pub fn set_key(&mut self, node: NodeId, key: &str) -> Result<(), TreeError> {
        self.tree.set_key(node, key)?;
        self.refresh_preview();
        self.debounce.cancel();
        self.run_analysis();
        Ok(())
    }

    pub fn set_value_type(&mut self, node: NodeId, ty: ValueType) -> Result<(), TreeError> {
        self.tree.set_value_type(node, ty)?;
        self.after_edit();
        Ok(())
    }

    pub fn set_raw_value(&mut self, node: NodeId, raw: &str) -> Result<(), TreeError> {
        self.tree.set_raw_value(node, raw)?;
        self.after_edit();
        Ok(())
    }

    // ── Import / export boundary ─────────────────────────────────────────

    /// Replace the document with the parse of `text`.
    ///
    /// Parsing happens before any mutation: malformed input leaves the
    /// tree, preview and diagnostics untouched. On success the root's
    /// children are discarded wholesale and rebuilt, stale flags are
    /// cleared, and a fresh analysis pass is scheduled.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let value = parse_json(text)?;
        let root = self.tree.root();
        self.tree.clear_root();
        import_into(&mut self.tree, root, &value)?;
        self.duplicates.clear();
        self.refresh_preview();
        self.debounce.schedule();
        debug!(nodes = self.tree.node_count(), "imported document");
        Ok(())
    }

    // ── Scheduling ───────────────────────────────────────────────────────

    /// Drive the coalesced analysis timer with an explicit clock; returns
    /// whether a pass ran.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.debounce.fire_at(now) {
            self.run_analysis();
            true
        } else {
            false
        }
    }

    /// [`Editor::poll_at`] against the real clock.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn after_edit(&mut self) {
        self.refresh_preview();
        self.debounce.schedule();
        trace!(nodes = self.tree.node_count(), "tree edited");
    }

    fn refresh_preview(&mut self) {
        self.preview = pretty(&serialize(&self.tree, self.tree.root()));
    }

    fn run_analysis(&mut self) {
        self.duplicates = analyze(&self.tree);
        debug!(flagged = self.duplicates.len(), "duplicate key analysis");
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}
