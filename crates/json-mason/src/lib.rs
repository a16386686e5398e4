//! json-mason — a JSON tree-editor engine.
//!
//! An editable node tree with a bidirectional mapping to canonical JSON
//! values, plus a diagnostic pass that detects key collisions within
//! independent naming scopes. The engine is headless: rendering, clipboard,
//! and event wiring belong to the host, which talks to [`Editor`].
//!
//! # Example
//!
//! ```
//! use json_mason::{Editor, ValueType};
//!
//! let mut editor = Editor::new();
//! let root = editor.root();
//!
//! let port = editor.add_property(root).unwrap();
//! editor.set_key(port, "port").unwrap();
//! editor.set_value_type(port, ValueType::Number).unwrap();
//! editor.set_raw_value(port, "8080").unwrap();
//!
//! let tags = editor.add_array(root).unwrap();
//! editor.set_key(tags, "tags").unwrap();
//! let tag = editor.add_array_value(tags).unwrap();
//! editor.set_raw_value(tag, "web").unwrap();
//!
//! assert_eq!(
//!     editor.current_json(),
//!     "{\n  \"port\": 8080,\n  \"tags\": [\n    \"web\"\n  ]\n}"
//! );
//!
//! editor.import_json(r#"{"replaced": true}"#).unwrap();
//! assert_eq!(editor.current_json(), "{\n  \"replaced\": true\n}");
//! ```

pub mod analyze;
pub mod coerce;
pub mod debounce;
pub mod editor;
pub mod import;
pub mod serialize;
pub mod tree;

pub use analyze::analyze;
pub use coerce::coerce;
pub use debounce::Debouncer;
pub use editor::{Editor, EditorOptions, ImportError};
pub use import::import_into;
pub use serialize::serialize;
pub use tree::{Node, NodeId, NodeKind, Tree, TreeError, ValueType};

// Re-export the value layer so hosts need only one dependency.
pub use json_mason_value::{format_number, parse_json, pretty, stringify, JsonValue, ParseError};
