//! JSON value type and text codecs for the json-mason editor engine.
//!
//! The engine's numbers are always IEEE-754 doubles and may hold NaN
//! (unparseable numeric input coerces to NaN instead of failing), which
//! `serde_json::Value` cannot represent. [`JsonValue`] is the closed tagged
//! union the engine traffics in; this crate also owns the boundary codecs:
//! [`parse_json`] for import text and [`pretty`]/[`stringify`] for export
//! text.
//!
//! # Example
//!
//! ```
//! use json_mason_value::{parse_json, pretty, stringify};
//!
//! let value = parse_json(r#"{"name": "Ada", "tags": [1, 2]}"#).unwrap();
//! assert_eq!(stringify(&value), r#"{"name":"Ada","tags":[1,2]}"#);
//! assert_eq!(
//!     pretty(&value),
//!     "{\n  \"name\": \"Ada\",\n  \"tags\": [\n    1,\n    2\n  ]\n}"
//! );
//! ```

pub mod parse;
pub mod print;
pub mod value;

pub use parse::{parse_json, ParseError};
pub use print::{format_number, pretty, stringify};
pub use value::JsonValue;
