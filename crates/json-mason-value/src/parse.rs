//! Boundary JSON parsing.

use thiserror::Error;

use crate::value::JsonValue;

/// Returned when import text is not valid JSON.
///
/// Carries the underlying parser's message (with line and column), which is
/// the text shown to the user at the import boundary.
#[derive(Debug, Error)]
#[error("invalid JSON: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Parse UTF-8 text as a single JSON value.
///
/// Any top-level value of the standard grammar is accepted: object, array,
/// string, number, boolean, or null. Member order is preserved.
///
/// # Example
///
/// ```
/// use json_mason_value::{parse_json, JsonValue};
///
/// assert_eq!(parse_json("true").unwrap(), JsonValue::Bool(true));
/// assert!(parse_json("{oops").is_err());
/// ```
pub fn parse_json(text: &str) -> Result<JsonValue, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(JsonValue::from(value))
}
