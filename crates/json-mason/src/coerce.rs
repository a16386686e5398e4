//! Raw text to JSON scalar coercion.

use json_mason_value::JsonValue;

use crate::tree::ValueType;

/// Convert a leaf's raw text plus its declared type into a JSON scalar.
///
/// Total over every input:
///
/// - `String`: the text verbatim.
/// - `Number`: surrounding whitespace is trimmed first; empty (or
///   whitespace-only) text is `0`; anything else is parsed as a base-10
///   double, and unparseable text yields NaN rather than an error. The NaN
///   survives into exported text as the bare literal `NaN`.
/// - `Boolean`: case-insensitive equality with `"true"`; `"yes"`, `""` and
///   `"False"` all yield `false`.
/// - `Null`: always `null`, the text is ignored.
/// - `Object`: raw-JSON leaves are resolved by the serializer before
///   coercion is consulted; a leaf that still reaches this function comes
///   back as plain text.
pub fn coerce(raw: &str, ty: ValueType) -> JsonValue {
    match ty {
        ValueType::String | ValueType::Object => JsonValue::String(raw.to_string()),
        ValueType::Number => {
            let raw = raw.trim();
            if raw.is_empty() {
                JsonValue::Number(0.0)
            } else {
                JsonValue::Number(raw.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        ValueType::Boolean => JsonValue::Bool(raw.eq_ignore_ascii_case("true")),
        ValueType::Null => JsonValue::Null,
    }
}
