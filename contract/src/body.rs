use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a recorded response body is compared against the provider's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMatch {
    /// Byte-for-byte equality.
    Exact,
    /// Same JSON structure and value types; values themselves may differ.
    Shape,
}

impl BodyMatch {
    pub fn is_exact(&self) -> bool {
        *self == BodyMatch::Exact
    }
}

impl Default for BodyMatch {
    fn default() -> Self {
        BodyMatch::Exact
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// JSON path of the first diverging node, `$` being the root.
    pub path: String,
    pub expected: String,
    pub actual: String,
}

/// Checks that `actual` has the structure of `expected`.
///
/// Objects must contain every expected key (extra keys are fine). Every element of an actual array
/// must have the shape of the first expected element; an empty expected array accepts any array.
pub fn match_shape(expected: &Value, actual: &Value) -> Result<(), ShapeMismatch> {
    match_shape_at("$", expected, actual)
}

fn match_shape_at(path: &str, expected: &Value, actual: &Value) -> Result<(), ShapeMismatch> {
    match (expected, actual) {
        (Value::Object(expected_fields), Value::Object(actual_fields)) => {
            for (key, expected_value) in expected_fields {
                let field_path = format!("{}.{}", path, key);
                match actual_fields.get(key) {
                    Some(actual_value) => match_shape_at(&field_path, expected_value, actual_value)?,
                    None => {
                        return Err(ShapeMismatch {
                            path: field_path,
                            expected: String::from(kind(expected_value)),
                            actual: String::from("missing"),
                        })
                    }
                }
            }

            Ok(())
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            if let Some(template) = expected_items.first() {
                for (index, item) in actual_items.iter().enumerate() {
                    match_shape_at(&format!("{}[{}]", path, index), template, item)?;
                }
            }

            Ok(())
        }
        _ if kind(expected) == kind(actual) => Ok(()),
        _ => Err(ShapeMismatch {
            path: String::from(path),
            expected: String::from(kind(expected)),
            actual: String::from(kind(actual)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
