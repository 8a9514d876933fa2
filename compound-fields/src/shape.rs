use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value that is either a single item or an ordered sequence of items.
///
/// External JSON is classified once with [`Shape::of`]; everything downstream
/// dispatches on the variant instead of re-inspecting the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shape<T> {
    Sequence(Vec<T>),
    Scalar(T),
}

impl<'a> Shape<&'a Value> {
    /// Arrays are sequences, every other JSON value (strings included) is a scalar.
    #[must_use]
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.iter().collect()),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
                Self::Scalar(value)
            }
        }
    }
}

/// Name of a JSON value's type as reported in error messages.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
