use super::Value;
use serde::{Deserialize, Serialize};

/// Wire form of a [`Value`]: a bare number, a bare string, or a two-string
/// array for paired inputs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValueJson {
    Num(i32),
    Str(String),
    Pair(String, String),
}

impl From<ValueJson> for Value {
    fn from(value_json: ValueJson) -> Self {
        match value_json {
            ValueJson::Num(n) => Value::Num(n),
            ValueJson::Str(s) => Value::Str(s),
            ValueJson::Pair(x, y) => Value::Pair(x, y),
        }
    }
}

impl From<&Value> for ValueJson {
    fn from(value: &Value) -> Self {
        match value {
            Value::Num(n) => ValueJson::Num(*n),
            Value::Str(s) => ValueJson::Str(s.clone()),
            Value::Pair(x, y) => ValueJson::Pair(x.clone(), y.clone()),
        }
    }
}
