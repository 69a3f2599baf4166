//! Built-in scalar types and their coercion rules.
//!
//! Output coercion is lenient (a resolver returning `90` for a `String` field
//! yields `"90"`); input coercion for arguments and variables is strict.

use std::fmt;

use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Boolean,
    ID,
}

impl ScalarType {
    pub const ALL: [ScalarType; 5] = [
        ScalarType::String,
        ScalarType::Int,
        ScalarType::Float,
        ScalarType::Boolean,
        ScalarType::ID,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(ScalarType::String),
            "Int" => Some(ScalarType::Int),
            "Float" => Some(ScalarType::Float),
            "Boolean" => Some(ScalarType::Boolean),
            "ID" => Some(ScalarType::ID),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::ID => "ID",
        }
    }

    /// Coerce a resolver result to this scalar. `null` is handled by the caller.
    pub fn coerce_output(&self, value: &Value) -> Result<Value, String> {
        match self {
            ScalarType::Int => match value {
                Value::Number(n) => int_from_number(n)
                    .ok_or_else(|| non_representable("Int", "non-integer or non 32-bit", value)),
                Value::Bool(b) => Ok(Value::from(*b as i32)),
                Value::String(s) => s
                    .trim()
                    .parse::<i32>()
                    .map(Value::from)
                    .map_err(|_| non_representable("Int", "non-integer", value)),
                _ => Err(non_representable("Int", "non-integer", value)),
            },
            ScalarType::Float => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::Bool(b) => Ok(Value::from(if *b { 1.0 } else { 0.0 })),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| non_representable("Float", "non numeric", value)),
                _ => Err(non_representable("Float", "non numeric", value)),
            },
            ScalarType::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err(non_representable("String", "non string", value)),
            },
            ScalarType::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Number(n) => n
                    .as_f64()
                    .map(|f| Value::Bool(f != 0.0))
                    .ok_or_else(|| non_representable("Boolean", "non boolean", value)),
                _ => Err(non_representable("Boolean", "non boolean", value)),
            },
            ScalarType::ID => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
                _ => Err(non_representable("ID", "non ID", value)),
            },
        }
    }

    /// Coerce an argument or variable value to this scalar.
    pub fn coerce_input(&self, value: &Value) -> Result<Value, String> {
        match self {
            ScalarType::Int => match value {
                Value::Number(n) => int_from_number(n)
                    .ok_or_else(|| non_representable("Int", "non-integer or non 32-bit", value)),
                _ => Err(non_representable("Int", "non-integer", value)),
            },
            ScalarType::Float => match value {
                Value::Number(_) => Ok(value.clone()),
                _ => Err(non_representable("Float", "non numeric", value)),
            },
            ScalarType::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(non_representable("String", "non string", value)),
            },
            ScalarType::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(non_representable("Boolean", "non boolean", value)),
            },
            ScalarType::ID => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
                _ => Err(non_representable("ID", "non ID", value)),
            },
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integral numbers within the signed 32-bit range; `2.0` counts as integral.
fn int_from_number(n: &Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok().map(Value::from);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(Value::from(f as i32))
    } else {
        None
    }
}

fn non_representable(scalar: &str, kind: &str, value: &Value) -> String {
    format!("{} cannot represent {} value: {}", scalar, kind, value)
}
