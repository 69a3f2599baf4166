//! Input coercion for argument defaults, argument literals and variables.

use serde_json::{Map, Value};

use super::ScalarType;
use crate::ast::{InputValue, TypeRef};

/// Outcome of turning a literal into JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Value(Value),
    /// A variable that was neither provided nor defaulted.
    Undefined,
}

/// Convert a literal to JSON, substituting variables. Variables nested in a
/// list or object that are undefined become `null`.
pub fn literal_to_json(
    value: &InputValue,
    variables: Option<&Map<String, Value>>,
) -> Result<Literal, String> {
    let json = match value {
        InputValue::Null => Value::Null,
        InputValue::Int(n) => Value::from(*n),
        InputValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| format!("Float literal {} is not finite", f))?,
        InputValue::String(s) => Value::String(s.clone()),
        InputValue::Boolean(b) => Value::Bool(*b),
        InputValue::Enum(name) => {
            return Err(format!(
                "Enum value {} is not valid here; no enum types are defined",
                name
            ))
        }
        InputValue::Variable(name) => {
            let Some(variables) = variables else {
                return Err(format!("Unexpected variable \"${}\" in constant value", name));
            };
            return Ok(match variables.get(name) {
                Some(v) => Literal::Value(v.clone()),
                None => Literal::Undefined,
            });
        }
        InputValue::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(match literal_to_json(item, variables)? {
                    Literal::Value(v) => v,
                    Literal::Undefined => Value::Null,
                });
            }
            Value::Array(out)
        }
        InputValue::Object(fields) => {
            let mut out = Map::new();
            for (key, item) in fields {
                if let Literal::Value(v) = literal_to_json(item, variables)? {
                    out.insert(key.clone(), v);
                }
            }
            Value::Object(out)
        }
    };
    Ok(Literal::Value(json))
}

/// Coerce a JSON input value to `ty`. Only scalar (and list-of-scalar) input
/// types exist, which schema construction guarantees.
pub fn coerce_input(value: &Value, ty: &TypeRef) -> Result<Value, String> {
    match ty {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("Expected non-nullable type \"{}\" not to be null", ty));
            }
            coerce_input(value, inner)
        }
        _ if value.is_null() => Ok(Value::Null),
        TypeRef::List(inner) => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| coerce_input(item, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            // A single value is accepted where a list is expected
            single => Ok(Value::Array(vec![coerce_input(single, inner)?])),
        },
        TypeRef::Named(name) => {
            let scalar = ScalarType::from_name(name)
                .ok_or_else(|| format!("\"{}\" is not an input type", name))?;
            scalar.coerce_input(value)
        }
    }
}
