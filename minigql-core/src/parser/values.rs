//! Literal values and type references.

use apollo_parser::cst;

use super::Source;
use crate::ast::{InputValue, TypeRef};
use crate::error::GqlResult;

impl Source<'_> {
    /// A value in an argument position, where variables are allowed.
    pub(super) fn value(&self, value: cst::Value) -> GqlResult<InputValue> {
        self.input_value(value, false)
    }

    /// A default value. Variables are rejected.
    pub(super) fn const_value(&self, value: cst::Value) -> GqlResult<InputValue> {
        self.input_value(value, true)
    }

    fn input_value(&self, value: cst::Value, constant: bool) -> GqlResult<InputValue> {
        let value = match value {
            cst::Value::Variable(var) => {
                if constant {
                    return Err(self.node_error(&var, "Unexpected variable in constant value"));
                }
                InputValue::Variable(self.name(var.name(), &var)?)
            }
            cst::Value::StringValue(s) => InputValue::String(String::from(s)),
            cst::Value::FloatValue(f) => {
                let text = f
                    .float_token()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                match text.parse::<f64>() {
                    Ok(n) => InputValue::Float(n),
                    Err(_) => {
                        return Err(self.node_error(&f, format!("Invalid number: {}", text)));
                    }
                }
            }
            cst::Value::IntValue(i) => {
                let text = i
                    .int_token()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                match text.parse::<i64>() {
                    Ok(n) => InputValue::Int(n),
                    Err(_) => {
                        return Err(self.node_error(&i, format!("Invalid number: {}", text)));
                    }
                }
            }
            cst::Value::BooleanValue(b) => InputValue::Boolean(b.true_token().is_some()),
            cst::Value::NullValue(_) => InputValue::Null,
            cst::Value::EnumValue(e) => InputValue::Enum(self.name(e.name(), &e)?),
            cst::Value::ListValue(list) => InputValue::List(
                list.values()
                    .map(|v| self.input_value(v, constant))
                    .collect::<GqlResult<Vec<_>>>()?,
            ),
            cst::Value::ObjectValue(object) => InputValue::Object(
                object
                    .object_fields()
                    .map(|field| {
                        let name = self.name(field.name(), &field)?;
                        let value = self.required(field.value(), &field, "a value")?;
                        Ok((name, self.input_value(value, constant)?))
                    })
                    .collect::<GqlResult<Vec<_>>>()?,
            ),
        };
        Ok(value)
    }

    pub(super) fn type_ref(&self, ty: cst::Type) -> GqlResult<TypeRef> {
        match ty {
            cst::Type::NamedType(named) => self.named_type(named),
            cst::Type::ListType(list) => {
                let item = self.required(list.ty(), &list, "a list item type")?;
                Ok(TypeRef::list(self.type_ref(item)?))
            }
            cst::Type::NonNullType(non_null) => {
                let inner = match (non_null.named_type(), non_null.list_type()) {
                    (Some(named), _) => self.named_type(named)?,
                    (None, Some(list)) => self.type_ref(cst::Type::ListType(list))?,
                    (None, None) => return Err(self.node_error(&non_null, "Expected a type")),
                };
                Ok(TypeRef::non_null(inner))
            }
        }
    }

    fn named_type(&self, named: cst::NamedType) -> GqlResult<TypeRef> {
        Ok(TypeRef::named(self.name(named.name(), &named)?))
    }
}
