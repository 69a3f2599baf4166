//! Argument coercion: caller values merged with declared defaults.

use super::ExecutionContext;
use crate::ast::Field;
use crate::error::{GqlError, GqlResult};
use crate::resolver::Arguments;
use crate::schema::{coerce_input, literal_to_json, FieldDescriptor, Literal};

pub(crate) fn coerce_arguments(
    ctx: &ExecutionContext<'_>,
    type_name: &str,
    descriptor: &FieldDescriptor,
    field: &Field,
) -> GqlResult<Arguments> {
    if let Some((name, _)) = field
        .arguments
        .iter()
        .find(|(name, _)| descriptor.arg(name).is_none())
    {
        return Err(GqlError::UnknownArgument {
            type_name: type_name.to_string(),
            field: descriptor.name.clone(),
            argument: name.clone(),
        });
    }

    let mut args = Arguments::new();
    for spec in &descriptor.args {
        let provided = field
            .arguments
            .iter()
            .find(|(name, _)| *name == spec.name)
            .map(|(_, literal)| literal_to_json(literal, Some(&ctx.variables)))
            .transpose()
            .map_err(GqlError::TypeCoercion)?;

        match provided {
            Some(Literal::Value(value)) => {
                let coerced = coerce_input(&value, &spec.ty).map_err(|e| {
                    GqlError::TypeCoercion(format!(
                        "Argument \"{}\" has invalid value {}: {}",
                        spec.name, value, e
                    ))
                })?;
                args.insert(spec.name.clone(), coerced);
            }
            Some(Literal::Undefined) | None => {
                if let Some(default) = &spec.default_value {
                    args.insert(spec.name.clone(), default.clone());
                } else if spec.ty.is_non_null() {
                    return Err(GqlError::MissingArgument {
                        argument: spec.name.clone(),
                        ty: spec.ty.to_string(),
                    });
                }
            }
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::InputValue;
    use crate::schema::{ArgSpec, Schema, TypeDescriptor, TypeRef};
    use serde_json::json;

    fn schema() -> Schema {
        let query = TypeDescriptor::describe(
            "Query",
            [FieldDescriptor::new("user", TypeRef::named("String"))
                .argument(ArgSpec::new("id", TypeRef::named("String")).default_value("1001"))
                .argument(ArgSpec::new("limit", TypeRef::non_null(TypeRef::named("Int"))))],
        )
        .unwrap();
        Schema::builder("Query").register(query).build().unwrap()
    }

    fn coerce(schema: &Schema, field: &Field, variables: serde_json::Map<String, serde_json::Value>) -> GqlResult<Arguments> {
        let ctx = ExecutionContext { schema, variables };
        let descriptor = schema.query_type().field("user").unwrap();
        coerce_arguments(&ctx, "Query", descriptor, field)
    }

    #[test]
    fn test_defaults_fill_missing_arguments() {
        let schema = schema();
        let field = Field::new("user").with_argument("limit", InputValue::Int(2));
        let args = coerce(&schema, &field, Default::default()).unwrap();
        assert_eq!(args.get("id"), Some(&json!("1001")));
        assert_eq!(args.get("limit"), Some(&json!(2)));
    }

    #[test]
    fn test_missing_required_argument() {
        let schema = schema();
        let err = coerce(&schema, &Field::new("user"), Default::default()).unwrap_err();
        assert_eq!(err.code(), "MISSING_ARGUMENT");
    }

    #[test]
    fn test_unknown_argument() {
        let schema = schema();
        let field = Field::new("user")
            .with_argument("limit", InputValue::Int(1))
            .with_argument("name", InputValue::String("x".to_string()));
        let err = coerce(&schema, &field, Default::default()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ARGUMENT");
    }

    #[test]
    fn test_invalid_argument_value() {
        let schema = schema();
        let field = Field::new("user").with_argument("limit", InputValue::String("ten".to_string()));
        let err = coerce(&schema, &field, Default::default()).unwrap_err();
        assert_eq!(err.code(), "TYPE_COERCION");
    }

    #[test]
    fn test_variables_and_undefined_variable_default() {
        let schema = schema();
        let field = Field::new("user")
            .with_argument("id", InputValue::Variable("missing".to_string()))
            .with_argument("limit", InputValue::Variable("n".to_string()));
        let mut variables = serde_json::Map::new();
        variables.insert("n".to_string(), json!(5));
        let args = coerce(&schema, &field, variables).unwrap();
        assert_eq!(args.get("id"), Some(&json!("1001")));
        assert_eq!(args.get("limit"), Some(&json!(5)));
    }
}
