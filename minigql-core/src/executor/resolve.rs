//! Field resolution and value completion.
//!
//! Sibling fields of one selection set are resolved concurrently and
//! assembled in request order. Errors never abort a selection set: the
//! failing field is set to `null` and its error is collected. Fields that
//! share a response key are merged before resolution.

use std::borrow::Cow;

use futures::future::{join_all, BoxFuture, FutureExt};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::arguments::coerce_arguments;
use super::ExecutionContext;
use crate::ast::{Field, InputValue, TypeRef};
use crate::error::GqlError;
use crate::response::{GraphQLError, PathSegment};
use crate::schema::{FieldDescriptor, NamedType, TypeDescriptor};

type Path = Vec<PathSegment>;
type Resolved = (Value, Vec<GraphQLError>);

pub(crate) fn execute_selection_set<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a TypeDescriptor,
    parent: &'a Value,
    selection: &'a [Field],
    path: Path,
) -> BoxFuture<'a, (Map<String, Value>, Vec<GraphQLError>)> {
    async move {
        let plan = plan_fields(selection, &path);

        let pending = plan.iter().filter_map(|(key, planned)| {
            let field = planned.as_ref().ok()?;
            let mut field_path = path.clone();
            field_path.push(PathSegment::Key(key.to_string()));
            Some(execute_field(ctx, object_type, parent, field, field_path))
        });
        let mut resolved = join_all(pending).await.into_iter();

        let mut data = Map::new();
        let mut errors = Vec::new();
        for (key, planned) in plan {
            match planned {
                Ok(_) => {
                    if let Some((value, field_errors)) = resolved.next() {
                        data.insert(key.to_string(), value);
                        errors.extend(field_errors);
                    }
                }
                Err(conflict) => {
                    data.insert(key.to_string(), Value::Null);
                    errors.push(conflict);
                }
            }
        }
        (data, errors)
    }
    .boxed()
}

type Planned<'f> = (&'f str, Result<Cow<'f, Field>, GraphQLError>);

/// Group fields by response key, in first-occurrence order. Fields sharing a
/// key are merged when they select the same field with the same arguments;
/// otherwise the key resolves to `null` with a conflict error.
fn plan_fields<'f>(selection: &'f [Field], path: &Path) -> Vec<Planned<'f>> {
    let mut groups: IndexMap<&str, (&Field, Vec<&Field>)> = IndexMap::new();
    for field in selection {
        match groups.entry(field.response_key()) {
            Entry::Occupied(mut entry) => entry.get_mut().1.push(field),
            Entry::Vacant(entry) => {
                entry.insert((field, Vec::new()));
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, (first, rest))| {
            if rest.is_empty() {
                return (key, Ok(Cow::Borrowed(first)));
            }
            let planned = merge_fields(key, first, &rest).map(Cow::Owned).map_err(|err| {
                tracing::debug!(key, error = %err, "conflicting fields");
                let mut field_path = path.clone();
                field_path.push(PathSegment::Key(key.to_string()));
                GraphQLError::from_error(&err, Some(first.location), field_path)
            });
            (key, planned)
        })
        .collect()
}

fn merge_fields(key: &str, first: &Field, rest: &[&Field]) -> Result<Field, GqlError> {
    let conflict = |reason: String| GqlError::FieldConflict {
        key: key.to_string(),
        reason,
    };

    let mut merged = first.clone();
    for other in rest {
        if other.name != first.name {
            return Err(conflict(format!(
                "\"{}\" and \"{}\" are different fields",
                first.name, other.name
            )));
        }
        if !same_arguments(&first.arguments, &other.arguments) {
            return Err(conflict("they have differing arguments".to_string()));
        }
        if let Some(more) = &other.selection_set {
            merged
                .selection_set
                .get_or_insert_with(Vec::new)
                .extend(more.iter().cloned());
        }
    }
    Ok(merged)
}

/// Argument order does not matter.
fn same_arguments(left: &[(String, InputValue)], right: &[(String, InputValue)]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(name, value)| right.iter().any(|(n, v)| n == name && v == value))
}

async fn execute_field<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a TypeDescriptor,
    parent: &'a Value,
    field: &'a Field,
    path: Path,
) -> Resolved {
    if field.name == "__typename" {
        return (Value::String(object_type.name.clone()), Vec::new());
    }

    let fail = |err: GqlError, path: Path| -> Resolved {
        tracing::debug!(
            field = %field.name,
            code = err.code(),
            error = %err,
            "field error"
        );
        (
            Value::Null,
            vec![GraphQLError::from_error(&err, Some(field.location), path)],
        )
    };

    let Some(descriptor) = object_type.field(&field.name) else {
        return fail(
            GqlError::UnknownField {
                type_name: object_type.name.clone(),
                field: field.name.clone(),
            },
            path,
        );
    };

    if let Err(err) = check_selection(ctx, descriptor, field) {
        return fail(err, path);
    }

    let args = match coerce_arguments(ctx, &object_type.name, descriptor, field) {
        Ok(args) => args,
        Err(err) => return fail(err, path),
    };

    let raw = match descriptor.resolver.resolve(parent, &args).await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                field = %format!("{}.{}", object_type.name, descriptor.name),
                error = %err,
                "resolver failed"
            );
            let err = match err {
                GqlError::Resolver(_) => err,
                other => GqlError::Resolver(other.to_string()),
            };
            return fail(err, path);
        }
    };

    let owner = format!("{}.{}", object_type.name, descriptor.name);
    let (value, errors) = complete_value(ctx, &descriptor.ty, &owner, field, raw, path).await;
    if let Some(first) = errors.first() {
        tracing::debug!(field = %owner, error = %first.message, "field completed with errors");
    }
    (value, errors)
}

/// Object-typed fields need a sub-selection; scalar fields must not have one.
fn check_selection(
    ctx: &ExecutionContext<'_>,
    descriptor: &FieldDescriptor,
    field: &Field,
) -> Result<(), GqlError> {
    let base = descriptor.ty.base_name();
    match (ctx.schema.named_type(base), &field.selection_set) {
        (Some(NamedType::Object(_)), None) => Err(GqlError::SelectionRequired {
            field: field.name.clone(),
            ty: descriptor.ty.to_string(),
        }),
        (Some(NamedType::Scalar(scalar)), Some(_)) => Err(GqlError::TypeCoercion(format!(
            "Field \"{}\" must not have a selection since type \"{}\" has no subfields",
            field.name, scalar
        ))),
        (None, _) => Err(GqlError::UnknownType(base.to_string())),
        _ => Ok(()),
    }
}

fn complete_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    ty: &'a TypeRef,
    owner: &'a str,
    field: &'a Field,
    value: Value,
    path: Path,
) -> BoxFuture<'a, Resolved> {
    async move {
        let error = |err: GqlError, path: Path| -> Resolved {
            (
                Value::Null,
                vec![GraphQLError::from_error(&err, Some(field.location), path)],
            )
        };

        match ty {
            TypeRef::NonNull(inner) => {
                if value.is_null() {
                    return error(GqlError::NullViolation(owner.to_string()), path);
                }
                complete_value(ctx, inner, owner, field, value, path).await
            }
            _ if value.is_null() => (Value::Null, Vec::new()),
            TypeRef::List(inner) => {
                let items = match value {
                    Value::Array(items) => items,
                    other => {
                        return error(
                            GqlError::TypeCoercion(format!(
                                "Expected a list for field {}, got {}",
                                owner, other
                            )),
                            path,
                        );
                    }
                };
                let pending = items.into_iter().enumerate().map(|(i, item)| {
                    let mut item_path = path.clone();
                    item_path.push(PathSegment::Index(i));
                    complete_value(ctx, inner, owner, field, item, item_path)
                });
                let mut values = Vec::new();
                let mut errors = Vec::new();
                for (item, item_errors) in join_all(pending).await {
                    values.push(item);
                    errors.extend(item_errors);
                }
                (Value::Array(values), errors)
            }
            TypeRef::Named(name) => match ctx.schema.named_type(name) {
                Some(NamedType::Scalar(scalar)) => match scalar.coerce_output(&value) {
                    Ok(coerced) => (coerced, Vec::new()),
                    Err(message) => error(GqlError::TypeCoercion(message), path),
                },
                Some(NamedType::Object(object_type)) => {
                    let Some(selection) = field.selection_set.as_deref() else {
                        return error(
                            GqlError::SelectionRequired {
                                field: field.name.clone(),
                                ty: name.clone(),
                            },
                            path,
                        );
                    };
                    if !value.is_object() {
                        return error(
                            GqlError::TypeCoercion(format!(
                                "Expected an object for field {} of type \"{}\", got {}",
                                owner, name, value
                            )),
                            path,
                        );
                    }
                    let (data, errors) =
                        execute_selection_set(ctx, object_type, &value, selection, path).await;
                    (Value::Object(data), errors)
                }
                None => error(GqlError::UnknownType(name.clone()), path),
            },
        }
    }
    .boxed()
}
