//! Query execution.
//!
//! [`Executor`] owns a shared [`Schema`] and turns a [`Request`] into a
//! [`Response`]. Request-level problems (syntax, operation selection,
//! variables) produce a response without `data`; everything that goes wrong
//! while resolving a single field is reported as a field error next to the
//! partial data.

mod arguments;
mod resolve;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ast::{Document, Field, OperationDefinition, OperationType};
use crate::error::{GqlError, GqlResult};
use crate::parser::parse_query;
use crate::response::{GraphQLError, Response};
use crate::schema::{coerce_input, literal_to_json, Literal, Schema, ScalarType};

/// Deepest selection nesting the executor will resolve.
pub const MAX_SELECTION_DEPTH: usize = 64;

/// Variable values supplied with a request.
pub type Variables = Map<String, Value>;

/// A GraphQL request as sent over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Option<Variables>,
    /// Parent value of the root fields. Not part of the wire format.
    #[serde(skip)]
    pub root_value: Value,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn root_value(mut self, root_value: Value) -> Self {
        self.root_value = root_value;
        self
    }
}

/// Per-request state shared by all field resolutions.
pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) variables: Variables,
}

#[derive(Clone)]
pub struct Executor {
    schema: Arc<Schema>,
}

impl Executor {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Execute a query string with no variables and a `null` root value.
    pub async fn execute_query(&self, query: &str) -> Response {
        self.execute(Request::new(query)).await
    }

    pub async fn execute(&self, request: Request) -> Response {
        let document = match parse_query(&request.query) {
            Ok(document) => document,
            Err(err) => {
                tracing::debug!(error = %err, "query failed to parse");
                return Response::from_error(GraphQLError::from_error(&err, None, Vec::new()));
            }
        };

        let variables = request.variables.unwrap_or_default();
        self.execute_document(
            &document,
            request.operation_name.as_deref(),
            &variables,
            &request.root_value,
        )
        .await
    }

    /// Execute an already-parsed document.
    pub async fn execute_document(
        &self,
        document: &Document,
        operation_name: Option<&str>,
        variables: &Variables,
        root_value: &Value,
    ) -> Response {
        let operation = match select_operation(document, operation_name) {
            Ok(operation) => operation,
            Err(err) => return request_error(&err, None),
        };

        if operation.operation_type != OperationType::Query {
            let err = GqlError::OperationNotSupported(format!(
                "{} operations are not supported",
                operation.operation_type
            ));
            return request_error(&err, Some(operation.location));
        }

        if let Err(err) = check_depth(&operation.selection_set) {
            return request_error(&err, Some(operation.location));
        }

        let variables = match coerce_variables(operation, variables) {
            Ok(variables) => variables,
            Err(err) => return request_error(&err, Some(operation.location)),
        };

        tracing::debug!(
            operation = operation.name.as_deref().unwrap_or("<anonymous>"),
            fields = operation.selection_set.len(),
            "executing query"
        );

        let ctx = ExecutionContext {
            schema: &self.schema,
            variables,
        };
        let (data, errors) = resolve::execute_selection_set(
            &ctx,
            self.schema.query_type(),
            root_value,
            &operation.selection_set,
            Vec::new(),
        )
        .await;

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "query completed with field errors");
        }

        Response {
            errors,
            data: Some(Value::Object(data)),
        }
    }
}

fn request_error(err: &GqlError, location: Option<crate::ast::Location>) -> Response {
    tracing::debug!(error = %err, "request rejected");
    Response::from_error(GraphQLError::from_error(err, location, Vec::new()))
}

fn select_operation<'d>(
    document: &'d Document,
    operation_name: Option<&str>,
) -> GqlResult<&'d OperationDefinition> {
    match operation_name {
        Some(name) => document
            .operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| {
                GqlError::OperationResolution(format!("Unknown operation named \"{}\"", name))
            }),
        None => match document.operations.as_slice() {
            [single] => Ok(single),
            _ => Err(GqlError::OperationResolution(
                "Must provide operation name if query contains multiple operations".to_string(),
            )),
        },
    }
}

/// Documents built by hand skip the parser's nesting limit, so the depth is
/// checked again here without recursing.
fn check_depth(selection: &[Field]) -> GqlResult<()> {
    let mut pending = vec![(selection, 1)];
    while let Some((fields, depth)) = pending.pop() {
        if depth > MAX_SELECTION_DEPTH {
            return Err(GqlError::DepthLimit(MAX_SELECTION_DEPTH));
        }
        for field in fields {
            if let Some(inner) = &field.selection_set {
                pending.push((inner.as_slice(), depth + 1));
            }
        }
    }
    Ok(())
}

/// Coerce supplied variables against the operation's definitions. Values for
/// undeclared variables are dropped, so a reference to one is undefined.
fn coerce_variables(operation: &OperationDefinition, supplied: &Variables) -> GqlResult<Variables> {
    let mut coerced = Variables::new();

    for definition in &operation.variable_definitions {
        let base = definition.ty.base_name();
        if ScalarType::from_name(base).is_none() {
            return Err(GqlError::UnknownType(base.to_string()));
        }

        let value = match supplied.get(&definition.name) {
            Some(value) => Some(value.clone()),
            None => match &definition.default_value {
                Some(default) => match literal_to_json(default, None) {
                    Ok(Literal::Value(v)) => Some(v),
                    Ok(Literal::Undefined) => None,
                    Err(message) => return Err(GqlError::TypeCoercion(message)),
                },
                None => None,
            },
        };

        match value {
            Some(value) => {
                let value = coerce_input(&value, &definition.ty).map_err(|e| {
                    GqlError::TypeCoercion(format!(
                        "Variable \"${}\" got invalid value {}; {}",
                        definition.name, value, e
                    ))
                })?;
                coerced.insert(definition.name.clone(), value);
            }
            None if definition.ty.is_non_null() => {
                return Err(GqlError::TypeCoercion(format!(
                    "Variable \"${}\" of required type \"{}\" was not provided",
                    definition.name, definition.ty
                )));
            }
            None => {}
        }
    }

    Ok(coerced)
}
