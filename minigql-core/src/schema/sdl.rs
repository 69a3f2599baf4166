//! Type-language front end.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::{literal_to_json, ArgSpec, FieldDescriptor, Literal, Schema, TypeDescriptor};
use crate::ast::InputValue;
use crate::error::{GqlError, GqlResult};
use crate::parser::parse_schema;
use crate::resolver::{Arguments, AsyncFnResolver, FnResolver, Resolver};

/// Resolvers for type-language schemas, keyed by `(type, field)`.
#[derive(Default, Clone)]
pub struct ResolverMap {
    resolvers: HashMap<(String, String), Arc<dyn Resolver>>,
}

impl ResolverMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        resolver: impl Resolver + 'static,
    ) -> Self {
        self.resolvers
            .insert((type_name.into(), field.into()), Arc::new(resolver));
        self
    }

    pub fn resolve_with<F>(self, type_name: impl Into<String>, field: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &Arguments) -> GqlResult<Value> + Send + Sync + 'static,
    {
        self.insert(type_name, field, FnResolver::new(func))
    }

    pub fn resolve_async<F, Fut>(
        self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        func: F,
    ) -> Self
    where
        F: Fn(Value, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GqlResult<Value>> + Send + 'static,
    {
        self.insert(type_name, field, AsyncFnResolver::new(func))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    fn take(&mut self, type_name: &str, field: &str) -> Option<Arc<dyn Resolver>> {
        self.resolvers
            .remove(&(type_name.to_string(), field.to_string()))
    }
}

pub(super) fn build_from_sdl(sdl: &str, mut resolvers: ResolverMap) -> GqlResult<Schema> {
    let document = parse_schema(sdl)?;
    let query_type = document
        .query_type
        .clone()
        .unwrap_or_else(|| "Query".to_string());

    let mut builder = Schema::builder(query_type);
    for definition in document.types {
        let mut descriptor = TypeDescriptor::new(&definition.name);
        descriptor.description = definition.description;

        for field_def in definition.fields {
            let mut field = FieldDescriptor::new(&field_def.name, field_def.ty);
            field.description = field_def.description;

            for arg in field_def.arguments {
                let mut spec = ArgSpec::new(arg.name, arg.ty);
                if let Some(default) = &arg.default_value {
                    spec.default_value = Some(const_value(default)?);
                }
                field.args.push(spec);
            }

            if let Some(resolver) = resolvers.take(&definition.name, &field_def.name) {
                field.resolver = resolver;
            }
            descriptor.add_field(field)?;
        }
        builder = builder.register(descriptor);
    }

    if let Some((type_name, field)) = resolvers.resolvers.keys().next() {
        return Err(GqlError::Schema(format!(
            "Resolver registered for \"{}.{}\", which is not defined in the schema",
            type_name, field
        )));
    }

    builder.build()
}

fn const_value(value: &InputValue) -> GqlResult<Value> {
    match literal_to_json(value, None) {
        Ok(Literal::Value(v)) => Ok(v),
        Ok(Literal::Undefined) => Ok(Value::Null),
        Err(message) => Err(GqlError::Schema(message)),
    }
}
