//! Schema model.
//!
//! A [`Schema`] is a set of named object types plus the name of the query root.
//! It is built once, validated in [`SchemaBuilder::build`], and immutable
//! afterwards. Two front ends produce it:
//!
//! - programmatic assembly of [`TypeDescriptor`] / [`FieldDescriptor`] values
//!   registered on a [`SchemaBuilder`]
//! - [`Schema::from_sdl`], which compiles type-language text and a
//!   [`ResolverMap`] into the same descriptors
//!
//! Both converge on `SchemaBuilder::build`, so validation and execution are
//! shared.

mod input;
mod printer;
mod scalar;
mod sdl;

pub use input::{coerce_input, literal_to_json, Literal};
pub use scalar::ScalarType;
pub use sdl::ResolverMap;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

pub use crate::ast::TypeRef;
use crate::error::{GqlError, GqlResult};
use crate::resolver::{Arguments, AsyncFnResolver, FnResolver, PropertyResolver, Resolver};

/// Declared argument of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Non-null without a default: the caller must supply it.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

/// One field of an object type.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub args: Vec<ArgSpec>,
    pub resolver: Arc<dyn Resolver>,
}

impl FieldDescriptor {
    /// New field resolved by [`PropertyResolver`] until another resolver is set.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        Self {
            resolver: Arc::new(PropertyResolver::new(name.clone())),
            name,
            description: None,
            ty,
            args: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn resolve_with<F>(self, func: F) -> Self
    where
        F: Fn(&Value, &Arguments) -> GqlResult<Value> + Send + Sync + 'static,
    {
        self.resolver(FnResolver::new(func))
    }

    pub fn resolve_async<F, Fut>(self, func: F) -> Self
    where
        F: Fn(Value, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GqlResult<Value>> + Send + 'static,
    {
        self.resolver(AsyncFnResolver::new(func))
    }

    pub fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|a| a.name == name)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A named object type with its fields in declaration order.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub description: Option<String>,
    fields: IndexMap<String, FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Build a type from an ordered sequence of fields, rejecting duplicates.
    pub fn describe(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> GqlResult<Self> {
        let mut descriptor = Self::new(name);
        for field in fields {
            descriptor.add_field(field)?;
        }
        Ok(descriptor)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> GqlResult<()> {
        if self.fields.contains_key(&field.name) {
            return Err(GqlError::Schema(format!(
                "Field \"{}.{}\" can only be defined once",
                self.name, field.name
            )));
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}

/// What a type name refers to in a schema.
#[derive(Debug, Clone, Copy)]
pub enum NamedType<'a> {
    Scalar(ScalarType),
    Object(&'a TypeDescriptor),
}

#[derive(Debug, Clone)]
pub struct Schema {
    query_type: String,
    types: IndexMap<String, TypeDescriptor>,
}

impl Schema {
    pub fn builder(query_type: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            query_type: query_type.into(),
            types: Vec::new(),
        }
    }

    /// Compile type-language text into a schema. Fields without an entry in
    /// `resolvers` read the same-named key off their parent value.
    pub fn from_sdl(sdl: &str, resolvers: ResolverMap) -> GqlResult<Self> {
        sdl::build_from_sdl(sdl, resolvers)
    }

    pub fn query_type(&self) -> &TypeDescriptor {
        // Presence is checked in `SchemaBuilder::build`
        &self.types[self.query_type.as_str()]
    }

    pub fn object_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn named_type(&self, name: &str) -> Option<NamedType<'_>> {
        if let Some(scalar) = ScalarType::from_name(name) {
            return Some(NamedType::Scalar(scalar));
        }
        self.types.get(name).map(NamedType::Object)
    }

    /// Render the schema back to type-language text.
    pub fn to_sdl(&self) -> String {
        printer::print_schema(self)
    }
}

pub struct SchemaBuilder {
    query_type: String,
    types: Vec<TypeDescriptor>,
}

impl SchemaBuilder {
    pub fn register(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }

    pub fn build(self) -> GqlResult<Schema> {
        let mut types = IndexMap::new();
        for ty in self.types {
            validate_name(&ty.name, "Type")?;
            if ScalarType::from_name(&ty.name).is_some() {
                return Err(GqlError::Schema(format!(
                    "Type \"{}\" conflicts with a built-in scalar",
                    ty.name
                )));
            }
            if types.contains_key(&ty.name) {
                return Err(GqlError::Schema(format!(
                    "There can be only one type named \"{}\"",
                    ty.name
                )));
            }
            types.insert(ty.name.clone(), ty);
        }

        if !types.contains_key(&self.query_type) {
            return Err(GqlError::Schema(format!(
                "Query root type \"{}\" is not defined",
                self.query_type
            )));
        }

        let names: Vec<String> = types.keys().cloned().collect();
        for ty in types.values_mut() {
            if ty.fields.is_empty() {
                return Err(GqlError::Schema(format!(
                    "Type \"{}\" must define one or more fields",
                    ty.name
                )));
            }
            for field in ty.fields.values_mut() {
                validate_field(&ty.name, field, &names)?;
            }
        }

        tracing::debug!(
            query_type = %self.query_type,
            types = types.len(),
            "schema built"
        );

        Ok(Schema {
            query_type: self.query_type,
            types,
        })
    }
}

fn validate_name(name: &str, what: &str) -> GqlResult<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(GqlError::Schema(format!("{} name \"{}\" is not a valid name", what, name)));
    }
    if name.starts_with("__") {
        return Err(GqlError::Schema(format!(
            "{} name \"{}\" must not begin with \"__\", which is reserved",
            what, name
        )));
    }
    Ok(())
}

fn validate_field(type_name: &str, field: &mut FieldDescriptor, types: &[String]) -> GqlResult<()> {
    validate_name(&field.name, "Field")?;

    let base = field.ty.base_name();
    if ScalarType::from_name(base).is_none() && !types.iter().any(|t| t == base) {
        return Err(GqlError::Schema(format!(
            "Field \"{}.{}\" refers to unknown type \"{}\"",
            type_name, field.name, base
        )));
    }

    let mut seen: Vec<String> = Vec::new();
    for arg in &mut field.args {
        validate_name(&arg.name, "Argument")?;
        if seen.contains(&arg.name) {
            return Err(GqlError::Schema(format!(
                "Argument \"{}.{}({}:)\" can only be defined once",
                type_name, field.name, arg.name
            )));
        }

        let arg_base = arg.ty.base_name();
        if ScalarType::from_name(arg_base).is_none() {
            return Err(GqlError::Schema(format!(
                "Argument \"{}.{}({}:)\" must be an input type, found \"{}\"",
                type_name, field.name, arg.name, arg.ty
            )));
        }

        if let Some(default) = &arg.default_value {
            let coerced = coerce_input(default, &arg.ty).map_err(|e| {
                GqlError::Schema(format!(
                    "Default value of argument \"{}.{}({}:)\" is invalid: {}",
                    type_name, field.name, arg.name, e
                ))
            })?;
            arg.default_value = Some(coerced);
        }
        seen.push(arg.name.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn string() -> TypeRef {
        TypeRef::named("String")
    }

    fn user_type() -> TypeDescriptor {
        TypeDescriptor::describe(
            "UserType",
            [
                FieldDescriptor::new("id", string()),
                FieldDescriptor::new("username", string()),
                FieldDescriptor::new("age", TypeRef::named("Int")),
            ],
        )
        .unwrap()
    }

    fn query_type() -> TypeDescriptor {
        TypeDescriptor::describe(
            "Query",
            [FieldDescriptor::new("user", TypeRef::named("UserType"))
                .argument(ArgSpec::new("id", string()).default_value("1001"))],
        )
        .unwrap()
    }

    #[test]
    fn test_describe_rejects_duplicate_fields() {
        let err = TypeDescriptor::describe(
            "UserType",
            [
                FieldDescriptor::new("id", string()),
                FieldDescriptor::new("id", TypeRef::named("Int")),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, GqlError::Schema(_)));
        assert!(err.to_string().contains("UserType.id"));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let ty = user_type();
        let names: Vec<&str> = ty.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "username", "age"]);
    }

    #[test]
    fn test_build_schema() {
        let schema = Schema::builder("Query")
            .register(user_type())
            .register(query_type())
            .build()
            .unwrap();
        assert_eq!(schema.query_type().name, "Query");
        assert!(schema.object_type("UserType").is_some());
        assert!(matches!(
            schema.named_type("Int"),
            Some(NamedType::Scalar(ScalarType::Int))
        ));
        assert!(matches!(schema.named_type("UserType"), Some(NamedType::Object(_))));
        assert!(schema.named_type("Nope").is_none());
    }

    #[test]
    fn test_build_rejects_missing_query_type() {
        let err = Schema::builder("Query").register(user_type()).build().unwrap_err();
        assert!(err.to_string().contains("Query root type"));
    }

    #[test]
    fn test_build_rejects_duplicate_types() {
        let err = Schema::builder("Query")
            .register(user_type())
            .register(user_type())
            .register(query_type())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("only one type named \"UserType\""));
    }

    #[test]
    fn test_build_rejects_unknown_field_type() {
        let err = Schema::builder("Query")
            .register(query_type())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown type \"UserType\""));
    }

    #[test]
    fn test_build_rejects_object_argument() {
        let query = TypeDescriptor::describe(
            "Query",
            [FieldDescriptor::new("user", TypeRef::named("UserType"))
                .argument(ArgSpec::new("filter", TypeRef::named("UserType")))],
        )
        .unwrap();
        let err = Schema::builder("Query")
            .register(user_type())
            .register(query)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must be an input type"));
    }

    #[test]
    fn test_build_rejects_bad_default() {
        let query = TypeDescriptor::describe(
            "Query",
            [FieldDescriptor::new("user", TypeRef::named("UserType"))
                .argument(ArgSpec::new("id", TypeRef::named("Int")).default_value("abc"))],
        )
        .unwrap();
        let err = Schema::builder("Query")
            .register(user_type())
            .register(query)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Default value"));
    }

    #[test]
    fn test_build_rejects_duplicate_arguments() {
        let query = TypeDescriptor::describe(
            "Query",
            [FieldDescriptor::new("user", TypeRef::named("UserType"))
                .argument(ArgSpec::new("id", string()))
                .argument(ArgSpec::new("id", string()))],
        )
        .unwrap();
        let err = Schema::builder("Query")
            .register(user_type())
            .register(query)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("can only be defined once"));
    }

    #[test]
    fn test_build_rejects_reserved_and_scalar_names() {
        let reserved = TypeDescriptor::describe("__Query", [FieldDescriptor::new("now", string())])
            .unwrap();
        assert!(Schema::builder("__Query").register(reserved).build().is_err());

        let scalar = TypeDescriptor::describe("String", [FieldDescriptor::new("now", string())])
            .unwrap();
        assert!(Schema::builder("String").register(scalar).build().is_err());
    }

    #[test]
    fn test_arg_spec_required() {
        let required = ArgSpec::new("id", TypeRef::non_null(string()));
        assert!(required.is_required());
        assert!(!required.clone().default_value(json!("1001")).is_required());
        assert!(!ArgSpec::new("id", string()).is_required());
    }
}
