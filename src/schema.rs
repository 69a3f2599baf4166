//! The demo schema, in both construction styles.
//!
//! ```text
//! type UserType { id: String  username: String  age: Int }
//! type Query    { user(id: String = "1001"): UserType  now: String }
//! ```
//!
//! Both builders wire the same resolvers, so either schema answers every
//! query identically.

use std::sync::Arc;

use async_trait::async_trait;
use minigql_core::{
    ArgSpec, Arguments, FieldDescriptor, GqlResult, Resolver, ResolverMap, Schema,
    TypeDescriptor, TypeRef,
};
use serde_json::Value;

use crate::config::SchemaStyle;
use crate::store::UserStore;

pub const DEMO_SDL: &str = r#"
"A stored user"
type UserType {
  id: String
  username: String
  age: Int
}

type Query {
  "Look up a user by id"
  user(id: String = "1001"): UserType
  "Current server time"
  now: String
}
"#;

/// en-US `toLocaleString` style, e.g. `3/14/2024, 9:05:07 PM`.
const NOW_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Resolves `Query.user` against the store. Unknown ids resolve to `null`.
#[derive(Debug, Clone)]
pub struct UserLookup {
    store: Arc<UserStore>,
}

impl UserLookup {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Resolver for UserLookup {
    async fn resolve(&self, _parent: &Value, args: &Arguments) -> GqlResult<Value> {
        let Some(id) = args.get("id").and_then(Value::as_str) else {
            return Ok(Value::Null);
        };
        Ok(self
            .store
            .lookup(id)
            .map(|user| user.to_value(id))
            .unwrap_or(Value::Null))
    }
}

fn resolve_now(_parent: &Value, _args: &Arguments) -> GqlResult<Value> {
    Ok(Value::String(
        chrono::Local::now().format(NOW_FORMAT).to_string(),
    ))
}

pub fn build_schema(style: SchemaStyle, store: Arc<UserStore>) -> GqlResult<Schema> {
    match style {
        SchemaStyle::Sdl => build_sdl_schema(store),
        SchemaStyle::Programmatic => build_programmatic_schema(store),
    }
}

/// Declarative style: type-language text plus a resolver map.
pub fn build_sdl_schema(store: Arc<UserStore>) -> GqlResult<Schema> {
    let resolvers = ResolverMap::new()
        .insert("Query", "user", UserLookup::new(store))
        .resolve_with("Query", "now", resolve_now);
    Schema::from_sdl(DEMO_SDL, resolvers)
}

/// Programmatic style: descriptors assembled in code. `UserType` fields use
/// the default property resolver.
pub fn build_programmatic_schema(store: Arc<UserStore>) -> GqlResult<Schema> {
    let user_type = TypeDescriptor::describe(
        "UserType",
        [
            FieldDescriptor::new("id", TypeRef::named("String")),
            FieldDescriptor::new("username", TypeRef::named("String")),
            FieldDescriptor::new("age", TypeRef::named("Int")),
        ],
    )?
    .with_description("A stored user");

    let query = TypeDescriptor::describe(
        "Query",
        [
            FieldDescriptor::new("user", TypeRef::named("UserType"))
                .description("Look up a user by id")
                .argument(ArgSpec::new("id", TypeRef::named("String")).default_value("1001"))
                .resolver(UserLookup::new(store)),
            FieldDescriptor::new("now", TypeRef::named("String"))
                .description("Current server time")
                .resolve_with(resolve_now),
        ],
    )?;

    Schema::builder("Query")
        .register(user_type)
        .register(query)
        .build()
}
