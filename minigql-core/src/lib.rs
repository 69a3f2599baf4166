//! minigql Core - transport-independent GraphQL subset.
//!
//! This crate provides the schema model, parsers and executor for a small
//! GraphQL subset (queries only, no fragments or directives), without any
//! HTTP or storage dependencies.
//!
//! # Main Components
//!
//! - **Schema**: object types built programmatically or from type-language text
//! - **Resolver**: per-field async resolvers behind one trait
//! - **Parser**: query documents and type-language documents into ASTs,
//!   on top of `apollo-parser`
//! - **Executor**: resolves a query against a schema into a [`Response`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use minigql_core::{Executor, ResolverMap, Schema};
//! use serde_json::json;
//!
//! let resolvers = ResolverMap::new()
//!     .resolve_with("Query", "greeting", |_, args| {
//!         Ok(json!(format!("hello {}", args["name"].as_str().unwrap_or(""))))
//!     });
//! let schema = Schema::from_sdl(
//!     r#"type Query { greeting(name: String = "world"): String }"#,
//!     resolvers,
//! )
//! .unwrap();
//!
//! let executor = Executor::new(Arc::new(schema));
//! let response = futures::executor::block_on(executor.execute_query("{ greeting }"));
//! assert_eq!(response.to_json(), json!({"data": {"greeting": "hello world"}}));
//! ```

pub mod ast;
pub mod error;
pub mod executor;
pub mod parser;
pub mod resolver;
pub mod response;
pub mod schema;

// Re-export main types for convenience
pub use ast::{
    Document, Field, InputValue, Location, OperationDefinition, OperationType, TypeRef,
    TypeSystemDocument,
};
pub use error::{GqlError, GqlResult};
pub use executor::{Executor, Request, Variables, MAX_SELECTION_DEPTH};
pub use parser::{parse_query, parse_schema};
pub use resolver::{Arguments, AsyncFnResolver, FnResolver, PropertyResolver, Resolver};
pub use response::{GraphQLError, PathSegment, Response};
pub use schema::{
    ArgSpec, FieldDescriptor, NamedType, ResolverMap, ScalarType, Schema, SchemaBuilder,
    TypeDescriptor,
};
