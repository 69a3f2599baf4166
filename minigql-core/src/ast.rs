//! Abstract syntax trees for query documents and the type language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Reference to a type, as written in the type language or a variable
/// definition: `String`, `[UserType]`, `Int!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The innermost named type, with list and non-null wrappers stripped.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Literal or variable appearing in argument position.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
    Variable(String),
}

// ==================== Query documents ====================

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operations: Vec<OperationDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        };
        f.write_str(keyword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<String>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub selection_set: Vec<Field>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<InputValue>,
}

/// One requested field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, InputValue)>,
    /// `None` when the field was written without braces.
    pub selection_set: Option<Vec<Field>>,
    pub location: Location,
}

impl Field {
    /// Build a field selection without going through the parser.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            selection_set: None,
            location: Location::default(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: InputValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn with_selection(mut self, selection: Vec<Field>) -> Self {
        self.selection_set = Some(selection);
        self
    }

    /// Key under which the result is stored: the alias, or the field name.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// ==================== Type language ====================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeSystemDocument {
    /// Root query type named by a `schema { query: ... }` block
    pub query_type: Option<String>,
    pub types: Vec<ObjectTypeDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: TypeRef,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<InputValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::named("UserType")));
        assert_eq!(ty.to_string(), "[UserType]!");
        assert_eq!(ty.base_name(), "UserType");
        assert!(ty.is_non_null());
    }

    #[test]
    fn test_response_key_prefers_alias() {
        let mut field = Field::new("user");
        assert_eq!(field.response_key(), "user");
        field.alias = Some("first".to_string());
        assert_eq!(field.response_key(), "first");
    }
}
