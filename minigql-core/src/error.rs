//! Error types for minigql-core.
//!
//! Transport-independent: no axum, no HTTP status codes. Every variant maps to
//! a stable `extensions.code` string through [`GqlError::code`].

use thiserror::Error;

use crate::ast::Location;

/// minigql error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GqlError {
    /// Malformed schema construction. Fatal at startup.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Syntax error: {message}")]
    Parse { message: String, location: Location },

    #[error("Cannot query field \"{field}\" on type \"{type_name}\"")]
    UnknownField { type_name: String, field: String },

    #[error("Unknown argument \"{argument}\" on field \"{type_name}.{field}\"")]
    UnknownArgument {
        type_name: String,
        field: String,
        argument: String,
    },

    #[error("Argument \"{argument}\" of required type \"{ty}\" was not provided")]
    MissingArgument { argument: String, ty: String },

    #[error("{0}")]
    TypeCoercion(String),

    #[error("Cannot return null for non-nullable field {0}")]
    NullViolation(String),

    #[error("Field \"{field}\" of type \"{ty}\" must have a selection of subfields")]
    SelectionRequired { field: String, ty: String },

    #[error("{0}")]
    Resolver(String),

    #[error("{0}")]
    OperationResolution(String),

    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    #[error("Unknown type \"{0}\"")]
    UnknownType(String),

    #[error("Fields \"{key}\" conflict because {reason}. Use different aliases on the fields to fetch both")]
    FieldConflict { key: String, reason: String },

    #[error("Selection nesting exceeds the maximum depth of {0}")]
    DepthLimit(usize),
}

/// Result type for minigql operations
pub type GqlResult<T> = Result<T, GqlError>;

impl GqlError {
    /// Shorthand for errors raised inside resolvers.
    pub fn resolver(message: impl Into<String>) -> Self {
        GqlError::Resolver(message.into())
    }

    /// Machine-readable code reported under `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            GqlError::Schema(_) => "SCHEMA_ERROR",
            GqlError::Parse { .. } => "GRAPHQL_PARSE_FAILED",
            GqlError::UnknownField { .. } => "UNKNOWN_FIELD",
            GqlError::UnknownArgument { .. } => "UNKNOWN_ARGUMENT",
            GqlError::MissingArgument { .. } => "MISSING_ARGUMENT",
            GqlError::TypeCoercion(_) => "TYPE_COERCION",
            GqlError::NullViolation(_) => "NULL_VIOLATION",
            GqlError::SelectionRequired { .. } => "SELECTION_REQUIRED",
            GqlError::Resolver(_) => "RESOLVER_ERROR",
            GqlError::OperationResolution(_) => "OPERATION_RESOLUTION",
            GqlError::OperationNotSupported(_) => "OPERATION_NOT_SUPPORTED",
            GqlError::UnknownType(_) => "UNKNOWN_TYPE",
            GqlError::FieldConflict { .. } => "FIELD_CONFLICT",
            GqlError::DepthLimit(_) => "DEPTH_LIMIT_EXCEEDED",
        }
    }

    /// Source location, when the error was raised while parsing.
    pub fn location(&self) -> Option<Location> {
        match self {
            GqlError::Parse { location, .. } => Some(*location),
            _ => None,
        }
    }
}

impl serde::Serialize for GqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GqlError::Schema("duplicate field \"id\"".to_string());
        assert_eq!(err.to_string(), "Schema error: duplicate field \"id\"");

        let err = GqlError::UnknownField {
            type_name: "Query".to_string(),
            field: "nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot query field \"nope\" on type \"Query\""
        );

        let err = GqlError::MissingArgument {
            argument: "id".to_string(),
            ty: "String!".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Argument \"id\" of required type \"String!\" was not provided"
        );

        let err = GqlError::SelectionRequired {
            field: "user".to_string(),
            ty: "UserType".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field \"user\" of type \"UserType\" must have a selection of subfields"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GqlError::Schema(String::new()).code(), "SCHEMA_ERROR");
        assert_eq!(GqlError::TypeCoercion(String::new()).code(), "TYPE_COERCION");
        assert_eq!(GqlError::resolver("boom").code(), "RESOLVER_ERROR");
        assert_eq!(
            GqlError::NullViolation("Query.user".to_string()).code(),
            "NULL_VIOLATION"
        );
        assert_eq!(GqlError::DepthLimit(64).code(), "DEPTH_LIMIT_EXCEEDED");
        let conflict = GqlError::FieldConflict {
            key: "x".to_string(),
            reason: "\"a\" and \"b\" are different fields".to_string(),
        };
        assert_eq!(conflict.code(), "FIELD_CONFLICT");
        assert!(conflict.to_string().starts_with("Fields \"x\" conflict because"));
    }

    #[test]
    fn test_parse_error_location() {
        let err = GqlError::Parse {
            message: "Unexpected \"}\"".to_string(),
            location: Location { line: 2, column: 5 },
        };
        assert_eq!(err.location(), Some(Location { line: 2, column: 5 }));
        assert_eq!(err.to_string(), "Syntax error: Unexpected \"}\"");
        assert!(GqlError::resolver("x").location().is_none());
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = GqlError::resolver("lookup failed");
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            "\"lookup failed\""
        );
    }
}
