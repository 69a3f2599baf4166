//! Execution results: the response envelope and field-level errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ast::Location;
use crate::error::GqlError;

/// One step of a response path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Error entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: Map::new(),
        }
    }

    /// Wrap an engine error, tagging it with its code and, when known, where
    /// in the document and in the response it happened.
    pub fn from_error(error: &GqlError, location: Option<Location>, path: Vec<PathSegment>) -> Self {
        let mut extensions = Map::new();
        extensions.insert("code".to_string(), Value::String(error.code().to_string()));
        Self {
            message: error.to_string(),
            locations: location.or_else(|| error.location()).into_iter().collect(),
            path,
            extensions,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(Value::as_str)
    }
}

/// A complete execution result. `errors` is omitted when empty; `data` is
/// absent only when the request failed before execution started.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn from_data(data: Value) -> Self {
        Self {
            errors: Vec::new(),
            data: Some(data),
        }
    }

    /// Request-level failure: no `data` key.
    pub fn from_error(error: GraphQLError) -> Self {
        Self {
            errors: vec![error],
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_only_response() {
        let response = Response::from_data(json!({"user": null}));
        assert_eq!(response.to_json(), json!({"data": {"user": null}}));
        assert!(response.is_ok());
    }

    #[test]
    fn test_errors_serialize_before_data() {
        let err = GqlError::UnknownField {
            type_name: "Query".to_string(),
            field: "nope".to_string(),
        };
        let response = Response {
            errors: vec![GraphQLError::from_error(
                &err,
                Some(Location { line: 1, column: 3 }),
                vec![PathSegment::Key("nope".to_string())],
            )],
            data: Some(json!({"nope": null})),
        };
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.starts_with("{\"errors\""));
        assert_eq!(
            response.to_json(),
            json!({
                "errors": [{
                    "message": "Cannot query field \"nope\" on type \"Query\"",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["nope"],
                    "extensions": {"code": "UNKNOWN_FIELD"}
                }],
                "data": {"nope": null}
            })
        );
    }

    #[test]
    fn test_request_error_has_no_data() {
        let err = GqlError::Parse {
            message: "Unexpected <EOF>".to_string(),
            location: Location { line: 1, column: 9 },
        };
        let response = Response::from_error(GraphQLError::from_error(&err, None, Vec::new()));
        let json = response.to_json();
        assert!(json.get("data").is_none());
        assert_eq!(json["errors"][0]["locations"], json!([{"line": 1, "column": 9}]));
        assert_eq!(response.errors[0].code(), Some("GRAPHQL_PARSE_FAILED"));
    }

    #[test]
    fn test_path_segments_untagged() {
        let path = vec![
            PathSegment::Key("users".to_string()),
            PathSegment::Index(2),
            PathSegment::Key("age".to_string()),
        ];
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["users", 2, "age"]));
    }
}
