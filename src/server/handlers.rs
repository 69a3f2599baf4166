use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use minigql_core::{Executor, Request, Response, Variables};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub executor: Executor,
    pub config: Arc<ServerConfig>,
}

// ==================== Request Types ====================

/// Query-string form of a request: `?query=..&operationName=..&variables=..`
/// with `variables` as a JSON-encoded object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphQLParams {
    pub query: Option<String>,
    pub operation_name: Option<String>,
    pub variables: Option<String>,
}

impl GraphQLParams {
    fn into_request(self) -> AppResult<Request> {
        let mut request = Request::new(self.query.unwrap_or_default());
        request.operation_name = self.operation_name;
        if let Some(raw) = self.variables.filter(|v| !v.trim().is_empty()) {
            let variables: Variables = serde_json::from_str(&raw)?;
            request.variables = Some(variables);
        }
        Ok(request)
    }
}

// ==================== GraphQL Handlers ====================

/// The body is read as JSON whatever the declared content type.
pub async fn graphql_post(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<Response>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("request body is empty".to_string()));
    }
    let request: Request = serde_json::from_slice(&body)?;
    execute(&state, request).await
}

pub async fn graphql_get(
    State(state): State<AppState>,
    Query(params): Query<GraphQLParams>,
) -> AppResult<Json<Response>> {
    let request = params.into_request()?;
    execute(&state, request).await
}

async fn execute(state: &AppState, request: Request) -> AppResult<Json<Response>> {
    if request.query.trim().is_empty() {
        return Err(AppError::BadRequest("Must provide query string".to_string()));
    }

    tracing::debug!(
        operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
        "graphql request"
    );
    let response = state.executor.execute(request).await;
    if !response.errors.is_empty() {
        tracing::debug!(errors = response.errors.len(), "graphql response has errors");
    }
    Ok(Json(response))
}

// ==================== Health ====================

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "route": state.config.route,
        "schemaStyle": state.config.schema_style,
    }))
}
