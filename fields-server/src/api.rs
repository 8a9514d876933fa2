use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};

use compound_fields::Schema;

use crate::error::ApiError;
use crate::extractors::JsonBody;

#[derive(Clone)]
pub struct AppState {
    schemas: Arc<BTreeMap<String, Schema>>,
}

impl AppState {
    pub fn new(schemas: BTreeMap<String, Schema>) -> Self {
        Self {
            schemas: Arc::new(schemas),
        }
    }
}

// List declared schema names
async fn list_schemas(State(state): State<AppState>) -> impl IntoResponse {
    let names: Vec<&str> = state.schemas.keys().map(String::as_str).collect();
    (StatusCode::OK, Json(names)).into_response()
}

// Describe the fields of one schema
async fn get_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let Some(schema) = state.schemas.get(&name) else {
        warn!(schema = %name, "unknown schema requested");
        return ApiError::NotFound(format!("Schema '{name}' not found")).into_response();
    };

    let body = json!({
        "name": schema.name(),
        "fields": schema.describe(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

// Validate a document against a schema and return its normalized form
async fn validate_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody,
) -> impl IntoResponse {
    let Some(schema) = state.schemas.get(&name) else {
        warn!(schema = %name, "unknown schema requested");
        return ApiError::NotFound(format!("Schema '{name}' not found")).into_response();
    };

    match schema.validate(&body) {
        Ok(data) => {
            info!(schema = %name, fields = data.len(), "document validated");
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => {
            info!(schema = %name, error = %e, "document rejected");
            ApiError::from(e).into_response()
        }
    }
}

pub fn create_router(schemas: BTreeMap<String, Schema>) -> Router {
    let state = AppState::new(schemas);

    Router::new()
        .route("/v1/schemas", get(list_schemas))
        .route("/v1/schemas/{name}", get(get_schema))
        .route("/v1/schemas/{name}/validate", post(validate_document))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::Response;
    use compound_fields::{CharField, IntegerField, ListOrItemField};
    use serde_json::Value;

    fn state() -> AppState {
        let schema = Schema::new("event")
            .field(
                "tags",
                ListOrItemField::new(CharField::new().max_length(5)).label("Tags"),
            )
            .field("count", IntegerField::new().required(false));
        let mut schemas = BTreeMap::new();
        schemas.insert("event".to_string(), schema);
        AppState::new(schemas)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn validate(body: Value) -> Response {
        validate_document(
            State(state()),
            Path("event".to_string()),
            JsonBody(body),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn test_list_schemas() {
        let response = list_schemas(State(state())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["event"]));
    }

    #[tokio::test]
    async fn test_get_schema_describes_fields() {
        let response = get_schema(State(state()), Path("event".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "name": "event",
                "fields": [
                    {"name": "tags", "kind": "list-or-item<char>", "required": true, "label": "Tags"},
                    {"name": "count", "kind": "integer", "required": false},
                ],
            })
        );
    }

    #[tokio::test]
    async fn test_get_unknown_schema() {
        let response = get_schema(State(state()), Path("nope".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_scalar() {
        let response = validate(json!({"tags": "12345", "count": "3"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"tags": "12345", "count": 3})
        );
    }

    #[tokio::test]
    async fn test_validate_list() {
        let response = validate(json!({"tags": ["12345", "abcde"]})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"tags": ["12345", "abcde"]}));
    }

    #[tokio::test]
    async fn test_validate_list_reports_failing_index() {
        let response = validate(json!({"tags": ["12345", "123456"]})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], json!("invalid"));
        let tag_errors = body["errors"]["tags"].as_object().unwrap();
        assert_eq!(tag_errors.keys().collect::<Vec<_>>(), vec!["1"]);
        assert_eq!(tag_errors["1"][0]["code"], json!("max_length"));
    }

    #[tokio::test]
    async fn test_validate_missing_required() {
        let response = validate(json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"]["tags"][0]["code"], json!("required"));
    }

    #[tokio::test]
    async fn test_unknown_schema() {
        let response = validate_document(
            State(state()),
            Path("nope".to_string()),
            JsonBody(json!({})),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], json!("not_found"));
    }
}
