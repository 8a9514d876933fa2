use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::error::ApiError;

/// JSON request body, with parse failures rendered as API errors.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON format: {e}")))?;
        Ok(Self(value))
    }
}
