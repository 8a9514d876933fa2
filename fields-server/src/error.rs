use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use compound_fields::ValidationError;

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    BadRequest(String),
    NotFound(String),
}

impl ApiError {
    pub const fn to_status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code().as_str(),
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
        }
    }

    pub fn render_json(&self) -> Response {
        let status = self.to_status_code();
        let body = match self {
            Self::Validation(e) => json!({
                "code": self.code(),
                "message": "Validation failed",
                "errors": e.messages(),
            }),
            Self::BadRequest(message) | Self::NotFound(message) => json!({
                "code": self.code(),
                "message": message,
                "errors": {},
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::BadRequest(message) | Self::NotFound(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render_json()
    }
}
