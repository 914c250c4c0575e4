use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{dto::InvalidDate, repository::RepositoryError};

/// Failure of a REST call, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, path or query (422)
    Validation(String),
    /// No note with the requested id (404)
    NotFound,
    /// Insert rejected by a uniqueness constraint (400)
    Conflict,
    /// Any other store failure (500, logged)
    Internal(RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            Self::NotFound => (StatusCode::NOT_FOUND, "Note not found".to_string()),
            Self::Conflict => (StatusCode::BAD_REQUEST, "Note already exists".to_string()),
            Self::Internal(e) => {
                tracing::error!("request failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict => Self::Conflict,
            RepositoryError::Database(_) => Self::Internal(e),
        }
    }
}

impl From<InvalidDate> for ApiError {
    fn from(e: InvalidDate) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = render(ApiError::NotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Note not found"}));
    }

    #[tokio::test]
    async fn store_conflict_is_400() {
        let (status, body) = render(RepositoryError::Conflict.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "Note already exists"}));
    }

    #[tokio::test]
    async fn invalid_date_is_422() {
        let (status, body) = render(InvalidDate("soon".to_string()).into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["detail"],
            "created_at must be a date in YYYY-MM-DD format, got 'soon'"
        );
    }
}
