use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error payload returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable category or validation message.
    pub error: String,
    /// Underlying diagnostic, present on server-side failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Build an error response with a JSON body.
pub fn problem(status: StatusCode, error: &str, detail: Option<String>) -> Response {
    let payload = ErrorBody {
        error: error.to_string(),
        detail,
    };

    (status, Json(payload)).into_response()
}

pub const DATABASE_ERROR: &str = "database error";
pub const INTERNAL_ERROR: &str = "internal server error";

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn given_detail_when_problem_should_render_error_and_detail() {
        let response = problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            DATABASE_ERROR,
            Some("connection refused".to_string()),
        );

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "database error", "detail": "connection refused"})
        );
    }

    #[tokio::test]
    async fn given_no_detail_when_problem_should_omit_detail_field() {
        let response = problem(StatusCode::BAD_REQUEST, "bad input", None);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "bad input"}));
    }
}
