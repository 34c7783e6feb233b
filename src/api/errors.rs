//! Error conversion from CoachError to HTTP responses

use crate::error::CoachError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            CoachError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "details": details }),
            ),
            CoachError::Configuration(msg) => {
                warn!("Refusing essay request: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            CoachError::Provider(msg) => {
                error!("Provider call failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            other => {
                error!("Essay request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": other.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_request;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let errors = validate_request(&json!({})).unwrap_err();
        let response = CoachError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request");
        assert_eq!(body["details"]["fieldErrors"]["unitId"], json!(["Required"]));
    }

    #[tokio::test]
    async fn test_configuration_maps_to_500() {
        let response =
            CoachError::Configuration("Missing OPENAI_API_KEY".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing OPENAI_API_KEY" })
        );
    }

    #[tokio::test]
    async fn test_provider_message_passes_through() {
        let response = CoachError::Provider("OpenAI request failed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "OpenAI request failed" })
        );
    }
}
