//! Gateway error taxonomy and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use config_rs::ConfigError;

use crate::llm_client::LLMError;
use crate::models::ErrorResponse;
use crate::validation::ApiValidationError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Startup cannot proceed, e.g. the API key is missing
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Malformed body, rejected before the model is called
    #[error("Validation error: {0}")]
    Validation(#[from] ApiValidationError),

    /// The model call failed; the message is the upstream error's description
    #[error("{0}")]
    Upstream(#[from] LLMError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(err) => err.status_code(),
            Self::Configuration(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => err.into_response(),
            other => (
                other.status_code(),
                Json(ErrorResponse {
                    detail: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upstream_error_maps_to_500_detail() {
        let err = GatewayError::from(LLMError::ServerError("(503) overloaded".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Server error: (503) overloaded");
    }

    #[test]
    fn test_validation_error_keeps_its_status() {
        let err = GatewayError::from(ApiValidationError::Schema(vec![
            "\"policy_text\" is a required property".to_string(),
        ]));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_configuration_error_message() {
        let err = GatewayError::from(ConfigError::Missing("GOOGLE_API_KEY".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable GOOGLE_API_KEY"
        );
    }
}
