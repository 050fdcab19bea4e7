// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum InmueblarError {
    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("transformation failed: {0}")]
    Transformation(String),

    #[error("image processing error: {0}")]
    Image(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl InmueblarError {
    /// Message shown to the end user. The AI failure paths deliberately hide
    /// the diagnostic detail; that goes to the log only.
    pub fn user_message(&self) -> String {
        match self {
            InmueblarError::Analysis(_) => {
                "Error al analizar la imagen. Verifica tu API Key o intenta con otra foto."
                    .to_string()
            }
            InmueblarError::Transformation(_) => {
                "Error al generar la imagen. Intenta nuevamente.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for InmueblarError {
    fn status_code(&self) -> StatusCode {
        match self {
            InmueblarError::Analysis(_) | InmueblarError::Transformation(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            InmueblarError::Image(_) | InmueblarError::Validation(_) => StatusCode::BAD_REQUEST,
            InmueblarError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            InmueblarError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            InmueblarError::Analysis(_) => "Analysis failure",
            InmueblarError::Transformation(_) => "Transformation failure",
            InmueblarError::Image(_) => "Image processing error",
            InmueblarError::Validation(_) => "Validation error",
            InmueblarError::SessionNotFound(_) => "Session not found",
            InmueblarError::Serialization(_) => "Data processing error",
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": error,
            "message": self.user_message()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_failures_surface_generic_spanish_notice() {
        let err = InmueblarError::Analysis("quota exceeded for key".to_string());
        assert!(err.user_message().starts_with("Error al analizar la imagen"));
        assert!(!err.user_message().contains("quota"));

        let err = InmueblarError::Transformation("no image part".to_string());
        assert!(err.user_message().starts_with("Error al generar la imagen"));
    }

    #[test]
    fn status_codes_match_failure_kind() {
        assert_eq!(
            InmueblarError::Analysis(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            InmueblarError::Validation(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InmueblarError::SessionNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
