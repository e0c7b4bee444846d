// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::common::envelope::{Metadata, Wrapper};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Erros de regra de negócio carregam o metadata do envelope já montado,
// assim um único handler de fronteira converte tudo para o formato de rede.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de negócio: {}", .0.message)]
    Business(Metadata),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro ao ler multipart: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Business(Metadata::of(StatusCode::BAD_REQUEST, message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Business(Metadata::of(StatusCode::UNAUTHORIZED, message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Business(Metadata::of(StatusCode::FORBIDDEN, message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Business(Metadata::of(StatusCode::NOT_FOUND, message))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Business(Metadata::of(StatusCode::CONFLICT, message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Business(metadata) => StatusCode::from_u16(metadata.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::ValidationError(_) | Self::MultipartError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Junta as mensagens de todos os campos inválidos numa frase só.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut details: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            match &error.message {
                Some(message) => details.push(message.to_string()),
                None => details.push(field.to_string()),
            }
        }
    }
    details.sort();
    format!(
        "Os seguintes campos são inválidos ou estão faltando: {}",
        details.join(", ")
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let metadata = match self {
            AppError::Business(metadata) => metadata,

            AppError::ValidationError(errors) => {
                Metadata::of(StatusCode::BAD_REQUEST, validation_message(&errors))
            }

            AppError::MultipartError(e) => Metadata::of(
                StatusCode::BAD_REQUEST,
                format!("Requisição multipart inválida: {}", e),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                Metadata::of(StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let status = StatusCode::from_u16(metadata.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(Wrapper::<serde_json::Value> {
            data: None,
            metadata,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Descrição obrigatória"))]
        description: String,
        #[validate(range(min = 1, max = 5, message = "Nota deve estar entre 1 e 5"))]
        rating: i32,
    }

    #[test]
    fn business_helpers_carry_expected_status() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn business_metadata_keeps_message_and_status_text() {
        let err = AppError::conflict("O profissional não pode se auto avaliar.");
        match err {
            AppError::Business(metadata) => {
                assert_eq!(metadata.status, 409);
                assert_eq!(metadata.status_text, "Conflict");
                assert_eq!(metadata.message, "O profissional não pode se auto avaliar.");
            }
            _ => panic!("esperava variante Business"),
        }
    }

    #[test]
    fn validation_message_lists_every_invalid_field() {
        let payload = Payload {
            description: String::new(),
            rating: 9,
        };
        let errors = payload.validate().unwrap_err();
        let message = validation_message(&errors);

        assert!(message.starts_with("Os seguintes campos são inválidos ou estão faltando:"));
        assert!(message.contains("Descrição obrigatória"));
        assert!(message.contains("Nota deve estar entre 1 e 5"));
    }
}
