// src/models/evaluation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Avaliação deixada por um cliente sobre um prestador para um serviço.
// As colunas de referência são ids "soltos": a integridade com users/jobs
// é garantida pelas checagens de aplicação, não por foreign key.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub customer_id: Uuid,
    pub job_id: Uuid,
    pub rating: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvaluationPayload {
    pub professional_id: Uuid,
    pub job_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Nota de avaliação deve estar entre 1 e 5"))]
    #[schema(example = 4)]
    pub rating: i32,

    #[validate(length(min = 1, message = "Descrição obrigatória"))]
    pub description: String,
}

// Só nota e descrição são mutáveis; prestador/serviço presentes no payload
// são rejeitados mesmo que idênticos aos valores atuais.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvaluationPayload {
    pub professional_id: Option<Uuid>,
    pub job_id: Option<Uuid>,

    #[validate(range(min = 1, max = 5, message = "Nota de avaliação deve estar entre 1 e 5"))]
    pub rating: Option<i32>,

    #[validate(length(min = 1, message = "Descrição obrigatória"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub professional_id: Uuid,
    pub job_id: Uuid,
    pub rating: i32,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}
