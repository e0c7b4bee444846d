// src/models/job.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobCategory {
    Electrical,
    Plumbing,
    Painting,
    Cleaning,
    Gardening,
    Carpentry,
    Renovation,
    Other,
}

// Representa um serviço anunciado por um prestador
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub total: Decimal,
    pub category: JobCategory,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 255, message = "Descrição obrigatória"))]
    #[schema(example = "Instalação de chuveiro elétrico")]
    pub description: String,

    #[schema(example = "100.00")]
    pub total: Decimal,

    pub category: JobCategory,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub description: String,
    pub total: Decimal,
    pub category: JobCategory,
}

impl JobResponse {
    pub fn from_job(job: Job) -> Self {
        Self {
            id: job.id,
            professional_id: job.user_id,
            description: job.description,
            total: job.total,
            category: job.category,
        }
    }
}
