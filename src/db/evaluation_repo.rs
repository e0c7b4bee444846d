// src/db/evaluation_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::evaluation::Evaluation};

const EVALUATION_COLUMNS: &str =
    "id, professional_id, customer_id, job_id, rating, description, created_at, updated_at";

// Repositório das avaliações. As colunas de referência não têm foreign key:
// a integridade com users/jobs é responsabilidade do serviço.
#[derive(Clone)]
pub struct EvaluationRepository {
    pool: PgPool,
}

impl EvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        professional_id: Uuid,
        customer_id: Uuid,
        job_id: Uuid,
        rating: i32,
        description: &str,
    ) -> Result<Evaluation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "INSERT INTO evaluations (professional_id, customer_id, job_id, rating, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(professional_id)
        .bind(customer_id)
        .bind(job_id)
        .bind(rating)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(evaluation)
    }

    // Ordenação de inserção.
    pub async fn list_by_professional(
        &self,
        professional_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Vec<Evaluation>, AppError> {
        let evaluations = sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE professional_id = $1 \
             ORDER BY created_at LIMIT $2 OFFSET $3"
        ))
        .bind(professional_id)
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&self.pool)
        .await?;
        Ok(evaluations)
    }

    pub async fn list_all_by_professional(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError> {
        let evaluations = sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE professional_id = $1 \
             ORDER BY created_at"
        ))
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(evaluations)
    }

    pub async fn count_by_professional(&self, professional_id: Uuid) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM evaluations WHERE professional_id = $1")
                .bind(professional_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    // Soma e quantidade numa leitura só, insumo do agregador de notas.
    pub async fn rating_stats(&self, professional_id: Uuid) -> Result<(i64, i64), AppError> {
        let stats: (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(rating), 0), COUNT(*) \
             FROM evaluations WHERE professional_id = $1",
        )
        .bind(professional_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    // Escopada ao cliente autor: avaliação alheia "não existe".
    pub async fn find_scoped(
        &self,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Evaluation>, AppError> {
        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE id = $1 AND customer_id = $2"
        ))
        .bind(id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(evaluation)
    }

    pub async fn update_scoped<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
        rating: Option<i32>,
        description: Option<&str>,
    ) -> Result<Option<Evaluation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "UPDATE evaluations SET \
                 rating = COALESCE($3, rating), \
                 description = COALESCE($4, description), \
                 updated_at = NOW() \
             WHERE id = $1 AND customer_id = $2 \
             RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(id)
        .bind(customer_id)
        .bind(rating)
        .bind(description)
        .fetch_optional(executor)
        .await?;
        Ok(evaluation)
    }

    pub async fn delete_scoped<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Evaluation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "DELETE FROM evaluations WHERE id = $1 AND customer_id = $2 \
             RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(id)
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(evaluation)
    }

    pub async fn delete_by_professional<'e, E>(
        &self,
        executor: E,
        professional_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM evaluations WHERE professional_id = $1")
            .bind(professional_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
