// src/db/job_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::job::{Job, JobCategory},
};

const JOB_COLUMNS: &str = "id, user_id, description, total, category";

// Repositório do catálogo de serviços anunciados.
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        description: &str,
        total: Decimal,
        category: JobCategory,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (user_id, description, total, category) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(user_id)
        .bind(description)
        .bind(total)
        .bind(category)
        .fetch_one(executor)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    // Busca escopada ao dono: serviço de outro prestador "não existe".
    pub async fn find_scoped(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE user_id = $1 \
             ORDER BY description LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_by_owner<'e, E>(&self, executor: E, owner_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM jobs WHERE user_id = $1")
            .bind(owner_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
