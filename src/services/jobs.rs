// src/services/jobs.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        envelope::{Pagination, Wrapper},
        error::AppError,
    },
    db::JobRepository,
    models::job::{CreateJobPayload, JobResponse},
};

#[derive(Clone)]
pub struct JobsService {
    repo: JobRepository,
    pool: PgPool,
}

impl JobsService {
    pub fn new(repo: JobRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(
        &self,
        professional_id: Uuid,
        dto: CreateJobPayload,
    ) -> Result<Wrapper<JobResponse>, AppError> {
        tracing::info!("Saving job...");
        let job = self
            .repo
            .insert(
                &self.pool,
                professional_id,
                &dto.description,
                dto.total,
                dto.category,
            )
            .await?;
        tracing::info!("Saved.");

        Ok(Wrapper::created(JobResponse::from_job(job)))
    }

    // Listagem pública do catálogo de um prestador.
    pub async fn find_all(
        &self,
        professional_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Wrapper<Vec<JobResponse>>, AppError> {
        tracing::info!("Searching jobs...");
        let total = self.repo.count_by_owner(professional_id).await?;
        let jobs = self.repo.list_by_owner(professional_id, page, size).await?;
        tracing::info!("Found.");

        if jobs.is_empty() {
            return Ok(Wrapper::empty());
        }

        let pagination = Pagination::of(size, page, total);
        let data = jobs.into_iter().map(JobResponse::from_job).collect();

        Ok(Wrapper::paginated(data, pagination))
    }

    // Escopada ao prestador indicado na consulta.
    pub async fn find_one(
        &self,
        professional_id: Uuid,
        id: Uuid,
    ) -> Result<Wrapper<JobResponse>, AppError> {
        let job = self
            .repo
            .find_scoped(professional_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Trabalho não localizado."))?;

        Ok(Wrapper::of(JobResponse::from_job(job)))
    }

    pub async fn remove(&self, acting_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Trabalho não localizado."))?;

        // Aqui a existência é pública, então a resposta distingue
        // "não existe" de "não é seu".
        if job.user_id != acting_id {
            return Err(AppError::forbidden(
                "Usuário sem permissão para efetuar esta tarefa.",
            ));
        }

        tracing::info!("Removing job with id: {}", job.id);
        self.repo.delete(&self.pool, job.id).await?;
        tracing::info!("Removed.");

        Ok(())
    }
}
