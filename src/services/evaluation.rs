// src/services/evaluation.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        envelope::{Pagination, Wrapper},
        error::AppError,
        time::TimeFormatter,
    },
    db::{EvaluationRepository, JobRepository, UserRepository},
    models::evaluation::{
        CreateEvaluationPayload, Evaluation, EvaluationResponse, UpdateEvaluationPayload,
    },
    services::rating::{plain_average, RatingService},
};

// Prestador e serviço são imutáveis na avaliação: presença no payload é
// rejeitada mesmo com valores idênticos aos atuais.
fn ensure_only_mutable_fields(dto: &UpdateEvaluationPayload) -> Result<(), AppError> {
    if dto.professional_id.is_some() || dto.job_id.is_some() {
        return Err(AppError::bad_request(
            "Não é permitido alterar o prestador ou o serviço prestado.",
        ));
    }
    Ok(())
}

fn ensure_not_self_evaluation(customer_id: Uuid, professional_id: Uuid) -> Result<(), AppError> {
    if customer_id == professional_id {
        return Err(AppError::conflict("O profissional não pode se auto avaliar."));
    }
    Ok(())
}

#[derive(Clone)]
pub struct EvaluationService {
    repo: EvaluationRepository,
    user_repo: UserRepository,
    job_repo: JobRepository,
    rating: RatingService,
    pool: PgPool,
    time: TimeFormatter,
}

impl EvaluationService {
    pub fn new(
        repo: EvaluationRepository,
        user_repo: UserRepository,
        job_repo: JobRepository,
        rating: RatingService,
        pool: PgPool,
        time: TimeFormatter,
    ) -> Self {
        Self { repo, user_repo, job_repo, rating, pool, time }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        dto: CreateEvaluationPayload,
    ) -> Result<Wrapper<EvaluationResponse>, AppError> {
        // O prestador precisa existir antes de qualquer agregação.
        let professional = self
            .user_repo
            .find_by_id(dto.professional_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;

        ensure_not_self_evaluation(customer_id, dto.professional_id)?;

        // O serviço avaliado precisa pertencer ao prestador avaliado.
        self.job_repo
            .find_scoped(dto.professional_id, dto.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trabalho não localizado."))?;

        // Serializa a sequência lê-calcula-grava por prestador.
        let lock = self.rating.lock_for(professional.id);
        let _guard = lock.lock().await;

        let average = self
            .rating
            .average_with_new(professional.id, dto.rating)
            .await?;
        self.user_repo
            .update_rating(&self.pool, professional.id, average)
            .await?;

        tracing::info!("Saving evaluation...");
        let evaluation = self
            .repo
            .insert(
                &self.pool,
                professional.id,
                customer_id,
                dto.job_id,
                dto.rating,
                &dto.description,
            )
            .await?;
        tracing::info!("Saved.");

        Ok(Wrapper::created(self.mapper(evaluation)))
    }

    pub async fn find_all(
        &self,
        professional_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Wrapper<Vec<EvaluationResponse>>, AppError> {
        tracing::info!("Searching all evaluations by professional...");
        let total = self.repo.count_by_professional(professional_id).await?;
        let evaluations = self
            .repo
            .list_by_professional(professional_id, page, size)
            .await?;
        tracing::info!("Found.");

        if evaluations.is_empty() {
            return Ok(Wrapper::empty());
        }

        let pagination = Pagination::of(size, page, total);
        let data = evaluations.into_iter().map(|e| self.mapper(e)).collect();

        Ok(Wrapper::paginated(data, pagination))
    }

    pub async fn update(
        &self,
        customer_id: Uuid,
        id: Uuid,
        dto: UpdateEvaluationPayload,
    ) -> Result<Wrapper<EvaluationResponse>, AppError> {
        ensure_only_mutable_fields(&dto)?;

        // Escopo pelo cliente autor: não revela existência de avaliação alheia.
        let current = self.repo.find_scoped(id, customer_id).await?.ok_or_else(|| {
            AppError::not_found(
                "Avaliação não localizada ou você não possui permissão para alterá-la.",
            )
        })?;

        let lock = self.rating.lock_for(current.professional_id);
        let _guard = lock.lock().await;

        tracing::info!("Updating evaluation...");
        let updated = self
            .repo
            .update_scoped(&self.pool, id, customer_id, dto.rating, dto.description.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Avaliação não localizada ou você não possui permissão para alterá-la.",
                )
            })?;
        tracing::info!("Updated.");

        // A linha já carrega a nota nova, então a média simples do conjunto
        // atual equivale a excluir a nota antiga e recalcular.
        if dto.rating.is_some_and(|new_rating| new_rating != current.rating) {
            if let Some(average) = self.rating.current_average(current.professional_id).await? {
                self.user_repo
                    .update_rating(&self.pool, current.professional_id, average)
                    .await?;
            }
        }

        Ok(Wrapper::of(self.mapper(updated)))
    }

    pub async fn remove(&self, customer_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let current = self.repo.find_scoped(id, customer_id).await?.ok_or_else(|| {
            AppError::not_found(
                "Avaliação não localizada ou você não possui permissão para excluí-la.",
            )
        })?;

        let lock = self.rating.lock_for(current.professional_id);
        let _guard = lock.lock().await;

        tracing::info!("Removing evaluation...");
        let deleted = self
            .repo
            .delete_scoped(&self.pool, id, customer_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Avaliação não localizada ou você não possui permissão para excluí-la.",
                )
            })?;
        tracing::info!("Removed.");

        // Média do conjunto restante; sem avaliações restantes a nota
        // armazenada fica como estava.
        if let Some(average) = self.rating.current_average(deleted.professional_id).await? {
            self.user_repo
                .update_rating(&self.pool, deleted.professional_id, average)
                .await?;
        }

        Ok(())
    }

    // Remoção em massa usada só na exclusão da conta do prestador.
    // Único caminho sem o termo "+1 pendente": a média persistida é a do
    // próprio conjunto removido.
    pub async fn remove_all(&self, professional_id: Uuid) -> Result<(), AppError> {
        // A leitura do conjunto também fica sob o lock: uma criação
        // concorrente não pode entrar entre o snapshot e o delete.
        let lock = self.rating.lock_for(professional_id);
        let _guard = lock.lock().await;

        let evaluations = self.repo.list_all_by_professional(professional_id).await?;

        if evaluations.is_empty() {
            return Ok(());
        }

        self.repo
            .delete_by_professional(&self.pool, professional_id)
            .await?;

        let sum: i64 = evaluations.iter().map(|e| i64::from(e.rating)).sum();
        if let Some(average) = plain_average(sum, evaluations.len() as i64) {
            self.user_repo
                .update_rating(&self.pool, professional_id, average)
                .await?;
        }

        Ok(())
    }

    fn mapper(&self, evaluation: Evaluation) -> EvaluationResponse {
        EvaluationResponse {
            id: evaluation.id,
            customer_id: evaluation.customer_id,
            professional_id: evaluation.professional_id,
            job_id: evaluation.job_id,
            rating: evaluation.rating,
            description: evaluation.description,
            created_at: self.time.format(evaluation.created_at),
            updated_at: self.time.format(evaluation.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn update_rejects_professional_even_with_identical_value() {
        let dto = UpdateEvaluationPayload {
            professional_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = ensure_only_mutable_fields(&dto).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_rejects_job_even_with_identical_value() {
        let dto = UpdateEvaluationPayload {
            job_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = ensure_only_mutable_fields(&dto).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_with_rating_and_description_passes() {
        let dto = UpdateEvaluationPayload {
            rating: Some(4),
            description: Some("Ótimo serviço".to_string()),
            ..Default::default()
        };
        assert!(ensure_only_mutable_fields(&dto).is_ok());
    }

    #[test]
    fn self_evaluation_is_a_conflict() {
        let id = Uuid::new_v4();
        let err = ensure_not_self_evaluation(id, id).unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn distinct_customer_and_professional_pass() {
        assert!(ensure_not_self_evaluation(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }
}
