// src/services/rating.rs

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{common::error::AppError, db::EvaluationRepository};

// A nota já chega restrita a [1, 5]; o clamp protege apenas contra
// deriva numérica da divisão.
pub fn clamp_rating(value: Decimal) -> Decimal {
    value.clamp(Decimal::from(1), Decimal::from(5))
}

// Média do conjunto existente mais uma nota pendente: (Σ + nova) / (n + 1).
// Sem avaliações anteriores, a média é a própria nota pendente.
pub fn average_with_pending(sum: i64, count: i64, pending: i32) -> Decimal {
    let total = Decimal::from(sum) + Decimal::from(pending);
    clamp_rating(total / Decimal::from(count + 1))
}

// Média simples do conjunto como está; indefinida para conjunto vazio
// (a nota armazenada fica como estava).
pub fn plain_average(sum: i64, count: i64) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(clamp_rating(Decimal::from(sum) / Decimal::from(count)))
}

// Agregador da média de notas de um prestador.
//
// A sequência lê-calcula-grava não é isolada pela transação do banco, então
// toda mutação de avaliação do mesmo prestador é serializada por um mutex
// por id, evitando o lost update entre requisições concorrentes.
#[derive(Clone)]
pub struct RatingService {
    repo: EvaluationRepository,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl RatingService {
    pub fn new(repo: EvaluationRepository) -> Self {
        Self {
            repo,
            locks: Arc::new(DashMap::new()),
        }
    }

    // O guard devolvido deve viver até a gravação da nova média.
    pub fn lock_for(&self, professional_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(professional_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Média considerando uma avaliação ainda não persistida.
    pub async fn average_with_new(
        &self,
        professional_id: Uuid,
        pending: i32,
    ) -> Result<Decimal, AppError> {
        let (sum, count) = self.repo.rating_stats(professional_id).await?;
        Ok(average_with_pending(sum, count, pending))
    }

    // Média do conjunto atual, usada após update/delete (a avaliação afetada
    // já saiu ou já carrega o valor novo — nada é contado em dobro).
    pub async fn current_average(
        &self,
        professional_id: Uuid,
    ) -> Result<Option<Decimal>, AppError> {
        let (sum, count) = self.repo.rating_stats(professional_id).await?;
        Ok(plain_average(sum, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_evaluation_average_is_the_rating_itself() {
        assert_eq!(average_with_pending(0, 0, 4), Decimal::from(4));
    }

    #[test]
    fn second_evaluation_averages_with_the_first() {
        // B avalia 4 e depois 2 em outro serviço: (4 + 2) / 2 = 3.
        assert_eq!(average_with_pending(4, 1, 2), Decimal::from(3));
    }

    #[test]
    fn pending_average_over_existing_set() {
        // Notas 5, 4, 3 mais pendente 4: 16 / 4 = 4.
        assert_eq!(average_with_pending(12, 3, 4), Decimal::from(4));
    }

    #[test]
    fn fractional_average_is_kept() {
        // (5 + 4) / 2 = 4.5
        assert_eq!(average_with_pending(5, 1, 4), Decimal::new(45, 1));
    }

    #[test]
    fn plain_average_of_remaining_set() {
        // removeAll com notas 4, 2, 3: média simples 3, sem termo pendente.
        assert_eq!(plain_average(9, 3), Some(Decimal::from(3)));
    }

    #[test]
    fn plain_average_is_undefined_for_empty_set() {
        assert_eq!(plain_average(0, 0), None);
    }

    #[test]
    fn clamp_holds_the_closed_interval() {
        assert_eq!(clamp_rating(Decimal::new(4, 1)), Decimal::from(1));
        assert_eq!(clamp_rating(Decimal::new(52, 1)), Decimal::from(5));
        assert_eq!(clamp_rating(Decimal::new(37, 1)), Decimal::new(37, 1));
    }
}
