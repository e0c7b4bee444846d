// src/services/orders.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        envelope::{Pagination, Wrapper},
        error::AppError,
        storage::{object_key, validate_upload, ObjectStorage, UploadedFile},
        time::TimeFormatter,
    },
    db::{JobRepository, OrderRepository, UserRepository},
    models::order::{
        CreateOrderPayload, Image, ImageResponse, OrderDetail, OrderResponse, OrderStatus,
        PaymentStatus, UpdateOrderPayload,
    },
};

const ORDER_IMAGE_PREFIX: &str = "images/orders";

// Só a transição para FINISHED gera carimbo; o banco preserva o primeiro.
fn finish_stamp(order_status: OrderStatus) -> Option<DateTime<Utc>> {
    matches!(order_status, OrderStatus::Finished).then(Utc::now)
}

#[derive(Clone)]
pub struct OrdersService {
    repo: OrderRepository,
    user_repo: UserRepository,
    job_repo: JobRepository,
    storage: Arc<dyn ObjectStorage>,
    pool: PgPool,
    time: TimeFormatter,
}

impl OrdersService {
    pub fn new(
        repo: OrderRepository,
        user_repo: UserRepository,
        job_repo: JobRepository,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
        time: TimeFormatter,
    ) -> Self {
        Self { repo, user_repo, job_repo, storage, pool, time }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        dto: CreateOrderPayload,
        files: Vec<UploadedFile>,
    ) -> Result<Wrapper<OrderResponse>, AppError> {
        if customer_id == dto.professional_id {
            return Err(AppError::conflict(
                "Não pode realizar a compra do próprio serviço.",
            ));
        }

        self.user_repo
            .find_by_id(dto.professional_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;

        // O serviço comprado precisa pertencer ao prestador indicado.
        let job = self
            .job_repo
            .find_scoped(dto.professional_id, dto.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trabalho não localizado."))?;

        // Valida todos os arquivos antes de subir qualquer um.
        for file in &files {
            validate_upload(file)?;
        }

        let image_urls = self.upload_all(&files).await?;

        let mut tx = self.pool.begin().await?;

        tracing::info!("Saving service order...");
        let order = self
            .repo
            .insert(
                &mut *tx,
                customer_id,
                dto.professional_id,
                dto.job_id,
                dto.payment_form,
                PaymentStatus::Pending,
                OrderStatus::Scheduled,
                job.total,
            )
            .await?;

        for url in &image_urls {
            self.repo.insert_image(&mut *tx, order.id, url).await?;
        }

        tx.commit().await?;
        tracing::info!("Saved.");

        let detail = self
            .repo
            .find_detail(order.id)
            .await?
            .ok_or_else(|| AppError::not_found("Ordem de serviço não localizada."))?;
        let images = self.repo.list_images(order.id).await?;

        Ok(Wrapper::created(self.map_result(detail, images)))
    }

    pub async fn find_all(
        &self,
        customer_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Wrapper<Vec<OrderResponse>>, AppError> {
        tracing::info!("Searching service orders...");
        let total = self.repo.count_by_customer(customer_id).await?;
        let details = self
            .repo
            .list_details_by_customer(customer_id, page, size)
            .await?;
        tracing::info!("Found.");

        if details.is_empty() {
            return Ok(Wrapper::empty());
        }

        let mut data = Vec::with_capacity(details.len());
        for detail in details {
            let images = self.repo.list_images(detail.id).await?;
            data.push(self.map_result(detail, images));
        }

        let pagination = Pagination::of(size, page, total);
        Ok(Wrapper::paginated(data, pagination))
    }

    pub async fn find_one(
        &self,
        customer_id: Uuid,
        id: Uuid,
    ) -> Result<Wrapper<OrderResponse>, AppError> {
        let detail = self
            .repo
            .find_detail_scoped(id, customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ordem de serviço não localizada."))?;
        let images = self.repo.list_images(detail.id).await?;

        Ok(Wrapper::of(self.map_result(detail, images)))
    }

    // Só o prestador da ordem altera o status; FINISHED congela a data de
    // conclusão na primeira vez.
    pub async fn update(
        &self,
        professional_id: Uuid,
        id: Uuid,
        dto: UpdateOrderPayload,
    ) -> Result<Wrapper<OrderResponse>, AppError> {
        let finished_date = finish_stamp(dto.order_status);

        tracing::info!("Updating service order...");
        let order = self
            .repo
            .update_status_scoped(id, professional_id, dto.order_status, finished_date)
            .await?
            .ok_or_else(|| AppError::not_found("Ordem de serviço não localizada."))?;
        tracing::info!("Updated.");

        let detail = self
            .repo
            .find_detail(order.id)
            .await?
            .ok_or_else(|| AppError::not_found("Ordem de serviço não localizada."))?;
        let images = self.repo.list_images(order.id).await?;

        Ok(Wrapper::of(self.map_result(detail, images)))
    }

    // Sobe tudo ou nada: se alguma subida falhar, as anteriores são
    // removidas em melhor esforço antes de propagar o erro.
    async fn upload_all(&self, files: &[UploadedFile]) -> Result<Vec<String>, AppError> {
        let mut uploaded: Vec<(String, String)> = Vec::with_capacity(files.len());

        for file in files {
            let key = object_key(ORDER_IMAGE_PREFIX, &file.file_name);

            tracing::info!("Uploading order image...");
            match self.storage.put(&key, &file.bytes, &file.content_type).await {
                Ok(url) => uploaded.push((key, url)),
                Err(e) => {
                    for (key, _) in &uploaded {
                        if let Err(cleanup) = self.storage.delete(key).await {
                            tracing::warn!("Falha ao remover upload órfão {}: {}", key, cleanup);
                        }
                    }
                    return Err(e);
                }
            }
        }
        tracing::info!("Finished.");

        Ok(uploaded.into_iter().map(|(_, url)| url).collect())
    }

    fn map_result(&self, detail: OrderDetail, images: Vec<Image>) -> OrderResponse {
        OrderResponse {
            id: detail.id,
            customer: format!("{} {}", detail.customer_first_name, detail.customer_last_name),
            professional: format!(
                "{} {}",
                detail.professional_first_name, detail.professional_last_name
            ),
            service: detail.job_description,
            order_status: detail.order_status,
            payment_form: detail.payment_form,
            payment_status: detail.payment_status,
            total: detail.total,
            images_url: images
                .into_iter()
                .map(|i| ImageResponse { image_url: i.image_url })
                .collect(),
            finish_date: self.time.format_opt(detail.finished_date),
            created_at: self.time.format(detail.created_at),
            updated_at: self.time.format(detail.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_finished_produces_a_stamp() {
        assert!(finish_stamp(OrderStatus::Finished).is_some());
        assert!(finish_stamp(OrderStatus::Scheduled).is_none());
        assert!(finish_stamp(OrderStatus::InProgress).is_none());
        assert!(finish_stamp(OrderStatus::Canceled).is_none());
    }
}
