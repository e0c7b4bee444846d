// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{Image, OrderDetail, OrderStatus, PaymentForm, PaymentStatus, ServiceOrder},
};

const ORDER_COLUMNS: &str = "id, customer_id, professional_id, job_id, payment_form, \
     payment_status, order_status, total, finished_date, created_at, updated_at";

// Seleção hidratada: ordem + nomes das pontas + descrição do serviço.
const DETAIL_SELECT: &str = "SELECT o.id, o.customer_id, o.professional_id, o.job_id, \
         o.payment_form, o.payment_status, o.order_status, o.total, o.finished_date, \
         o.created_at, o.updated_at, \
         c.first_name AS customer_first_name, c.last_name AS customer_last_name, \
         p.first_name AS professional_first_name, p.last_name AS professional_last_name, \
         j.description AS job_description \
     FROM service_orders o \
     JOIN users c ON c.id = o.customer_id \
     JOIN users p ON p.id = o.professional_id \
     JOIN jobs j ON j.id = o.job_id";

// Repositório das ordens de serviço e suas imagens.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        professional_id: Uuid,
        job_id: Uuid,
        payment_form: PaymentForm,
        payment_status: PaymentStatus,
        order_status: OrderStatus,
        total: Decimal,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "INSERT INTO service_orders \
                 (customer_id, professional_id, job_id, payment_form, payment_status, \
                  order_status, total) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(professional_id)
        .bind(job_id)
        .bind(payment_form)
        .bind(payment_status)
        .bind(order_status)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn insert_image<'e, E>(
        &self,
        executor: E,
        service_order_id: Uuid,
        image_url: &str,
    ) -> Result<Image, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image = sqlx::query_as::<_, Image>(
            "INSERT INTO images (service_order_id, image_url) \
             VALUES ($1, $2) \
             RETURNING id, service_order_id, image_url",
        )
        .bind(service_order_id)
        .bind(image_url)
        .fetch_one(executor)
        .await?;

        Ok(image)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError> {
        let detail = sqlx::query_as::<_, OrderDetail>(&format!("{DETAIL_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    // Escopada ao cliente: ordem alheia "não existe".
    pub async fn find_detail_scoped(
        &self,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<OrderDetail>, AppError> {
        let detail = sqlx::query_as::<_, OrderDetail>(&format!(
            "{DETAIL_SELECT} WHERE o.id = $1 AND o.customer_id = $2"
        ))
        .bind(id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(detail)
    }

    pub async fn list_details_by_customer(
        &self,
        customer_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<Vec<OrderDetail>, AppError> {
        let details = sqlx::query_as::<_, OrderDetail>(&format!(
            "{DETAIL_SELECT} WHERE o.customer_id = $1 \
             ORDER BY o.created_at LIMIT $2 OFFSET $3"
        ))
        .bind(customer_id)
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&self.pool)
        .await?;
        Ok(details)
    }

    pub async fn count_by_customer(&self, customer_id: Uuid) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM service_orders WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn list_images(&self, service_order_id: Uuid) -> Result<Vec<Image>, AppError> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT id, service_order_id, image_url FROM images \
             WHERE service_order_id = $1 ORDER BY id",
        )
        .bind(service_order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    // Só o status (e a data de conclusão) mudam; escopado ao prestador da
    // ordem. O primeiro carimbo de conclusão é preservado.
    pub async fn update_status_scoped(
        &self,
        id: Uuid,
        professional_id: Uuid,
        order_status: OrderStatus,
        finished_date: Option<DateTime<Utc>>,
    ) -> Result<Option<ServiceOrder>, AppError> {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "UPDATE service_orders SET \
                 order_status = $3, \
                 finished_date = COALESCE(finished_date, $4), \
                 updated_at = NOW() \
             WHERE id = $1 AND professional_id = $2 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(professional_id)
        .bind(order_status)
        .bind(finished_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    // Remove as ordens em que o usuário participa de qualquer ponta;
    // as imagens caem junto por cascata.
    pub async fn delete_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM service_orders WHERE customer_id = $1 OR professional_id = $1")
                .bind(user_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
