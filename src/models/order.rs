// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_form", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentForm {
    CreditCard,
    DebitCard,
    Pix,
    Cash,
    BankSlip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Scheduled,
    InProgress,
    Finished,
    Canceled,
}

// Ordem de serviço como está no banco; as referências a cliente,
// prestador e serviço são imutáveis após a criação.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub professional_id: Uuid,
    pub job_id: Uuid,
    pub payment_form: PaymentForm,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    // Preço congelado no momento da compra.
    pub total: Decimal,
    pub finished_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub service_order_id: Uuid,
    pub image_url: String,
}

// Ordem hidratada com os nomes das pontas e a descrição do serviço.
#[derive(Debug, Clone, FromRow)]
pub struct OrderDetail {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub professional_id: Uuid,
    pub job_id: Uuid,
    pub payment_form: PaymentForm,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub total: Decimal,
    pub finished_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub professional_first_name: String,
    pub professional_last_name: String,
    pub job_description: String,
}

// Campos de texto do multipart de criação de ordem.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub professional_id: Uuid,
    pub job_id: Uuid,
    pub payment_form: PaymentForm,
}

// Só o status da ordem é mutável depois da criação.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub order_status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer: String,
    pub professional: String,
    pub service: String,
    pub order_status: OrderStatus,
    pub payment_form: PaymentForm,
    pub payment_status: PaymentStatus,
    pub total: Decimal,
    pub images_url: Vec<ImageResponse>,
    pub finish_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
