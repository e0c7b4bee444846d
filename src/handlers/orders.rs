// src/handlers/orders.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        multipart::{parse_form, FormOptions},
    },
    config::AppState,
    handlers::PageQuery,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AsProfessional, RequireRole},
    },
    models::order::{CreateOrderPayload, OrderResponse, UpdateOrderPayload},
};

// Até 8 imagens do estado do local acompanham a ordem.
const ORDER_FORM: FormOptions<'static> = FormOptions {
    file_fields: &["images"],
    list_fields: &[],
    max_files: 8,
};

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body(content = CreateOrderPayload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Ordem de serviço criada", body = OrderResponse),
        (status = 409, description = "Não pode realizar a compra do próprio serviço")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (payload, files): (CreateOrderPayload, _) = parse_form(multipart, ORDER_FORM).await?;

    let wrapper = app_state
        .orders_service
        .create(current.user.id, payload, files)
        .await?;

    Ok((StatusCode::CREATED, Json(wrapper)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(PageQuery),
    responses(
        (status = 200, description = "Ordens do cliente, paginadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .orders_service
        .find_all(current.user.id, query.page, query.size)
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 200, description = "Ordem localizada", body = OrderResponse),
        (status = 404, description = "Ordem de serviço não localizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_one(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .orders_service
        .find_one(current.user.id, id)
        .await?;

    Ok(Json(wrapper))
}

// O prestador da ordem conduz o status até FINISHED ou CANCELED.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 200, description = "Status atualizado", body = OrderResponse),
        (status = 404, description = "Ordem de serviço não localizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    professional: RequireRole<AsProfessional>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .orders_service
        .update(professional.current.user.id, id, payload)
        .await?;

    Ok(Json(wrapper))
}
