// src/handlers/evaluation.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AsCustomer, RequireRole},
    models::evaluation::{CreateEvaluationPayload, EvaluationResponse, UpdateEvaluationPayload},
};

// A listagem é pública e indica o prestador avaliado na consulta.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationQuery {
    pub professional_id: Uuid,
    #[serde(
        default = "crate::handlers::default_page",
        deserialize_with = "crate::handlers::de_page"
    )]
    pub page: i64,
    #[serde(
        default = "crate::handlers::default_size",
        deserialize_with = "crate::handlers::de_size"
    )]
    pub size: i64,
}

#[utoipa::path(
    post,
    path = "/api/evaluations",
    tag = "Evaluations",
    request_body = CreateEvaluationPayload,
    responses(
        (status = 201, description = "Avaliação registrada", body = EvaluationResponse),
        (status = 409, description = "O profissional não pode se auto avaliar")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    customer: RequireRole<AsCustomer>,
    Json(payload): Json<CreateEvaluationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let wrapper = app_state
        .evaluation_service
        .create(customer.current.user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(wrapper)))
}

#[utoipa::path(
    get,
    path = "/api/evaluations",
    tag = "Evaluations",
    params(EvaluationQuery),
    responses(
        (status = 200, description = "Avaliações do prestador, paginadas")
    )
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    Query(query): Query<EvaluationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .evaluation_service
        .find_all(query.professional_id, query.page, query.size)
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    patch,
    path = "/api/evaluations/{id}",
    tag = "Evaluations",
    request_body = UpdateEvaluationPayload,
    params(("id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação atualizada", body = EvaluationResponse),
        (status = 400, description = "Não é permitido alterar o prestador ou o serviço prestado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    customer: RequireRole<AsCustomer>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEvaluationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let wrapper = app_state
        .evaluation_service
        .update(customer.current.user.id, id, payload)
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    delete,
    path = "/api/evaluations/{id}",
    tag = "Evaluations",
    params(("id" = Uuid, Path, description = "ID da avaliação")),
    responses(
        (status = 204, description = "Avaliação removida"),
        (status = 404, description = "Avaliação não localizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    customer: RequireRole<AsCustomer>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .evaluation_service
        .remove(customer.current.user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
