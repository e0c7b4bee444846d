// src/handlers/jobs.rs

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
    middleware::rbac::{AsProfessional, RequireRole},
    models::job::{CreateJobPayload, JobResponse},
};

// Listagens do catálogo são públicas e indicam o prestador na consulta.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub user_id: Uuid,
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

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct JobOwnerQuery {
    pub user_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Serviço anunciado", body = JobResponse),
        (status = 403, description = "Exige a role PROFESSIONAL")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    professional: RequireRole<AsProfessional>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let wrapper = app_state
        .jobs_service
        .create(professional.current.user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(wrapper)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    params(JobQuery),
    responses(
        (status = 200, description = "Serviços do prestador, paginados")
    )
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .jobs_service
        .find_all(query.user_id, query.page, query.size)
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "ID do serviço"),
        JobOwnerQuery
    ),
    responses(
        (status = 200, description = "Serviço localizado", body = JobResponse),
        (status = 404, description = "Trabalho não localizado")
    )
)]
pub async fn find_one(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<JobOwnerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state.jobs_service.find_one(query.user_id, id).await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 204, description = "Serviço removido"),
        (status = 403, description = "Usuário sem permissão para efetuar esta tarefa")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    professional: RequireRole<AsProfessional>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .jobs_service
        .remove(professional.current.user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
