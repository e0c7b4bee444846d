// src/handlers/users.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        multipart::{parse_form, FormOptions},
    },
    config::AppState,
    handlers::PageQuery,
    middleware::auth::AuthenticatedUser,
    models::user::{CreateUserPayload, UpdateUserPayload, UserResponse},
};

// Partes do multipart de usuário: campos de texto + uma imagem de perfil.
const USER_FORM: FormOptions<'static> = FormOptions {
    file_fields: &["image"],
    list_fields: &["roles"],
    max_files: 1,
};

// Handler de registro (rota pública)
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body(content = CreateUserPayload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Usuário criado", body = UserResponse),
        (status = 409, description = "Cpf/cnpj ou telefone já cadastrado")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (payload, mut files): (CreateUserPayload, _) = parse_form(multipart, USER_FORM).await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let wrapper = app_state.users_service.create(payload, files.pop()).await?;

    Ok((StatusCode::CREATED, Json(wrapper)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(PageQuery),
    responses(
        (status = 200, description = "Listagem paginada de usuários")
    )
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state
        .users_service
        .find_all(query.page, query.size)
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário localizado", body = UserResponse),
        (status = 404, description = "Usuário não localizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_one(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let wrapper = app_state.users_service.find_one(id).await?;

    Ok(Json(wrapper))
}

// Atualização sempre do próprio perfil, identificado pelo token.
#[utoipa::path(
    patch,
    path = "/api/users",
    tag = "Users",
    request_body(content = UpdateUserPayload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Usuário atualizado", body = UserResponse),
        (status = 400, description = "Usuário não pode alterar o cpf/cnpj")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (payload, mut files): (UpdateUserPayload, _) = parse_form(multipart, USER_FORM).await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let wrapper = app_state
        .users_service
        .update(current.user.id, payload, files.pop())
        .await?;

    Ok(Json(wrapper))
}

#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 204, description = "Usuário removido com todos os seus dados")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.users_service.remove(current.user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
