// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserRole;

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID do usuário
    pub name: String,
    pub email: String,
    pub roles: Vec<UserRole>,
    pub exp: usize, // quando o token expira
    pub iat: usize, // quando o token foi criado
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Formato do campo e-mail inválido"))]
    #[schema(example = "maria@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Senha obrigatória"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub bearer: String,
}
