// src/models/user.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Professional,
}

// Um prestador sempre é também cliente: pode contratar outros serviços.
pub fn normalize_roles(roles: &[UserRole]) -> Vec<UserRole> {
    let mut normalized: Vec<UserRole> = Vec::new();

    for role in roles {
        if !normalized.contains(role) {
            normalized.push(*role);
        }
    }

    if normalized.contains(&UserRole::Professional) && !normalized.contains(&UserRole::Customer) {
        normalized.push(UserRole::Customer);
    }

    normalized
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub cpf_cnpj: String,
    pub email: String,

    #[serde(skip_serializing)] // nunca vaza na resposta
    pub password_hash: String,

    pub image_url: Option<String>,
    pub bio: Option<String>,
    // Média denormalizada das avaliações; NULL enquanto não há nenhuma.
    pub rating: Option<Decimal>,

    pub state: String,
    pub city: String,
    pub address: String,
    pub address_number: i32,
    pub complement: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Telefone 1:1 com o usuário; a tripla é única globalmente.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub id: Uuid,
    pub user_id: Uuid,
    pub international_code: i32,
    pub local_code: i32,
    pub phone_number: i64,
}

// Dados para registro de um novo usuário (campos de texto do multipart)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Nome obrigatório"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Sobrenome obrigatório"))]
    pub last_name: String,

    #[validate(email(message = "Formato do campo e-mail inválido"))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub password: String,

    #[validate(length(min = 11, max = 14, message = "Formato do campo cpf/cnpj inválido"))]
    pub cpf_cnpj: String,

    #[validate(length(equal = 2, message = "Formato do campo estado inválido"))]
    pub state: String,

    #[validate(length(min = 1, message = "Cidade obrigatória"))]
    pub city: String,

    #[validate(length(min = 1, message = "Endereço obrigatório"))]
    pub address: String,

    #[validate(length(min = 1, message = "Número do endereço obrigatório"))]
    pub address_number: String,

    pub complement: Option<String>,
    pub bio: Option<String>,

    #[validate(length(min = 1, message = "Código internacional obrigatório"))]
    pub international_code: String,

    #[validate(length(min = 1, message = "Código local obrigatório"))]
    pub local_code: String,

    #[validate(length(min = 1, message = "Número de telefone obrigatório"))]
    pub phone_number: String,

    #[validate(length(min = 1, message = "Roles é uma lista"))]
    pub roles: Vec<UserRole>,
}

// Atualização parcial do perfil; cpf/cnpj presente aqui é rejeitado (imutável).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub cpf_cnpj: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(email(message = "Formato do campo e-mail inválido"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub password: Option<String>,

    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address_number: Option<String>,
    pub complement: Option<String>,
    pub bio: Option<String>,
}

// Resposta de usuário com datas e telefone já formatados para a fronteira.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub cpf_cnpj: String,
    pub email: String,
    pub roles: Vec<UserRole>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<Decimal>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub address_number: i32,
    pub complement: Option<String>,
    pub phone_number: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn professional_implies_customer() {
        let roles = normalize_roles(&[UserRole::Professional]);
        assert_eq!(roles, vec![UserRole::Professional, UserRole::Customer]);
    }

    #[test]
    fn customer_alone_stays_customer() {
        let roles = normalize_roles(&[UserRole::Customer]);
        assert_eq!(roles, vec![UserRole::Customer]);
    }

    #[test]
    fn duplicated_roles_are_collapsed() {
        let roles = normalize_roles(&[
            UserRole::Customer,
            UserRole::Professional,
            UserRole::Customer,
        ]);
        assert_eq!(roles, vec![UserRole::Customer, UserRole::Professional]);
    }

    #[test]
    fn role_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&UserRole::Professional).unwrap(),
            "\"PROFESSIONAL\""
        );
    }
}
