// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::user::UserRole,
    services::auth::CurrentUser,
};

/// 1. O Trait que define o que é um requisito de role
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
}

/// 2. O Extractor (Guardião)
///
/// Carrega a identidade junto: quem exige a role quase sempre precisa do id.
pub struct RequireRole<T> {
    pub current: CurrentUser,
    _marker: PhantomData<T>,
}

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai a identidade anexada pelo guard
        let current = parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Usuário não autenticado."))?;

        // B. Verifica a role exigida
        if !current.roles.contains(&T::role()) {
            return Err(AppError::forbidden(
                "Usuário não tem permissão para esta funcionalidade.",
            ));
        }

        Ok(RequireRole {
            current,
            _marker: PhantomData,
        })
    }
}

// ---
// DEFINIÇÃO DAS ROLES (TIPOS)
// ---

pub struct AsProfessional;
impl RoleDef for AsProfessional {
    fn role() -> UserRole {
        UserRole::Professional
    }
}

pub struct AsCustomer;
impl RoleDef for AsCustomer {
    fn role() -> UserRole {
        UserRole::Customer
    }
}
