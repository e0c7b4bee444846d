// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, services::auth::CurrentUser};

// O middleware em si. Resolve o Bearer para uma identidade e a anexa aos
// "extensions" da requisição. Nunca rejeita: header ausente, com outro
// scheme ou malformado segue anônimo; rota protegida falha no extractor.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: axum::extract::Request,
    next: Next,
) -> Response {
    if let Ok(TypedHeader(bearer)) = bearer {
        if let Some(current) = app_state.auth_service.resolve_identity(bearer.token()).await {
            request.extensions_mut().insert(current);
        }
    }

    next.run(request).await
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::unauthorized("Usuário não autenticado."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    // O guard recebe a extração como Result e trata qualquer Err como
    // requisição anônima, então só um Bearer bem formado produz identidade.
    type MaybeBearer = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

    async fn extract(header: Option<&str>) -> MaybeBearer {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        MaybeBearer::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_bearer_yields_the_token() {
        let bearer = extract(Some("Bearer abc.def.ghi")).await.unwrap();
        assert_eq!(bearer.token(), "abc.def.ghi");
    }

    #[tokio::test]
    async fn missing_header_falls_to_the_anonymous_branch() {
        assert!(extract(None).await.is_err());
    }

    #[tokio::test]
    async fn other_scheme_falls_to_the_anonymous_branch() {
        assert!(extract(Some("Basic dXNlcjpzZW5oYQ==")).await.is_err());
    }

    #[tokio::test]
    async fn bare_token_without_scheme_falls_to_the_anonymous_branch() {
        assert!(extract(Some("abc.def.ghi")).await.is_err());
    }
}
