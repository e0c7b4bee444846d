// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{AuthResponse, Claims},
        user::{User, UserRole},
    },
};

// Identidade resolvida pelo guard e anexada à requisição.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<UserRole>,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        // Mesma mensagem para e-mail inexistente e senha errada.
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("E-mail ou senha inválido."))?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Verificação de bcrypt é pesada: roda em thread separada.
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::unauthorized("E-mail ou senha inválido."));
        }

        let roles = self.user_repo.find_roles(user.id).await?;
        let bearer = self.create_token(&user, &roles)?;

        Ok(AuthResponse { bearer })
    }

    // Resolve o token para uma identidade completa. Qualquer falha (token
    // inválido, expirado, usuário removido) devolve None: o guard nunca
    // rejeita, quem decide é o extractor na ponta.
    pub async fn resolve_identity(&self, token: &str) -> Option<CurrentUser> {
        let claims = self.check_token(token)?;

        let user = match self.user_repo.find_by_id(claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Falha ao carregar usuário do token: {}", e);
                return None;
            }
        };

        let roles = match self.user_repo.find_roles(user.id).await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!("Falha ao carregar roles do usuário: {}", e);
                return None;
            }
        };

        Some(CurrentUser { user, roles })
    }

    pub fn check_token(&self, token: &str) -> Option<Claims> {
        let validation = Validation::default();
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .ok()
    }

    fn create_token(&self, user: &User, roles: &[UserRole]) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.id,
            name: user.first_name.clone(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
