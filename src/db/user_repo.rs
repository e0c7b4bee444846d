// src/db/user_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::user::{Phone, User, UserRole},
};

const USER_COLUMNS: &str = "id, first_name, last_name, cpf_cnpj, email, password_hash, \
     image_url, bio, rating, state, city, address, address_number, complement, \
     created_at, updated_at";

// O repositório de usuários, responsável pelas tabelas 'users', 'roles' e 'phones'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

// Traduz violações de unicidade para erros de negócio legíveis,
// pelo nome da constraint criada na migration.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    "users_cpf_cnpj_key" => AppError::conflict("Cpf ou cnpj já cadastrado."),
                    "users_email_key" => AppError::conflict("Este e-mail já está em uso."),
                    "phones_triple_key" => AppError::conflict("Telefone já registrado."),
                    _ => AppError::conflict(format!(
                        "Valor duplicado ({}). Por favor, verifique os dados.",
                        constraint
                    )),
                };
            }
        }
    }
    e.into()
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_cpf_cnpj(&self, cpf_cnpj: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE cpf_cnpj = $1"
        ))
        .bind(cpf_cnpj)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self, page: i64, size: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn find_roles(&self, user_id: Uuid) -> Result<Vec<UserRole>, AppError> {
        let roles: Vec<UserRole> =
            sqlx::query_scalar("SELECT role FROM roles WHERE user_id = $1 ORDER BY role")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(roles)
    }

    pub async fn find_phone(&self, user_id: Uuid) -> Result<Option<Phone>, AppError> {
        let phone = sqlx::query_as::<_, Phone>(
            "SELECT id, user_id, international_code, local_code, phone_number \
             FROM phones WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(phone)
    }

    pub async fn phone_exists(
        &self,
        international_code: i32,
        local_code: i32,
        phone_number: i64,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM phones \
             WHERE international_code = $1 AND local_code = $2 AND phone_number = $3)",
        )
        .bind(international_code)
        .bind(local_code)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_user<'e, E>(
        &self,
        executor: E,
        first_name: &str,
        last_name: &str,
        cpf_cnpj: &str,
        email: &str,
        password_hash: &str,
        image_url: Option<&str>,
        bio: Option<&str>,
        state: &str,
        city: &str,
        address: &str,
        address_number: i32,
        complement: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, cpf_cnpj, email, password_hash, \
                 image_url, bio, state, city, address, address_number, complement) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(cpf_cnpj)
        .bind(email)
        .bind(password_hash)
        .bind(image_url)
        .bind(bio)
        .bind(state)
        .bind(city)
        .bind(address)
        .bind(address_number)
        .bind(complement)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    pub async fn insert_phone<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        international_code: i32,
        local_code: i32,
        phone_number: i64,
    ) -> Result<Phone, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let phone = sqlx::query_as::<_, Phone>(
            "INSERT INTO phones (user_id, international_code, local_code, phone_number) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, international_code, local_code, phone_number",
        )
        .bind(user_id)
        .bind(international_code)
        .bind(local_code)
        .bind(phone_number)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(phone)
    }

    pub async fn insert_roles<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        roles: &[UserRole],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO roles (user_id, role) SELECT $1, unnest($2::user_role[])")
            .bind(user_id)
            .bind(roles)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Atualização parcial: campos ausentes mantêm o valor atual.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_user(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
        image_url: Option<&str>,
        bio: Option<&str>,
        state: Option<&str>,
        city: Option<&str>,
        address: Option<&str>,
        address_number: Option<i32>,
        complement: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 email = COALESCE($4, email), \
                 password_hash = COALESCE($5, password_hash), \
                 image_url = COALESCE($6, image_url), \
                 bio = COALESCE($7, bio), \
                 state = COALESCE($8, state), \
                 city = COALESCE($9, city), \
                 address = COALESCE($10, address), \
                 address_number = COALESCE($11, address_number), \
                 complement = COALESCE($12, complement), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(image_url)
        .bind(bio)
        .bind(state)
        .bind(city)
        .bind(address)
        .bind(address_number)
        .bind(complement)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    // Grava a média denormalizada calculada pelo agregador de notas.
    pub async fn update_rating<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        rating: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET rating = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(rating)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_roles<'e, E>(&self, executor: E, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM roles WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_phone<'e, E>(&self, executor: E, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM phones WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_user<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
