// src/services/users.rs

use std::sync::Arc;

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        envelope::{Pagination, Wrapper},
        error::AppError,
        storage::{object_key, validate_upload, ObjectStorage, UploadedFile},
        time::TimeFormatter,
    },
    db::{JobRepository, OrderRepository, UserRepository},
    models::user::{
        normalize_roles, CreateUserPayload, Phone, UpdateUserPayload, User, UserResponse, UserRole,
    },
    services::evaluation::EvaluationService,
};

const PROFILE_IMAGE_PREFIX: &str = "images/profile";

#[derive(Clone)]
pub struct UsersService {
    user_repo: UserRepository,
    job_repo: JobRepository,
    order_repo: OrderRepository,
    evaluation_service: EvaluationService,
    storage: Arc<dyn ObjectStorage>,
    pool: PgPool,
    time: TimeFormatter,
}

impl UsersService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: UserRepository,
        job_repo: JobRepository,
        order_repo: OrderRepository,
        evaluation_service: EvaluationService,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
        time: TimeFormatter,
    ) -> Self {
        Self {
            user_repo,
            job_repo,
            order_repo,
            evaluation_service,
            storage,
            pool,
            time,
        }
    }

    pub async fn create(
        &self,
        dto: CreateUserPayload,
        image: Option<UploadedFile>,
    ) -> Result<Wrapper<UserResponse>, AppError> {
        if self.user_repo.find_by_cpf_cnpj(&dto.cpf_cnpj).await?.is_some() {
            return Err(AppError::conflict("Cpf ou cnpj já cadastrado."));
        }

        let international_code: i32 = dto
            .international_code
            .parse()
            .map_err(|_| AppError::bad_request("Formato do campo telefone inválido."))?;
        let local_code: i32 = dto
            .local_code
            .parse()
            .map_err(|_| AppError::bad_request("Formato do campo telefone inválido."))?;
        let phone_number: i64 = dto
            .phone_number
            .parse()
            .map_err(|_| AppError::bad_request("Formato do campo telefone inválido."))?;
        let address_number: i32 = dto
            .address_number
            .parse()
            .map_err(|_| AppError::bad_request("Formato do número do endereço inválido."))?;

        if self
            .user_repo
            .phone_exists(international_code, local_code, phone_number)
            .await?
        {
            return Err(AppError::conflict("Telefone já registrado."));
        }

        let roles = normalize_roles(&dto.roles);

        // Hashing fora da transação: não toca no banco.
        let password_clone = dto.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Upload completa antes de o registro existir; se falhar, nada foi gravado.
        let image_url = match image {
            Some(file) => Some(self.upload_profile_image(file).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        tracing::info!("Saving user on database...");
        let user = self
            .user_repo
            .insert_user(
                &mut *tx,
                &dto.first_name,
                &dto.last_name,
                &dto.cpf_cnpj,
                &dto.email,
                &password_hash,
                image_url.as_deref(),
                dto.bio.as_deref(),
                &dto.state,
                &dto.city,
                &dto.address,
                address_number,
                dto.complement.as_deref(),
            )
            .await?;

        let phone = self
            .user_repo
            .insert_phone(&mut *tx, user.id, international_code, local_code, phone_number)
            .await?;

        self.user_repo.insert_roles(&mut *tx, user.id, &roles).await?;

        tx.commit().await?;
        tracing::info!("Saved.");

        Ok(Wrapper::created(self.map_result(user, roles, Some(phone))))
    }

    pub async fn find_all(
        &self,
        page: i64,
        size: i64,
    ) -> Result<Wrapper<Vec<UserResponse>>, AppError> {
        tracing::info!("Searching users...");
        let total = self.user_repo.count().await?;
        let users = self.user_repo.list(page, size).await?;
        tracing::info!("Found.");

        if users.is_empty() {
            return Ok(Wrapper::empty());
        }

        let mut data = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.user_repo.find_roles(user.id).await?;
            let phone = self.user_repo.find_phone(user.id).await?;
            data.push(self.map_result(user, roles, phone));
        }

        let pagination = Pagination::of(size, page, total);
        Ok(Wrapper::paginated(data, pagination))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Wrapper<UserResponse>, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;

        let roles = self.user_repo.find_roles(user.id).await?;
        let phone = self.user_repo.find_phone(user.id).await?;

        Ok(Wrapper::of(self.map_result(user, roles, phone)))
    }

    // Atualização sempre do próprio perfil; cpf/cnpj é imutável.
    pub async fn update(
        &self,
        acting_id: Uuid,
        dto: UpdateUserPayload,
        image: Option<UploadedFile>,
    ) -> Result<Wrapper<UserResponse>, AppError> {
        if dto.cpf_cnpj.is_some() {
            return Err(AppError::bad_request("Usuário não pode alterar o cpf/cnpj."));
        }

        self.user_repo
            .find_by_id(acting_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;

        let password_hash = match dto.password {
            Some(password) => Some(
                tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??,
            ),
            None => None,
        };

        let image_url = match image {
            Some(file) => Some(self.upload_profile_image(file).await?),
            None => None,
        };

        let address_number = match dto.address_number {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                AppError::bad_request("Formato do número do endereço inválido.")
            })?),
            None => None,
        };

        tracing::info!("Updating user...");
        let updated = self
            .user_repo
            .update_user(
                acting_id,
                dto.first_name.as_deref(),
                dto.last_name.as_deref(),
                dto.email.as_deref(),
                password_hash.as_deref(),
                image_url.as_deref(),
                dto.bio.as_deref(),
                dto.state.as_deref(),
                dto.city.as_deref(),
                dto.address.as_deref(),
                address_number,
                dto.complement.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;
        tracing::info!("Updated.");

        let roles = self.user_repo.find_roles(updated.id).await?;
        let phone = self.user_repo.find_phone(updated.id).await?;

        Ok(Wrapper::of(self.map_result(updated, roles, phone)))
    }

    // Cascata explícita: avaliações do prestador, ordens nas duas pontas,
    // serviços anunciados, roles, telefone e por fim o usuário.
    pub async fn remove(&self, acting_id: Uuid) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(acting_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não localizado."))?;

        tracing::info!("Removing all user reviews with id: {}", user.id);
        self.evaluation_service.remove_all(user.id).await?;
        tracing::info!("Removed.");

        let mut tx = self.pool.begin().await?;

        self.order_repo.delete_by_user(&mut *tx, user.id).await?;
        self.job_repo.delete_by_owner(&mut *tx, user.id).await?;
        self.user_repo.delete_roles(&mut *tx, user.id).await?;
        self.user_repo.delete_phone(&mut *tx, user.id).await?;

        tracing::info!("Removing user with id: {}", user.id);
        self.user_repo.delete_user(&mut *tx, user.id).await?;

        tx.commit().await?;
        tracing::info!("Removed.");

        Ok(())
    }

    async fn upload_profile_image(&self, file: UploadedFile) -> Result<String, AppError> {
        validate_upload(&file)?;

        let key = object_key(PROFILE_IMAGE_PREFIX, &file.file_name);

        tracing::info!("Uploading profile image...");
        let url = self
            .storage
            .put(&key, &file.bytes, &file.content_type)
            .await?;
        tracing::info!("Finished.");

        Ok(url)
    }

    fn map_result(&self, user: User, roles: Vec<UserRole>, phone: Option<Phone>) -> UserResponse {
        let phone_number = phone
            .map(|p| format!("({}) {}", p.local_code, p.phone_number))
            .unwrap_or_default();

        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            cpf_cnpj: user.cpf_cnpj,
            email: user.email,
            roles,
            bio: user.bio,
            image_url: user.image_url,
            rating: user.rating,
            address: user.address,
            city: user.city,
            state: user.state,
            address_number: user.address_number,
            complement: user.complement,
            phone_number,
            created_at: self.time.format(user.created_at),
            updated_at: self.time.format(user.updated_at),
        }
    }
}
