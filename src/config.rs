// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{
        storage::{FsObjectStorage, ObjectStorage},
        time::TimeFormatter,
    },
    db::{EvaluationRepository, JobRepository, OrderRepository, UserRepository},
    services::{
        auth::AuthService, evaluation::EvaluationService, jobs::JobsService,
        orders::OrdersService, rating::RatingService, users::UsersService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub users_service: UsersService,
    pub jobs_service: JobsService,
    pub orders_service: OrdersService,
    pub evaluation_service: EvaluationService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Armazenamento de objetos: diretório local exposto por uma URL pública.
        let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "uploads".to_string());
        let storage_public_url =
            env::var("STORAGE_PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000/uploads".to_string());

        // Fuso horário das datas formatadas; padrão América/São Paulo.
        let tz_offset_hours: i32 = env::var("TZ_OFFSET_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(-3);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let time = TimeFormatter::new(tz_offset_hours)?;
        let storage: Arc<dyn ObjectStorage> =
            Arc::new(FsObjectStorage::new(storage_dir, storage_public_url));

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let job_repo = JobRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let evaluation_repo = EvaluationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let rating_service = RatingService::new(evaluation_repo.clone());
        let evaluation_service = EvaluationService::new(
            evaluation_repo,
            user_repo.clone(),
            job_repo.clone(),
            rating_service,
            db_pool.clone(),
            time.clone(),
        );
        let users_service = UsersService::new(
            user_repo.clone(),
            job_repo.clone(),
            order_repo.clone(),
            evaluation_service.clone(),
            storage.clone(),
            db_pool.clone(),
            time.clone(),
        );
        let jobs_service = JobsService::new(job_repo.clone(), db_pool.clone());
        let orders_service = OrdersService::new(
            order_repo,
            user_repo,
            job_repo,
            storage,
            db_pool.clone(),
            time,
        );

        Ok(Self {
            db_pool,
            auth_service,
            users_service,
            jobs_service,
            orders_service,
            evaluation_service,
        })
    }
}
