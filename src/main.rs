//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

// Uma ordem pode carregar até 8 imagens de 1,5 MiB; 16 MiB cobrem o
// multipart inteiro com folga.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create)
                .get(handlers::users::find_all)
                .patch(handlers::users::update)
                .delete(handlers::users::remove),
        )
        .route("/{id}", get(handlers::users::find_one));

    let job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create).get(handlers::jobs::find_all),
        )
        .route(
            "/{id}",
            get(handlers::jobs::find_one).delete(handlers::jobs::remove),
        );

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create).get(handlers::orders::find_all),
        )
        .route(
            "/{id}",
            get(handlers::orders::find_one).patch(handlers::orders::update),
        );

    let evaluation_routes = Router::new()
        .route(
            "/",
            post(handlers::evaluation::create).get(handlers::evaluation::find_all),
        )
        .route(
            "/{id}",
            axum::routing::patch(handlers::evaluation::update)
                .delete(handlers::evaluation::remove),
        );

    // O guard roda em toda a API e só anexa a identidade; quem rejeita são
    // os extractors das rotas protegidas.
    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/jobs", job_routes)
        .nest("/orders", order_routes)
        .nest("/evaluations", evaluation_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
