// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::users::create,
        handlers::users::find_all,
        handlers::users::find_one,
        handlers::users::update,
        handlers::users::remove,

        // --- Jobs ---
        handlers::jobs::create,
        handlers::jobs::find_all,
        handlers::jobs::find_one,
        handlers::jobs::remove,

        // --- Orders ---
        handlers::orders::create,
        handlers::orders::find_all,
        handlers::orders::find_one,
        handlers::orders::update,

        // --- Evaluations ---
        handlers::evaluation::create,
        handlers::evaluation::find_all,
        handlers::evaluation::update,
        handlers::evaluation::remove,
    ),
    components(
        schemas(
            // --- Envelope ---
            common::envelope::Metadata,
            common::envelope::Pagination,

            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Users ---
            models::user::UserRole,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::UserResponse,

            // --- Jobs ---
            models::job::JobCategory,
            models::job::CreateJobPayload,
            models::job::JobResponse,

            // --- Orders ---
            models::order::PaymentForm,
            models::order::PaymentStatus,
            models::order::OrderStatus,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderPayload,
            models::order::ImageResponse,
            models::order::OrderResponse,

            // --- Evaluations ---
            models::evaluation::CreateEvaluationPayload,
            models::evaluation::UpdateEvaluationPayload,
            models::evaluation::EvaluationResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Cadastro e perfil de usuários"),
        (name = "Jobs", description = "Catálogo de serviços dos prestadores"),
        (name = "Orders", description = "Ordens de serviço"),
        (name = "Evaluations", description = "Avaliações de prestadores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
