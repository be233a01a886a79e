use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use warden_core::ErrorResponse;
use warden_models::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
    UpdateProfileRequest, UserProfile,
};

use crate::router::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_tokens,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UpdateProfileRequest,
            AuthResponse,
            MessageResponse,
            UserProfile,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, token refresh and logout"),
        (name = "Users", description = "Profile of the authenticated user"),
        (name = "Health", description = "Liveness check")
    ),
    info(
        title = "Warden API",
        version = "0.1.0",
        description = "Credential authentication service issuing short-lived access tokens and long-lived refresh tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
