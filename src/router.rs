use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, Method};
use axum::{BoxError, Json, Router, middleware, routing::get};
use serde::Serialize;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_auth;
use crate::modules::auth::router::{init_auth_router, init_session_router};
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use warden_core::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Turns a layer failure into the standard error body. Only the timeout layer can fail.
pub async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        return AppError::service_unavailable("Request timed out");
    }
    AppError::internal_error(format!("Unhandled layer error: {err}"))
}

pub fn init_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(init_session_router())
        .merge(init_users_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .merge(protected),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(state.request_timeout)),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use warden_core::ErrorKind;

    #[tokio::test]
    async fn test_timeout_maps_to_service_unavailable() {
        let err = handle_layer_error(Box::new(Elapsed::new())).await;

        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(err.details(), Some("Request timed out"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_other_layer_errors_are_internal() {
        let err = handle_layer_error("boom".into()).await;

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_response_body().details.is_none());
    }
}
