//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{
    handle_panic, metrics::ObservabilityLayer, normalize_error_response,
    require_auth_middleware, trace::SanitizedMakeSpan, AuthMiddlewareState,
};
use crate::migration;
use crate::repository::{FormRepositoryImpl, ResponseRepositoryImpl, UserRepositoryImpl};
use crate::service::{AuthService, FormService, ResponseService};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub form_service: Arc<FormService<FormRepositoryImpl>>,
    pub response_service: Arc<ResponseService<ResponseRepositoryImpl, FormRepositoryImpl>>,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub jwt_manager: JwtManager,
}

impl HasServices for AppState {
    type FormRepo = FormRepositoryImpl;
    type ResponseRepo = ResponseRepositoryImpl;
    type UserRepo = UserRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn form_service(&self) -> &FormService<Self::FormRepo> {
        &self.form_service
    }

    fn response_service(&self) -> &ResponseService<Self::ResponseRepo, Self::FormRepo> {
        &self.response_service
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo> {
        &self.auth_service
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .is_ok()
    }
}

/// Run the server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    // Schema first; the pool below assumes the database exists
    migration::run_migrations(&config.database).await?;

    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    // Create repositories
    let form_repo = Arc::new(FormRepositoryImpl::new(db_pool.clone()));
    let response_repo = Arc::new(ResponseRepositoryImpl::new(db_pool.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));

    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Create services
    let form_service = Arc::new(FormService::new(form_repo.clone()));
    let response_service = Arc::new(ResponseService::new(response_repo, form_repo));
    let auth_service = Arc::new(AuthService::new(user_repo, jwt_manager.clone()));

    let http_addr = config.http_addr();
    let state = AppState {
        config: Arc::new(config),
        db_pool,
        form_service,
        response_service,
        auth_service,
        jwt_manager,
    };

    let app = build_router(state, prometheus_handle);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router
///
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn build_router<S: HasServices>(
    state: S,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let cors = cors_layer(&state.config().cors_allowed_origins);
    let gate = middleware::from_fn_with_state(
        AuthMiddlewareState::new(state.jwt_manager().clone()),
        require_auth_middleware,
    );

    // The gate wraps only the registered methods, so an unsupported method
    // on a gated path still falls through to the 405 fallback
    let mut router = Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/api/auth/register", post(api::auth::register::<S>))
        .route("/api/auth/login", post(api::auth::login::<S>))
        .route(
            "/api/auth/me",
            get(api::auth::me::<S>).route_layer(gate.clone()),
        )
        .route(
            "/api/forms",
            get(api::form::list::<S>)
                .post(api::form::create::<S>)
                .route_layer(gate.clone()),
        )
        .route(
            "/api/forms/{id}",
            get(api::form::get::<S>).merge(
                put(api::form::update::<S>)
                    .delete(api::form::delete::<S>)
                    .route_layer(gate.clone()),
            ),
        )
        .route(
            "/api/forms/{id}/responses",
            get(api::form::list_responses::<S>).route_layer(gate.clone()),
        )
        .route("/api/responses", post(api::response::create::<S>))
        .route(
            "/api/responses/{id}",
            get(api::response::get::<S>)
                .delete(api::response::delete::<S>)
                .route_layer(gate),
        );

    if let Some(handle) = prometheus_handle {
        let metrics_router = Router::new()
            .route("/metrics", get(api::metrics::metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_router);
    }

    router
        .layer(middleware::from_fn(normalize_error_response))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        // Outermost: a panic anywhere above becomes a logged 500
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
