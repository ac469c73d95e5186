//! bolso Web Server
//!
//! Axum-based REST API over the bolso core: transactions, recurring
//! templates, budget goals, statement upload, and monthly reports.
//!
//! Security posture:
//! - Optional bearer-token auth (off by default for local use)
//! - Restrictive CORS policy (same-origin unless origins are configured)
//! - Upload size limits
//! - Sanitized error responses (internals are logged, not returned)

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use bolso_core::ai::CategorizerClient;
use bolso_core::db::Database;

mod handlers;


/// Maximum statement upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether bearer-token authentication is required
    pub require_auth: bool,
    /// Accepted tokens ("Bearer <token>" in the Authorization header)
    pub api_tokens: Vec<String>,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: false,
            api_tokens: vec![],
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Optional categorization oracle for statement imports
    pub categorizer: Option<CategorizerClient>,
}

/// Authentication middleware - validates bearer tokens when auth is enabled
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let authorized = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| state.config.api_tokens.iter().any(|t| t == token))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request");
    AppError::unauthorized().into_response()
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// API error with a sanitized message
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl From<bolso_core::Error> for AppError {
    fn from(err: bolso_core::Error) -> Self {
        match err {
            bolso_core::Error::NotFound(message) => Self::not_found(&message),
            bolso_core::Error::Statement(message) => Self::bad_request(&message),
            bolso_core::Error::InvalidData(message) => Self::bad_request(&message),
            other => {
                // internals are logged, never surfaced to clients
                error!("Internal error: {}", other);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
        }

        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the API router
pub fn create_router(
    db: Database,
    categorizer: Option<CategorizerClient>,
    config: ServerConfig,
) -> Router {
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    };

    let state = Arc::new(AppState {
        db,
        config,
        categorizer,
    });

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/api/transactions/:id", delete(handlers::delete_transaction))
        .route("/api/transactions/:id/pay", put(handlers::set_transaction_paid))
        .route(
            "/api/transactions/installments",
            post(handlers::create_installments),
        )
        .route(
            "/api/recurring",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/api/recurring/:id", delete(handlers::delete_template))
        .route("/api/recurring/materialize", post(handlers::materialize))
        .route(
            "/api/budgets",
            get(handlers::list_budget_goals).put(handlers::upsert_budget_goal),
        )
        .route(
            "/api/budgets/:category",
            delete(handlers::delete_budget_goal),
        )
        .route("/api/import", post(handlers::import_statement))
        .route("/api/reports/monthly", get(handlers::monthly_report_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server until shutdown
pub async fn serve(router: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("bolso server listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
