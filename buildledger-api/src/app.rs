/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use buildledger_api::{app::AppState, config::Config};
/// use buildledger_shared::store::Store;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = Store::connect(config.store_config()).await?;
/// let state = AppState::new(store, config);
/// let app = buildledger_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use buildledger_shared::auth::jwt;
use buildledger_shared::isolation::CallerIdentity;
use buildledger_shared::store::Store;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub store: Arc<Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                         # Storage mode and health (public)
/// ├── POST /auth/login                     # Token for (country, username, password)
/// └── /api/                                # Bearer token required
///     ├── GET /me
///     ├── /projects      GET POST, /:id GET PUT DELETE, /:id/full-expenses
///     ├── /sections      GET POST, /:id GET PUT DELETE, /:id/full-costs
///     ├── /spendings     GET POST, /:id GET PUT DELETE
///     ├── /employees     GET POST, /:id GET PUT DELETE, /:id/balance
///     ├── /payments      GET POST, /:id GET PUT DELETE
///     ├── /inventory     GET POST, /:id GET PUT DELETE
///     ├── /users         GET POST, /:id GET PUT DELETE   (admin)
///     ├── GET /dashboard
///     └── /reports/:country/{projects,balances}
/// ```
///
/// Every `/api` handler works on the caller's own country, taken from the
/// token. Report paths naming another country are rejected with 403.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (`/api` only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    let api_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/full-expenses",
            get(routes::reports::project_full_expenses),
        )
        .route(
            "/sections",
            get(routes::sections::list_sections).post(routes::sections::create_section),
        )
        .route(
            "/sections/:id",
            get(routes::sections::get_section)
                .put(routes::sections::update_section)
                .delete(routes::sections::delete_section),
        )
        .route(
            "/sections/:id/full-costs",
            get(routes::reports::section_full_costs),
        )
        .route(
            "/spendings",
            get(routes::spendings::list_spendings).post(routes::spendings::create_spending),
        )
        .route(
            "/spendings/:id",
            get(routes::spendings::get_spending)
                .put(routes::spendings::update_spending)
                .delete(routes::spendings::delete_spending),
        )
        .route(
            "/employees",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        .route(
            "/employees/:id",
            get(routes::employees::get_employee)
                .put(routes::employees::update_employee)
                .delete(routes::employees::delete_employee),
        )
        .route(
            "/employees/:id/balance",
            get(routes::employees::employee_balance),
        )
        .route(
            "/payments",
            get(routes::payments::list_payments).post(routes::payments::create_payment),
        )
        .route(
            "/payments/:id",
            get(routes::payments::get_payment)
                .put(routes::payments::update_payment)
                .delete(routes::payments::delete_payment),
        )
        .route(
            "/inventory",
            get(routes::inventory::list_inventory).post(routes::inventory::create_inventory_item),
        )
        .route(
            "/inventory/:id",
            get(routes::inventory::get_inventory_item)
                .put(routes::inventory::update_inventory_item)
                .delete(routes::inventory::delete_inventory_item),
        )
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/dashboard", get(routes::reports::dashboard))
        .route(
            "/reports/:country/projects",
            get(routes::reports::project_report),
        )
        .route(
            "/reports/:country/balances",
            get(routes::reports::balance_report),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let origins = state.config.cors_origins();
    let cors = if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, then injects the caller's
/// [`CallerIdentity`] into request extensions. Handlers never see a country
/// that did not come from a validated token.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;
    let caller = CallerIdentity::from_claims(&claims);

    tracing::debug!(
        user_id = %caller.user_id(),
        country = %caller.country(),
        "Request authenticated"
    );

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
