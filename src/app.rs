use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use tower_cookies::CookieManagerLayer;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    handlers::{analytics, categories, docs, health, owners, products},
    middleware_layer::auth::{require_owner_api, require_owner_page},
    state::AppState,
};

/// Largest accepted request body; product forms carry one image.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Assembles the application router.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing the `Router`, ready to be served.
pub fn build_router(state: AppState) -> Result<Router> {
    let limit = state.config.login_rate_limit;
    let login_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(limit.period_secs)
            .burst_size(limit.burst)
            .use_headers()
            .finish()
            .ok_or_else(|| {
                AppError::Config("Login rate limit period and burst must be non-zero".to_string())
            })?,
    );

    let mut owner_auth_routes = Router::new().route("/owners/login", post(owners::login));
    if state.config.is_production() {
        tracing::info!("🔒 Owner bootstrap disabled in production");
    } else {
        owner_auth_routes = owner_auth_routes.route("/owners/create", post(owners::create_owner));
    }
    let owner_auth_routes = owner_auth_routes
        .layer(GovernorLayer::new(login_governor_conf))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .route("/owners", get(owners::index))
        .route("/owners/login", get(owners::login_page))
        .route("/owners/logout", get(owners::logout))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/owners/categories", get(categories::list_categories))
        .route("/owners/categories/create", post(categories::create_category))
        .route("/owners/categories/edit/{id}", patch(categories::update_category))
        .route(
            "/owners/products/generate-description",
            post(products::generate_description),
        )
        .route_layer(from_fn_with_state(state.clone(), require_owner_api))
        .with_state(state.clone());

    let page_routes = Router::new()
        .route("/owners/dashboard", get(owners::dashboard))
        .route("/owners/analytics", get(analytics::analytics))
        .route(
            "/owners/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/owners/products/create",
            get(products::new_product_page).post(products::create_product),
        )
        .route("/owners/products/{id}", get(products::show_product))
        .route("/owners/products/{id}/edit", get(products::edit_product_page))
        .route("/owners/products/{id}/update", post(products::update_product))
        .route("/owners/products/{id}/delete", post(products::delete_product))
        .route_layer(from_fn_with_state(state.clone(), require_owner_page))
        .with_state(state.clone());

    let origin: HeaderValue = state
        .config
        .public_base_url
        .parse()
        .map_err(|_| AppError::Config("PUBLIC_BASE_URL is not a valid origin".to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    Ok(Router::new()
        .merge(owner_auth_routes)
        .merge(public_routes)
        .merge(api_routes)
        .merge(page_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors))
}
