use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{
    crypto::token::TOKEN_COOKIE,
    error::ErrorBody,
    handlers::categories,
    models::category::{Category, CategoryDraft, CategoryPatch},
};

/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// The OpenAPI document of the JSON category API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Luxvane API",
        version = "1.0.0",
        description = "E-commerce admin panel API documentation"
    ),
    paths(
        categories::list_categories,
        categories::create_category,
        categories::update_category
    ),
    components(schemas(Category, CategoryDraft, CategoryPatch, ErrorBody)),
    modifiers(&CookieAuth),
    tags((name = "Categories", description = "Category management endpoints"))
)]
pub struct ApiDoc;

/// Registers the session cookie as the `cookieAuth` security scheme.
struct CookieAuth;

impl Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookieAuth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                TOKEN_COOKIE,
                "JWT token stored in HTTP-only cookie",
            ))),
        );
    }
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
