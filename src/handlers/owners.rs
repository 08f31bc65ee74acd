use axum::{
    Extension, Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    crypto::token::{OwnerIdentity, TOKEN_COOKIE},
    error::{AppError, Result},
    extract::ApiJson,
    flash::{Flash, redirect_with, take_flash},
    middleware_layer::auth::{LOGIN_PATH, clear_token_cookie},
    services::auth as auth_service,
    state::AppState,
    validation::{auth::*, catalog::report_to_error},
};

/// Where a successful login lands.
pub const DASHBOARD_PATH: &str = "/owners/dashboard";

/// The request payload for owner bootstrap.
#[derive(Deserialize, Debug, Validate)]
pub struct CreateOwnerRequest {
    #[garde(skip)]
    pub fullname: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub password: String,
}

/// The request payload for owner login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A login body sent either as a form or as JSON.
pub struct LoginInput(pub LoginRequest);

impl<S> FromRequest<S> for LoginInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let body = if is_json {
            ApiJson::<LoginRequest>::from_request(req, state).await?.0
        } else {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?
                .0
        };

        Ok(Self(body))
    }
}

/// The login page's view-model.
#[derive(Serialize)]
pub struct LoginPage {
    pub action: &'static str,
    pub flash: Option<Flash>,
}

/// The dashboard's view-model.
#[derive(Serialize)]
pub struct Dashboard {
    pub owner: OwnerIdentity,
    pub flash: Option<Flash>,
}

/// Creates the session cookie.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token);

    cookie.set_http_only(true);
    if state.config.is_production() {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(state.tokens.ttl().num_seconds()));
    cookie.set_path("/");

    cookie
}

/// Bootstraps the first owner account.
#[axum::debug_handler]
pub async fn create_owner(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOwnerRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Owner bootstrap attempt: {}", payload.email);
    validate_fullname(&payload.fullname)?;
    payload.validate().map_err(report_to_error)?;
    validate_password(&payload.password)?;

    let owner =
        auth_service::create_owner(&state, payload.fullname, payload.email, payload.password)
            .await?;

    Ok((StatusCode::CREATED, Json(owner)))
}

/// Handles owner login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    LoginInput(payload): LoginInput,
) -> Response {
    match auth_service::login(&state, &payload.email, &payload.password).await {
        Ok((_, token)) => {
            cookies.add(session_cookie(&state, token));
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(AppError::Authentication(message)) => {
            tracing::warn!("❌ Login failed for {}", payload.email);
            (StatusCode::UNAUTHORIZED, message).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Sends `/owners` to the login page.
pub async fn index() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

/// Describes the login form.
pub async fn login_page(cookies: Cookies) -> Json<LoginPage> {
    Json(LoginPage {
        action: LOGIN_PATH,
        flash: take_flash(&cookies),
    })
}

/// Clears the session cookie.
pub async fn logout(cookies: Cookies) -> Redirect {
    clear_token_cookie(&cookies);
    tracing::info!("✅ Owner logged out");
    redirect_with(&cookies, LOGIN_PATH, Flash::success("Logged out successfully"))
}

/// The landing page after login.
pub async fn dashboard(
    Extension(owner): Extension<OwnerIdentity>,
    cookies: Cookies,
) -> Json<Dashboard> {
    Json(Dashboard {
        owner,
        flash: take_flash(&cookies),
    })
}
