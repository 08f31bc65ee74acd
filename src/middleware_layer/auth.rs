use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    crypto::token::{OwnerIdentity, TOKEN_COOKIE},
    error::{AppError, Result},
    flash::{Flash, redirect_with},
    state::AppState,
};

/// Where browser routes send unauthenticated callers.
pub const LOGIN_PATH: &str = "/owners/login";

/// Extracts and verifies the session token from the request cookies.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// A `Result` containing the owner identity carried by the token.
fn authenticate(state: &AppState, cookies: &Cookies) -> Result<OwnerIdentity> {
    let token = cookies
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authentication token required".to_string()))?;

    let identity = state.tokens.verify(&token)?;
    tracing::debug!("✅ Owner authenticated: {}", identity.id);
    Ok(identity)
}

/// Removes the session cookie from the client.
pub fn clear_token_cookie(cookies: &Cookies) {
    let mut removal = Cookie::from(TOKEN_COOKIE);
    removal.set_path("/");
    cookies.remove(removal);
}

/// A middleware for JSON routes: rejects requests without a valid session
/// with 401 and an `{error, message}` body.
pub async fn require_owner_api(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let identity = authenticate(&state, &cookies)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// A middleware for browser routes: redirects requests without a valid
/// session to the login page.
pub async fn require_owner_page(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, &cookies) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) if matches!(&e, AppError::Token(t) if t.is_server_side()) => e.into_response(),
        Err(e) => {
            e.log();
            clear_token_cookie(&cookies);
            redirect_with(&cookies, LOGIN_PATH, Flash::error("Please log in to continue"))
                .into_response()
        }
    }
}
