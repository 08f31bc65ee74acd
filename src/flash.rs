use axum::response::Redirect;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::error::AppError;

/// The cookie a pending flash message travels in.
pub const FLASH_COOKIE: &str = "flash";
/// Seconds a flash message survives if no page consumes it.
const FLASH_MAX_AGE_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot notice shown by the page a redirect lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// An error flash for a failed operation. Server-side details are logged
    /// and replaced with a generic message.
    pub fn from_error(error: &AppError) -> Self {
        error.log();
        Self::error(error.public_message())
    }

    fn encode(&self) -> Option<String> {
        match sonic_rs::to_string(self) {
            Ok(json) => Some(general_purpose::URL_SAFE_NO_PAD.encode(json)),
            Err(e) => {
                tracing::warn!("❌ Failed to serialize flash message: {}", e);
                None
            }
        }
    }

    fn decode(value: &str) -> Option<Self> {
        let json = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
        sonic_rs::from_slice(&json).ok()
    }
}

/// Stores `flash` for the next page.
pub fn set_flash(cookies: &Cookies, flash: &Flash) {
    let Some(value) = flash.encode() else {
        return;
    };

    let mut cookie = Cookie::new(FLASH_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(FLASH_MAX_AGE_SECS));
    cookies.add(cookie);
}

/// Reads and clears the pending flash message, if any.
pub fn take_flash(cookies: &Cookies) -> Option<Flash> {
    let value = cookies.get(FLASH_COOKIE)?.value().to_string();

    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    cookies.remove(removal);

    Flash::decode(&value)
}

/// Redirects to `to` with `flash` waiting there.
pub fn redirect_with(cookies: &Cookies, to: &str, flash: Flash) -> Redirect {
    set_flash(cookies, &flash);
    Redirect::to(to)
}
