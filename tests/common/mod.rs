#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::ConnectInfo,
    http::{Request, Response, header},
};
use serde_json::Value;
use tower::ServiceExt;

use luxvane_admin::{
    app::build_router, config::Config, crypto::token::OwnerIdentity, state::AppState,
};

pub const BOUNDARY: &str = "luxvane-test-boundary";

// Shared test context
pub struct TestContext {
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory(Config::for_tests()))
    }

    pub fn with_state(state: AppState) -> Self {
        let app = build_router(state.clone()).unwrap();
        Self { state, app }
    }

    /// A session cookie for the owner used across tests.
    pub fn owner_cookie(&self) -> String {
        let token = self
            .state
            .tokens
            .issue(&OwnerIdentity {
                id: "507f1f77bcf86cd799439011".to_string(),
                email: "test@example.com".to_string(),
            })
            .unwrap();
        format!("token={token}")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Attaches the peer address the login rate limiter keys on.
pub fn from_peer(mut request: Request<Body>, host: u8) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, host], 4000))));
    request
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Every `Set-Cookie` header of `response`.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

/// The `name=value` pair of a cookie set by `response`.
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&format!("{name}=")))
        .and_then(|c| c.split(';').next().map(str::to_string))
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Encodes a multipart form with text fields and an optional image part.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}
