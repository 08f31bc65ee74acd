mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;

use common::*;
use luxvane_admin::{
    config::{Config, RateLimit},
    state::AppState,
};

fn create_owner_request(email: &str) -> Request<Body> {
    from_peer(
        Request::post("/owners/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "fullname": "Test Owner",
                    "email": email,
                    "password": "SecurePass123"
                })
                .to_string(),
            ))
            .unwrap(),
        1,
    )
}

fn login_form(email: &str, password: &str) -> Request<Body> {
    from_peer(
        Request::post("/owners/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "email={}&password={}",
                email.replace('@', "%40"),
                password
            )))
            .unwrap(),
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_owner_bootstrap_login_and_logout() {
        let context = TestContext::new();

        // Step 1: Owner bootstrap
        let response = context.send(create_owner_request("owner@example.com")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["email"], "owner@example.com");
        assert!(body.get("passwordHash").is_none());

        // Step 2: A second owner is refused
        let response = context.send(create_owner_request("second@example.com")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "You don't have permission to create a new owner");

        // Step 3: Login with a form body
        let response = context
            .send(login_form("owner@example.com", "SecurePass123"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/dashboard"));

        let token_cookie = set_cookies(&response)
            .into_iter()
            .find(|c| c.starts_with("token="))
            .expect("token cookie");
        assert!(token_cookie.contains("HttpOnly"));
        assert!(token_cookie.contains("SameSite=Lax"));
        assert!(token_cookie.contains("Max-Age=7200"));
        assert!(!token_cookie.contains("Secure"));
        let cookie = cookie_pair(&response, "token").unwrap();

        // Step 4: The dashboard accepts the session
        let response = context
            .send(
                Request::get("/owners/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["owner"]["email"], "owner@example.com");

        // Step 5: Logout clears the cookie and flashes a notice
        let response = context
            .send(
                Request::get("/owners/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/login"));
        let flash = cookie_pair(&response, "flash").unwrap();
        assert!(set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("token=") && c.contains("Max-Age=0")));

        // Step 6: The login page consumes the flash
        let response = context
            .send(
                Request::get("/owners/login")
                    .header(header::COOKIE, &flash)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["flash"]["kind"], "success");
        assert_eq!(body["flash"]["message"], "Logged out successfully");
    }

    #[tokio::test]
    async fn test_login_accepts_json_and_rejects_bad_credentials() {
        let context = TestContext::new();
        context.send(create_owner_request("owner@example.com")).await;

        let response = context
            .send(from_peer(
                Request::post("/owners/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "owner@example.com", "password": "SecurePass123"})
                            .to_string(),
                    ))
                    .unwrap(),
                1,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = context
            .send(login_form("owner@example.com", "WrongPass123"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Invalid credentials");

        let response = context
            .send(login_form("nobody@example.com", "SecurePass123"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_owner_bootstrap_validates_input() {
        let context = TestContext::new();

        let response = context
            .send(from_peer(
                Request::post("/owners/create")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"fullname": "Owner", "email": "owner@example.com", "password": "short"})
                            .to_string(),
                    ))
                    .unwrap(),
                1,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = context.send(create_owner_request("not-an-email")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_bootstrap_is_absent_in_production() {
        let mut config = Config::for_tests();
        config.app_env = luxvane_admin::config::AppEnv::Production;
        let context = TestContext::with_state(AppState::in_memory(config));

        let response = context.send(create_owner_request("owner@example.com")).await;
        assert!(matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        ));
    }

    #[tokio::test]
    async fn test_login_is_rate_limited_per_peer() {
        let mut config = Config::for_tests();
        config.login_rate_limit = RateLimit {
            period_secs: 60,
            burst: 2,
        };
        let context = TestContext::with_state(AppState::in_memory(config));

        for _ in 0..2 {
            let response = context.send(login_form("x@example.com", "whatever1")).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = context.send(login_form("x@example.com", "whatever1")).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // A different peer has its own quota
        let request = from_peer(
            Request::post("/owners/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=x%40example.com&password=whatever1"))
                .unwrap(),
            2,
        );
        let response = context.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guarded_page_redirects_to_login() {
        let context = TestContext::new();

        let response = context
            .send(Request::get("/owners/dashboard").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/login"));

        let response = context
            .send(Request::get("/owners").body(Body::empty()).unwrap())
            .await;
        assert_eq!(location(&response).as_deref(), Some("/owners/login"));
    }
}
