mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};

use common::*;
use luxvane_admin::{
    config::Config,
    db::{ConnectionStatus, StaticProbe},
    error::AppError,
    services::{descriptions::MockDescriptionGenerator, images::MockImageStore},
    state::AppState,
};

const IMAGE_URL: &str = "http://localhost:3000/uploads/abc123.png";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n fake image";

fn json_request(method: &str, uri: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn create_category(context: &TestContext, cookie: &str, name: &str) -> Value {
    let response = context
        .send(json_request(
            "POST",
            "/owners/categories/create",
            cookie,
            json!({ "name": name, "description": "Things" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn context_with_images(images: MockImageStore) -> TestContext {
    TestContext::with_state(AppState::in_memory(Config::for_tests()).with_images(images))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_categories_require_a_token() {
        let context = TestContext::new();

        let response = context
            .send(Request::get("/owners/categories").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Unauthorized", "message": "Authentication token required" })
        );

        let response = context
            .send(get("/owners/categories", "token=not.a.jwt"))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_categories_accept_a_valid_token() {
        let context = TestContext::new();
        let cookie = context.owner_cookie();

        let response = context.send(get("/owners/categories", &cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.is_array());
    }

    #[tokio::test]
    async fn test_category_create_and_patch() {
        let context = TestContext::new();
        let cookie = context.owner_cookie();

        // Step 1: Create normalizes the name
        let created = create_category(&context, &cookie, "home decor").await;
        assert_eq!(created["name"], "Home Decor");
        assert_eq!(created["slug"], "home-decor");
        assert_eq!(created["isActive"], true);

        // Step 2: Case-insensitive duplicate
        let response = context
            .send(json_request(
                "POST",
                "/owners/categories/create",
                &cookie,
                json!({ "name": "HOME DECOR" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["message"], "Category already exists");

        // Step 3: Missing and over-long names
        let response = context
            .send(json_request(
                "POST",
                "/owners/categories/create",
                &cookie,
                json!({ "description": "no name" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = context
            .send(json_request(
                "POST",
                "/owners/categories/create",
                &cookie,
                json!({ "name": "x".repeat(51) }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Step 4: Patch only the active flag
        let id = created["id"].as_str().unwrap();
        let response = context
            .send(json_request(
                "PATCH",
                &format!("/owners/categories/edit/{id}"),
                &cookie,
                json!({ "isActive": false }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Home Decor");
        assert_eq!(body["isActive"], false);

        // Step 5: Malformed and unknown identifiers
        let response = context
            .send(json_request(
                "PATCH",
                "/owners/categories/edit/not-a-uuid",
                &cookie,
                json!({ "name": "Other" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = context
            .send(json_request(
                "PATCH",
                "/owners/categories/edit/7b0b8c4e-5a43-4b8f-9a55-0d7c1b3a9e10",
                &cookie,
                json!({ "name": "Other" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let mut images = MockImageStore::new();
        images
            .expect_upload()
            .times(1)
            .returning(|_| Ok(IMAGE_URL.to_string()));
        let context = context_with_images(images);
        let cookie = context.owner_cookie();
        let category = create_category(&context, &cookie, "Accessories").await;
        let category_id = category["id"].as_str().unwrap();

        // Step 1: Create via multipart
        let body = multipart_body(
            &[
                ("name", "Luxury Watch"),
                ("price", "299.99"),
                ("category", category_id),
                ("description", "Steel case"),
                ("discount", "15"),
            ],
            Some(PNG_BYTES),
        );
        let response = context
            .send(multipart_request("/owners/products", &cookie, body))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/products"));
        let flash = cookie_pair(&response, "flash").unwrap();

        // Step 2: The list shows it, with the flash
        let response = context
            .send(get("/owners/products", &format!("{cookie}; {flash}")))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        assert_eq!(page["flash"]["kind"], "success");
        let products = page["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["image"], IMAGE_URL);
        assert_eq!(products[0]["categoryName"], "Accessories");
        assert_eq!(page["categories"].as_array().unwrap().len(), 1);
        let id = products[0]["id"].as_str().unwrap().to_string();

        // Step 3: Search and category filters
        let response = context
            .send(get("/owners/products?search=STEEL", &cookie))
            .await;
        assert_eq!(body_json(response).await["products"].as_array().unwrap().len(), 1);

        let response = context
            .send(get(
                "/owners/products?category=7b0b8c4e-5a43-4b8f-9a55-0d7c1b3a9e10",
                &cookie,
            ))
            .await;
        assert!(body_json(response).await["products"].as_array().unwrap().is_empty());

        // Step 4: A zero price is rejected and nothing changes
        let body = multipart_body(&[("price", "0")], None);
        let response = context
            .send(multipart_request(
                &format!("/owners/products/{id}/update"),
                &cookie,
                body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            Some(format!("/owners/products/{id}/edit"))
        );

        let response = context
            .send(get(&format!("/owners/products/{id}"), &cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["product"]["price"], 299.99);

        // Step 5: A valid partial update
        let body = multipart_body(&[("name", "Classic Watch"), ("description", "")], None);
        let response = context
            .send(multipart_request(
                &format!("/owners/products/{id}/update"),
                &cookie,
                body,
            ))
            .await;
        assert_eq!(location(&response).as_deref(), Some("/owners/products"));

        let response = context
            .send(get(&format!("/owners/products/{id}/edit"), &cookie))
            .await;
        let page = body_json(response).await;
        assert_eq!(page["product"]["name"], "Classic Watch");
        assert_eq!(page["product"]["description"], "Steel case");
        assert_eq!(page["product"]["discount"], 15.0);

        // Step 6: Delete, then delete again
        let request = Request::post(format!("/owners/products/{id}/delete"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = context.send(request).await;
        assert_eq!(location(&response).as_deref(), Some("/owners/products"));

        let request = Request::post(format!("/owners/products/{id}/delete"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = context.send(request).await;
        let flash = cookie_pair(&response, "flash").unwrap();

        let response = context
            .send(get("/owners/products", &format!("{cookie}; {flash}")))
            .await;
        let page = body_json(response).await;
        assert_eq!(page["flash"]["kind"], "error");
        assert_eq!(page["flash"]["message"], "Product not found");
        assert!(page["products"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_never_reaches_image_store() {
        let mut images = MockImageStore::new();
        images.expect_upload().never();
        let context = context_with_images(images);
        let cookie = context.owner_cookie();

        let body = multipart_body(
            &[
                ("name", "Orphan"),
                ("price", "10"),
                ("category", "7b0b8c4e-5a43-4b8f-9a55-0d7c1b3a9e10"),
            ],
            Some(PNG_BYTES),
        );
        let response = context
            .send(multipart_request("/owners/products/create", &cookie, body))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/products/create"));
        let flash = cookie_pair(&response, "flash").unwrap();

        let response = context
            .send(get("/owners/products/create", &format!("{cookie}; {flash}")))
            .await;
        let page = body_json(response).await;
        assert_eq!(page["flash"]["message"], "Category not found");

        let response = context.send(get("/owners/products", &cookie)).await;
        assert!(body_json(response).await["products"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_pages_redirect_without_session() {
        let context = TestContext::new();

        let response = context
            .send(Request::get("/owners/products").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/login"));
    }

    #[tokio::test]
    async fn test_generate_description() {
        let mut descriptions = MockDescriptionGenerator::new();
        descriptions
            .expect_generate()
            .withf(|brief| brief.category_name == "Accessories" && brief.discount == Some(10.0))
            .times(1)
            .returning(|_| Ok("A refined steel watch for daily wear.".to_string()));
        let context = TestContext::with_state(
            AppState::in_memory(Config::for_tests()).with_descriptions(descriptions),
        );
        let cookie = context.owner_cookie();
        let category = create_category(&context, &cookie, "Accessories").await;

        let body = multipart_body(
            &[
                ("name", "Watch"),
                ("price", "120"),
                ("category", category["id"].as_str().unwrap()),
                ("discount", "10"),
                ("imageUrl", "https://img.example.com/watch.jpg"),
            ],
            None,
        );
        let response = context
            .send(multipart_request(
                "/owners/products/generate-description",
                &cookie,
                body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "description": "A refined steel watch for daily wear.",
                "imageUrl": "https://img.example.com/watch.jpg"
            })
        );
    }

    #[tokio::test]
    async fn test_mistyped_category_bodies_are_validation_errors() {
        let context = TestContext::new();
        let cookie = context.owner_cookie();
        let created = create_category(&context, &cookie, "Garden").await;
        let id = created["id"].as_str().unwrap();

        let response = context
            .send(json_request(
                "PATCH",
                &format!("/owners/categories/edit/{id}"),
                &cookie,
                json!({ "isActive": "yes" }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation error");
        assert!(body["message"].is_string());

        let response = context
            .send(json_request(
                "POST",
                "/owners/categories/create",
                &cookie,
                json!({ "name": 5 }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Validation error");

        let response = context
            .send(
                Request::post("/owners/categories/create")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from("{\"name\":"))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Validation error");

        // The category is untouched
        let response = context.send(get("/owners/categories", &cookie)).await;
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["isActive"], true);
    }

    #[tokio::test]
    async fn test_generate_description_hides_upstream_failure() {
        let mut descriptions = MockDescriptionGenerator::new();
        descriptions
            .expect_generate()
            .times(1)
            .returning(|_| Err(AppError::Upstream("gemini returned 500: quota".to_string())));
        let context = TestContext::with_state(
            AppState::in_memory(Config::for_tests()).with_descriptions(descriptions),
        );
        let cookie = context.owner_cookie();
        let category = create_category(&context, &cookie, "Accessories").await;

        let body = multipart_body(
            &[
                ("name", "Watch"),
                ("price", "120"),
                ("category", category["id"].as_str().unwrap()),
            ],
            None,
        );
        let response = context
            .send(multipart_request(
                "/owners/products/generate-description",
                &cookie,
                body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Upstream error",
                "message": "An external service failed, please try again"
            })
        );
    }

    #[tokio::test]
    async fn test_update_with_unusable_id_returns_to_list() {
        let mut images = MockImageStore::new();
        images.expect_upload().never();
        let context = context_with_images(images);
        let cookie = context.owner_cookie();

        let body = multipart_body(&[("name", "Renamed")], None);
        let response = context
            .send(multipart_request("/owners/products/%01/update", &cookie, body))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/owners/products"));

        let flash = cookie_pair(&response, "flash").unwrap();
        let response = context
            .send(get("/owners/products", &format!("{cookie}; {flash}")))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["flash"]["message"], "Invalid product ID");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_category_routes() {
        let context = TestContext::new();

        let response = context
            .send(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;

        assert_eq!(doc["info"]["title"], "Luxvane API");
        assert!(doc["paths"]["/owners/categories"]["get"].is_object());
        assert!(doc["paths"]["/owners/categories/create"]["post"].is_object());
        assert!(doc["paths"]["/owners/categories/edit/{id}"]["patch"].is_object());
        assert_eq!(
            doc["components"]["securitySchemes"]["cookieAuth"],
            json!({
                "type": "apiKey",
                "in": "cookie",
                "name": "token",
                "description": "JWT token stored in HTTP-only cookie"
            })
        );
        assert_eq!(
            doc["components"]["schemas"]["Category"]["properties"]["name"]["maxLength"],
            50
        );
    }

    #[tokio::test]
    async fn test_analytics_summary() {
        let context = TestContext::new();
        let cookie = context.owner_cookie();
        create_category(&context, &cookie, "Empty").await;

        let response = context.send(get("/owners/analytics", &cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["stats"]["totalProducts"], 0);
        assert_eq!(body["stats"]["totalCategories"], 1);
        assert_eq!(body["chartData"]["productsByCategory"][0]["count"], 0);
        assert_eq!(body["chartData"]["priceRanges"]["0-50"], 0);
    }

    #[tokio::test]
    async fn test_health_and_readiness() {
        let context = TestContext::new();
        let response = context
            .send(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["uptimeSeconds"].is_u64());

        let response = context
            .send(Request::get("/ready").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"]["readyState"], 1);

        let context = TestContext::with_state(
            AppState::in_memory(Config::for_tests())
                .with_probe(StaticProbe(ConnectionStatus::Disconnected)),
        );
        let response = context
            .send(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = context
            .send(Request::get("/ready").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["database"]["status"], "disconnected");
        assert_eq!(body["database"]["readyState"], 0);
    }
}
