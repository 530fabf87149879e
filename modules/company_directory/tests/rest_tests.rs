//! REST API tests driven through the full router

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use company_directory::api::rest::build_router;
use company_directory::config::ServerConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{contact_numbers, print_json, print_test_header, TestContext};

fn router(ctx: &TestContext) -> Router {
    build_router(ctx.service.clone(), ctx.seo.clone(), &ServerConfig::default())
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Middleware rejections (e.g. the body limit) are plain text
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn company(slug: &str, name: &str, rating: f64) -> Value {
    json!({
        "slug": slug,
        "categoryId": "banks",
        "subCategoryId": "private",
        "name": name,
        "description": format!("{} customer care", name),
        "rating": rating,
        "totalReviews": 120,
        "website": format!("https://{}.example.com", slug)
    })
}

#[tokio::test]
async fn test_create_and_get_company_page() {
    print_test_header(
        "test_create_and_get_company_page",
        &["POST create returns 201 and the page reads back by slug"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(company("hdfc-bank", "HDFC Bank", 4.2)),
    )
    .await;
    print_json("create", &body);
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["slug"], "hdfc-bank");
    assert_eq!(body["data"]["categoryId"], "banks");
    assert_eq!(body["data"]["version"], 1);
    assert!(body["data"]["tabs"]["numbers"].is_null());

    let (status, body) = send(&app, Method::GET, "/api/company-pages/hdfc-bank", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "HDFC Bank");
    assert_eq!(body["data"]["totalReviews"], 120);
}

#[tokio::test]
async fn test_duplicate_slug_returns_409() {
    print_test_header(
        "test_duplicate_slug_returns_409",
        &["A second create with the same slug is a conflict"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let payload = company("hdfc-bank", "HDFC Bank", 4.2);
    send(&app, Method::POST, "/api/company-pages/create", Some(payload.clone())).await;
    let (status, body) = send(&app, Method::POST, "/api/company-pages/create", Some(payload)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Conflict");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    print_test_header(
        "test_malformed_body_is_rejected",
        &["Bad JSON and missing required fields fail with the error envelope"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/company-pages/create")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(json!({"slug": "no-name"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid Request Body");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(company("Bad Slug", "Bad", 1.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn test_create_with_contact_numbers_and_tab_view() {
    print_test_header(
        "test_create_with_contact_numbers_and_tab_view",
        &[
            "companyData and contactNumbersData are created together",
            "GET tab/numbers returns companyInfo and tabData",
        ],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/company-pages/create-with-contact-numbers",
        Some(json!({
            "companyData": company("sbi", "State Bank of India", 4.0),
            "contactNumbersData": contact_numbers("1800 11 2211")
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["tabs"]["numbers"]["content"],
        contact_numbers("1800 11 2211")
    );

    let (status, body) = send(&app, Method::GET, "/api/company-pages/sbi/tab/numbers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["companyInfo"]["slug"], "sbi");
    assert_eq!(body["data"]["companyInfo"]["name"], "State Bank of India");
    assert_eq!(body["data"]["tabData"]["kind"], "numbers");

    let (status, body) = send(&app, Method::GET, "/api/company-pages/sbi/tab/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown Tab");
}

#[tokio::test]
async fn test_add_contact_numbers_endpoint() {
    print_test_header(
        "test_add_contact_numbers_endpoint",
        &["POST add-contact-numbers then GET shows the populated tab"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);
    send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(company("icici-bank", "ICICI Bank", 4.1)),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/company-pages/icici-bank/add-contact-numbers",
        Some(contact_numbers("1800 1080")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/company-pages/icici-bank", None).await;
    assert_eq!(
        body["data"]["tabs"]["numbers"]["content"],
        contact_numbers("1800 1080")
    );

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/company-pages/icici-bank/contact-numbers",
        Some(contact_numbers("1800 1080 2")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/company-pages/missing/add-contact-numbers",
        Some(contact_numbers("1")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_search_and_category() {
    print_test_header(
        "test_list_search_and_category",
        &["Listing returns items with pagination; search and category filter"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);
    for (slug, name, rating) in [
        ("hdfc-bank", "HDFC Bank", 4.2),
        ("axis-bank", "Axis Bank", 3.9),
        ("hdfc-life", "HDFC Life", 4.5),
    ] {
        send(
            &app,
            Method::POST,
            "/api/company-pages/create",
            Some(company(slug, name, rating)),
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/api/company-pages?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["pages"], 2);

    let (status, body) = send(&app, Method::GET, "/api/company-pages/search?q=HDFC", None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["hdfc-life", "hdfc-bank"]);

    let (status, _) = send(&app, Method::GET, "/api/company-pages/search?q=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/company-pages/category/banks/private",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["slug"], "hdfc-life");
    // Category rows are a projection without tabs
    assert!(rows[0].get("tabs").is_none());

    let (status, _) = send(&app, Method::GET, "/api/company-pages?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_company_page() {
    print_test_header(
        "test_update_and_delete_company_page",
        &["PUT replaces with version check; DELETE keeps tab documents"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/company-pages/create-with-contact-numbers",
        Some(json!({
            "companyData": company("canara", "Canara Bank", 3.4),
            "contactNumbersData": contact_numbers("1800 425 0018")
        })),
    )
    .await;
    let tab_id = created["data"]["tabs"]["numbers"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut update = company("canara", "Canara Bank Ltd", 3.6);
    update["expectedVersion"] = json!(5);
    let (status, _) = send(&app, Method::PUT, "/api/company-pages/canara", Some(update.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    update["expectedVersion"] = json!(1);
    let (status, body) = send(&app, Method::PUT, "/api/company-pages/canara", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Canara Bank Ltd");
    assert_eq!(body["data"]["version"], 2);

    let (status, body) = send(&app, Method::DELETE, "/api/company-pages/canara", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, Method::GET, "/api/company-pages/canara", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/tabs/numbers/{}", tab_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tab_id.as_str());
}

#[tokio::test]
async fn test_save_components_and_layout() {
    print_test_header(
        "test_save_components_and_layout",
        &["save-component round-trips the array; layout sets selected tabs"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);
    send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(company("flipkart", "Flipkart", 4.0)),
    )
    .await;

    let components = json!([
        {"type": "card", "title": "Order help", "items": [{"label": "Call", "value": "044-45614700"}]},
        {"type": "table", "headers": ["Issue", "Contact"], "rows": [["Refund", "refunds@flipkart.com"]]}
    ]);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/company-pages/save-component",
        Some(json!({"slug": "flipkart", "components": components})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/company-pages/flipkart", None).await;
    assert_eq!(body["data"]["dynamicComponents"], components);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/company-pages/flipkart/layout",
        Some(json!({"selectedTabs": ["numbers", "quick-help"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selectedTabs"], json!(["numbers", "quickhelp"]));
    assert_eq!(body["data"]["dynamicComponents"], components);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/company-pages/flipkart/layout",
        Some(json!({"selectedTabs": ["reviews"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tab_endpoints_and_linking() {
    print_test_header(
        "test_tab_endpoints_and_linking",
        &["Standalone tab CRUD plus link and unlink on a page"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);
    send(
        &app,
        Method::POST,
        "/api/company-pages/create",
        Some(company("tata-motors", "Tata Motors", 4.0)),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tabs/overview",
        Some(json!({"body": "Indian automaker"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tab_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/company-pages/tata-motors/tabs/overview",
        Some(json!({"tabId": tab_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tabs"]["overview"]["content"]["body"], "Indian automaker");

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/company-pages/tata-motors/tabs/overview",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["tabs"]["overview"].is_null());

    let (status, _) = send(&app, Method::GET, "/api/tabs/overview/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/tabs/reviews", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/tabs/overview/{}", tab_id);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seo_endpoints() {
    print_test_header(
        "test_seo_endpoints",
        &["POST /api/seo then GET returns the record; tab falls back to page"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/seo",
        Some(json!({
            "type": "company",
            "identifier": "hdfc-bank",
            "title": "HDFC Bank Customer Care",
            "description": "Toll free numbers",
            "keywords": ["hdfc", "bank"],
            "openGraph": {"image": "https://cdn.example.com/hdfc.png"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "company");
    assert!(body["data"].get("tab").is_none());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/seo?type=company&identifier=hdfc-bank&tab=numbers",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "HDFC Bank Customer Care");
    assert_eq!(body["data"]["openGraph"]["image"], "https://cdn.example.com/hdfc.png");

    let (status, body) = send(&app, Method::GET, "/api/seo?path=/company/hdfc-bank", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["identifier"], "hdfc-bank");

    let (status, body) = send(&app, Method::GET, "/api/seo/records?type=company", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/api/seo?identifier=hdfc-bank", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/seo?type=company&identifier=hdfc-bank",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/seo?type=company&identifier=hdfc-bank", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_and_openapi() {
    print_test_header(
        "test_health_and_openapi",
        &["Operational endpoints respond without touching storage"],
    );
    let ctx = TestContext::new();
    let app = router(&ctx);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["components"]["schemas"]["CompanyPageDto"].is_object());
    assert_eq!(body["info"]["title"], "Company Directory API");
}

#[tokio::test]
async fn test_body_limit() {
    print_test_header(
        "test_body_limit",
        &["Bodies over the configured limit are refused with 413"],
    );
    let ctx = TestContext::new();
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let app = build_router(ctx.service.clone(), ctx.seo.clone(), &config);

    let big = json!({"body": "x".repeat(1024)});
    let (status, _) = send(&app, Method::POST, "/api/tabs/overview", Some(big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(ctx.db.tab_count(), 0);
}
