mod common;

use axum::http::StatusCode;
use common::{Fixtures, TestApp, USER_COUNT};
use sea_orm::{EntityTrait, PaginatorTrait};
use storefront_admin_api::entities::{order, user};

#[tokio::test]
async fn stats_match_table_counts() {
    let app = TestApp::new().await;
    let db = app.state.db.as_ref();

    let (status, body) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], USER_COUNT as u64);
    assert_eq!(
        body["totalUsers"].as_u64(),
        Some(user::Entity::find().count(db).await.unwrap())
    );
    assert_eq!(
        body["totalOrders"].as_u64(),
        Some(order::Entity::find().count(db).await.unwrap())
    );
}

#[tokio::test]
async fn revenue_excludes_cancelled_and_returned_items() {
    let app = TestApp::new().await;

    let (_, body) = app.get("/api/stats").await;
    let revenue = body["totalRevenue"].as_f64().unwrap();
    assert!((revenue - 103.99).abs() < 1e-9, "revenue was {revenue}");
}

#[tokio::test]
async fn empty_store_reports_zeroes() {
    let app = TestApp::with_fixtures(Fixtures::headers_only()).await;

    let (status, body) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({ "totalUsers": 0, "totalOrders": 0, "totalRevenue": 0.0 })
    );
}

#[tokio::test]
async fn welcome_and_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Storefront Admin API"));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/api/stats"].is_object());
}
