//! 상품 카탈로그 API 통합 테스트

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_catalog_requires_authentication() {
    let app = test_app().await;

    let response = send(&app, Method::GET, "/api/products", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::GET, "/api/products/by-name/Laptop", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_can_browse_seeded_catalog() {
    let app = test_app().await;
    let token = login(&app, "user", "user123").await;
    let auth = bearer(&token);

    let (status, json) =
        read_json(send(&app, Method::GET, "/api/products", Some(&auth), None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&json),
        vec!["Laptop", "Smartphone", "Tablet", "Headphones", "Smartwatch"]
    );

    let (status, json) = read_json(
        send(&app, Method::GET, "/api/products/by-name/Smartwatch", Some(&auth), None).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["price"], "249.99");

    let (status, _) = read_json(
        send(&app, Method::GET, "/api/products/by-name/Toaster", Some(&auth), None).await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_filters() {
    let app = test_app().await;
    let token = login(&app, "user", "user123").await;
    let auth = bearer(&token);

    let (_, json) = read_json(
        send(&app, Method::GET, "/api/products?name=PHONE", Some(&auth), None).await,
    )
    .await;
    assert_eq!(names(&json), vec!["Smartphone", "Headphones"]);

    let (_, json) = read_json(
        send(&app, Method::GET, "/api/products?keyword=wireless", Some(&auth), None).await,
    )
    .await;
    assert_eq!(names(&json), vec!["Headphones"]);

    let (_, json) = read_json(
        send(&app, Method::GET, "/api/products?min_price=800", Some(&auth), None).await,
    )
    .await;
    assert_eq!(names(&json), vec!["Laptop", "Smartphone"]);

    let (_, json) = read_json(
        send(&app, Method::GET, "/api/products?max_price=250", Some(&auth), None).await,
    )
    .await;
    assert_eq!(names(&json), vec!["Headphones", "Smartwatch"]);
}

#[tokio::test]
async fn test_user_cannot_modify_catalog() {
    let app = test_app().await;
    let token = login(&app, "user", "user123").await;
    let auth = bearer(&token);
    let payload = json!({"name": "Camera", "description": "Mirrorless", "price": "999.00"});

    let response = send(&app, Method::POST, "/api/products", Some(&auth), Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::PUT, "/api/products/1", Some(&auth), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, "/api/products/1", Some(&auth), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_manages_catalog() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let auth = bearer(&token);

    // 생성
    let (status, created) = read_json(
        send(
            &app,
            Method::POST,
            "/api/products",
            Some(&auth),
            Some(json!({"name": "Camera", "description": "Mirrorless camera", "price": "999.00"})),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 6);
    let id = created["id"].as_i64().unwrap();

    // 수정
    let (status, updated) = read_json(
        send(
            &app,
            Method::PUT,
            &format!("/api/products/{}", id),
            Some(&auth),
            Some(json!({"name": "Camera II", "price": "1099.00"})),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Camera II");
    assert!(updated["description"].is_null());

    // 검증 실패
    let (status, error) = read_json(
        send(
            &app,
            Method::PUT,
            &format!("/api/products/{}", id),
            Some(&auth),
            Some(json!({"name": "Camera II", "price": "-5"})),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    // 삭제
    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/products/{}", id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/products/{}", id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;

    let response = send(
        &app,
        Method::PUT,
        "/api/products/999",
        Some(&bearer(&token)),
        Some(json!({"name": "Ghost", "price": "1.00"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
