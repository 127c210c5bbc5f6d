//! MongoDB integration tests for the catalog repositories
//!
//! Run with: cargo test -p domain_catalog -- --ignored (requires Docker)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::{Repositories, handlers};
use http_body_util::BodyExt;
use serde_json::Value;
use test_utils::{TestDataBuilder, TestMongo};
use tower::ServiceExt;

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_index_reports_conflict() {
    let mongo = TestMongo::new().await;
    let repositories = Repositories::mongo(&mongo.database("catalog_unique"));
    repositories.init_indexes().await.unwrap();
    let app = handlers::router(&repositories, "http://cdn.test");

    let builder = TestDataBuilder::from_test_name("unique_index");
    let (status, _) = call(&app, "POST", "/brands", Some(builder.brand("one"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, "POST", "/brands", Some(builder.brand("one"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Duplicate name value")
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_paged_listing_and_populate() {
    let mongo = TestMongo::new().await;
    let repositories = Repositories::mongo(&mongo.database("catalog_paging"));
    repositories.init_indexes().await.unwrap();
    let app = handlers::router(&repositories, "http://cdn.test");

    let builder = TestDataBuilder::from_test_name("paged_listing");
    let (_, category) = call(&app, "POST", "/categories", Some(builder.category("main"))).await;
    let category_id = category["data"]["_id"].as_str().unwrap().to_string();

    for i in 0..12 {
        let body = builder.product(&format!("p{i:02}"), &category_id, 10.0 + i as f64);
        let (status, body) = call(&app, "POST", "/products", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (status, body) = call(&app, "GET", "/products?page=2&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalItems"], 12);
    assert_eq!(data["currentPage"], 2);
    assert_eq!(data["totalPages"], 3);
    assert_eq!(data["hasNextPage"], true);
    assert_eq!(data["hasPreviousPage"], true);
    assert_eq!(data["items"].as_array().unwrap().len(), 5);

    let product_id = data["items"][0]["_id"].as_str().unwrap();
    let (_, body) = call(&app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(body["data"]["category"]["_id"], category_id.as_str());
    assert_eq!(body["data"]["category"]["name"], builder.name("category", "main"));

    let (status, _) = call(&app, "DELETE", &format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "DELETE", &format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
