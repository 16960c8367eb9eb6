// tests/commerce_api.rs
//
// Drives the commerce data-access module against an in-process axum stub of
// the remote API bound to an ephemeral port.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use seller_dashboard::commerce;
use seller_dashboard::draft::{ImageUpload, ProductDraft};
use seller_dashboard::errors::AppError;
use seller_dashboard::state::CommerceConfig;

async fn spawn_stub(app: Router) -> CommerceConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    CommerceConfig {
        base_url: format!("http://{}/api", addr),
    }
}

#[derive(Debug, Clone)]
struct RecordedPart {
    name: String,
    filename: Option<String>,
    value: String,
}

type Recorder = Arc<Mutex<Vec<RecordedPart>>>;

async fn record_multipart(recorder: &Recorder, mut multipart: Multipart) {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(|s| s.to_string());
        let value = if filename.is_some() {
            field.bytes().await.unwrap().len().to_string()
        } else {
            field.text().await.unwrap()
        };
        parts.push(RecordedPart { name, filename, value });
    }
    *recorder.lock().await = parts;
}

fn text_value<'a>(parts: &'a [RecordedPart], name: &str) -> Option<&'a str> {
    parts
        .iter()
        .find(|p| p.name == name && p.filename.is_none())
        .map(|p| p.value.as_str())
}

#[tokio::test]
async fn list_products_decodes_the_collection() {
    let app = Router::new().route(
        "/api/products",
        get(|| async {
            Json(json!([
                { "_id": "p1", "name": "Desk", "price": 120.0, "stock": 4 },
                { "id": "p2", "name": "Chair" }
            ]))
        }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let products = commerce::list_products(&client, &config).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].identifier(), Some("p1"));
    assert_eq!(products[0].price, Some(120.0));
    assert_eq!(products[1].identifier(), Some("p2"));
    // Missing fields decode to empty defaults, not errors.
    assert_eq!(products[1].sku, "");
    assert!(products[1].images.is_empty());
}

#[tokio::test]
async fn list_products_rejects_an_undecodable_body() {
    let app = Router::new().route("/api/products", get(|| async { "not json at all" }));
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let err = commerce::list_products(&client, &config).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamDecode(_)));
}

#[tokio::test]
async fn list_products_surfaces_upstream_failure_status() {
    let app = Router::new().route(
        "/api/products",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let err = commerce::list_products(&client, &config).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::UpstreamStatus(StatusCode::INTERNAL_SERVER_ERROR)
    ));
}

#[tokio::test]
async fn fetch_product_maps_404_to_not_found() {
    let app = Router::new().route(
        "/api/products/{id}",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let err = commerce::fetch_product(&client, &config, "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn delete_hands_back_the_upstream_status() {
    let app = Router::new()
        .route("/api/products/{id}", delete(|| async { StatusCode::NO_CONTENT }));
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let status = commerce::delete_product(&client, &config, "p1").await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let app = Router::new().route(
        "/api/products/{id}",
        delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let config = spawn_stub(app).await;
    let status = commerce::delete_product(&client, &config, "p1").await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn json_create_returns_the_record_only_on_201() {
    let app = Router::new().route(
        "/api/products",
        post(|| async {
            (
                StatusCode::CREATED,
                Json(json!({ "_id": "fresh", "name": "Lamp" })),
            )
        }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let body = json!({ "name": "Lamp", "price": "30", "stock": "2" });
    let created = commerce::create_product(&client, &config, &body)
        .await
        .unwrap();
    assert_eq!(created.unwrap().identifier(), Some("fresh"));

    // A 200 answer is success but appends nothing.
    let app = Router::new().route(
        "/api/products",
        post(|| async { Json(json!({ "_id": "ignored" })) }),
    );
    let config = spawn_stub(app).await;
    let created = commerce::create_product(&client, &config, &body)
        .await
        .unwrap();
    assert!(created.is_none());

    let app = Router::new().route(
        "/api/products",
        post(|| async { StatusCode::UNPROCESSABLE_ENTITY }),
    );
    let config = spawn_stub(app).await;
    let err = commerce::create_product(&client, &config, &body)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::UpstreamStatus(StatusCode::UNPROCESSABLE_ENTITY)
    ));
}

#[tokio::test]
async fn edit_submission_puts_the_flattened_draft_to_the_item() {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(
            "/api/products/{id}",
            put(
                |State(recorder): State<Recorder>, Path(id): Path<String>, multipart: Multipart| async move {
                    assert_eq!(id, "p1");
                    record_multipart(&recorder, multipart).await;
                    StatusCode::OK
                },
            ),
        )
        .with_state(recorder.clone());
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let product = serde_json::from_value(json!({
        "_id": "p1",
        "name": "Monitor",
        "images": ["https://cdn.test/front.jpg"]
    }))
    .unwrap();
    let mut draft = ProductDraft::from_product("p1".to_string(), &product);

    let mut fields = HashMap::new();
    fields.insert("price".to_string(), "249.99".to_string());
    fields.insert("stock".to_string(), "12".to_string());
    fields.insert("status".to_string(), "active".to_string());
    fields.insert("shippingClass".to_string(), "express".to_string());
    fields.insert("length".to_string(), "61".to_string());
    fields.insert("width".to_string(), "23".to_string());
    fields.insert("height".to_string(), "41.5".to_string());
    draft.apply_scalar_fields(&fields).unwrap();
    draft.add_feature("4k");
    draft.add_feature("hdr");
    assert!(draft.append_images(vec![ImageUpload {
        filename: "side.jpg".to_string(),
        bytes: vec![7u8; 64],
    }]));

    commerce::submit_draft(&client, &config, &draft).await.unwrap();

    let parts = recorder.lock().await.clone();
    assert_eq!(text_value(&parts, "name"), Some("Monitor"));
    assert_eq!(text_value(&parts, "price"), Some("249.99"));
    assert_eq!(text_value(&parts, "stock"), Some("12"));
    assert_eq!(text_value(&parts, "status"), Some("active"));
    assert_eq!(text_value(&parts, "shippingClass"), Some("express"));
    assert_eq!(text_value(&parts, "features"), Some("4k,hdr"));
    assert_eq!(text_value(&parts, "dimensions[length]"), Some("61"));
    assert_eq!(text_value(&parts, "dimensions[width]"), Some("23"));
    assert_eq!(text_value(&parts, "dimensions[height]"), Some("41.5"));
    // The sku was never set and still travels as an empty string part.
    assert_eq!(text_value(&parts, "sku"), Some(""));

    // The existing reference goes as a text part, the upload as a file part,
    // both under the repeated name "images".
    let image_parts: Vec<_> = parts.iter().filter(|p| p.name == "images").collect();
    assert_eq!(image_parts.len(), 2);
    assert_eq!(image_parts[0].filename, None);
    assert_eq!(image_parts[0].value, "https://cdn.test/front.jpg");
    assert_eq!(image_parts[1].filename.as_deref(), Some("side.jpg"));
    assert_eq!(image_parts[1].value, "64");
}

#[tokio::test]
async fn create_submission_posts_to_the_collection() {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(
            "/api/products",
            post(
                |State(recorder): State<Recorder>, multipart: Multipart| async move {
                    record_multipart(&recorder, multipart).await;
                    StatusCode::CREATED
                },
            ),
        )
        .with_state(recorder.clone());
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let mut draft = ProductDraft::new();
    let mut fields = HashMap::new();
    fields.insert("name".to_string(), "Shelf".to_string());
    draft.apply_scalar_fields(&fields).unwrap();

    commerce::submit_draft(&client, &config, &draft).await.unwrap();

    let parts = recorder.lock().await.clone();
    assert_eq!(text_value(&parts, "name"), Some("Shelf"));
    assert_eq!(text_value(&parts, "price"), Some(""));
}

#[tokio::test]
async fn failed_submission_is_an_error_not_a_panic() {
    let app = Router::new().route(
        "/api/products",
        post(|_multipart: Multipart| async { StatusCode::BAD_GATEWAY }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let err = commerce::submit_draft(&client, &config, &ProductDraft::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UpstreamStatus(StatusCode::BAD_GATEWAY)));
}

#[tokio::test]
async fn list_customers_decodes_the_roster() {
    let app = Router::new().route(
        "/api/auth/customers",
        get(|| async {
            Json(json!([
                { "_id": "c1", "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "phone": "555-0100" },
                { "firstName": "Grace" }
            ]))
        }),
    );
    let config = spawn_stub(app).await;
    let client = reqwest::Client::new();

    let customers = commerce::list_customers(&client, &config).await.unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].first_name, "Ada");
    assert_eq!(customers[0].email, "ada@example.com");
    assert_eq!(customers[1].last_name, "");
    assert_eq!(customers[1].phone, "");
}
