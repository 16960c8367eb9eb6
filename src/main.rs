// src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seller_dashboard::handlers::*;
use seller_dashboard::htmx_handlers::{product_manager_handler, root_page, section_handler};
use seller_dashboard::state::{AppState, CommerceConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seller_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting seller dashboard...");

    // The remote commerce API this dashboard administers.
    let commerce_api_url =
        env::var("COMMERCE_API_URL").unwrap_or_else(|_| "http://localhost:3000/api".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    tracing::info!("Commerce API base URL: {}", commerce_api_url);
    let app_state = AppState::new(CommerceConfig {
        base_url: commerce_api_url,
    });

    let app = Router::new()
        .route("/", get(root_page))
        .route("/htmx/section/{section}", get(section_handler))
        .route("/htmx/products", get(product_manager_handler))
        .route("/htmx/products/quick-add", post(quick_add_product_handler))
        .route("/htmx/products/form", get(open_create_form_handler))
        .route("/htmx/products/{id}", delete(delete_product_handler))
        .route("/htmx/products/{id}/form", get(open_edit_form_handler))
        .route("/htmx/form/{draft_id}/features", post(add_feature_handler))
        .route(
            "/htmx/form/{draft_id}/features/remove",
            post(remove_feature_handler),
        )
        .route("/htmx/form/{draft_id}/images", post(upload_images_handler))
        .route(
            "/htmx/form/{draft_id}/images/remove",
            post(remove_image_handler),
        )
        .route("/htmx/form/{draft_id}/category", post(add_category_handler))
        .route("/htmx/form/{draft_id}/submit", post(submit_draft_handler))
        .route(
            "/htmx/orders/{order_id}/deliver",
            post(mark_order_delivered_handler),
        )
        .layer(TraceLayer::new_for_http())
        // Generous request cap: a submission can carry several image files,
        // each up to the per-file limit enforced by the form controller.
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .with_state(app_state);

    let addr: SocketAddr = bind_addr
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    tracing::info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not bind {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}
