// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::draft::ProductDraft;
use crate::models::{Order, Product, seed_orders};

// Open product-form drafts are evicted after an hour of inactivity so an
// abandoned dialog does not pin its uploads in memory forever.
const DRAFT_IDLE_SECS: u64 = 3600;
const DRAFT_CAPACITY: u64 = 1024;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub commerce: CommerceConfig,
    /// The rendered product collection. Replaced wholesale on fetch, spliced
    /// locally on delete, appended on quick add.
    pub products: Arc<RwLock<Vec<Product>>>,
    /// The one shared category set, read by the form dialog and extended by
    /// ad-hoc category creation.
    pub categories: Arc<RwLock<Vec<String>>>,
    pub orders: Arc<RwLock<Vec<Order>>>,
    pub drafts: Cache<Uuid, ProductDraft>,
}

#[derive(Clone)]
pub struct CommerceConfig {
    /// Base URL of the remote commerce API, including the `/api` prefix.
    pub base_url: String,
}

impl CommerceConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl AppState {
    pub fn new(commerce: CommerceConfig) -> Self {
        AppState {
            http_client: reqwest::Client::new(),
            commerce,
            products: Arc::new(RwLock::new(Vec::new())),
            categories: Arc::new(RwLock::new(Vec::new())),
            orders: Arc::new(RwLock::new(seed_orders())),
            drafts: Cache::builder()
                .max_capacity(DRAFT_CAPACITY)
                .time_to_idle(Duration::from_secs(DRAFT_IDLE_SECS))
                .build(),
        }
    }
}
