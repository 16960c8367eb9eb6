// src/commerce.rs
//
// The one data-access module for the remote commerce API. Every view goes
// through these functions; none of them touch dashboard state.

use reqwest::{Client, StatusCode, multipart};

use crate::draft::{ProductDraft, SubmissionPart};
use crate::errors::AppError;
use crate::models::{Customer, Product};
use crate::state::CommerceConfig;

pub async fn list_products(
    client: &Client,
    config: &CommerceConfig,
) -> Result<Vec<Product>, AppError> {
    let url = config.endpoint("/products");
    tracing::debug!("GET {}", url);

    let resp = client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let error_text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        tracing::error!("Product list fetch failed: status={}, body={}", status, error_text);
        return Err(AppError::UpstreamStatus(status));
    }

    resp.json::<Vec<Product>>().await.map_err(|e| {
        tracing::error!("Could not decode product list: {}", e);
        AppError::UpstreamDecode(e.to_string())
    })
}

pub async fn fetch_product(
    client: &Client,
    config: &CommerceConfig,
    product_id: &str,
) -> Result<Product, AppError> {
    let url = config.endpoint(&format!("/products/{}", product_id));
    tracing::debug!("GET {}", url);

    let resp = client.get(&url).send().await?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        tracing::warn!("Product {} not found upstream", product_id);
        return Err(AppError::NotFound);
    }
    if !status.is_success() {
        let error_text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        tracing::error!(
            "Product {} fetch failed: status={}, body={}",
            product_id,
            status,
            error_text
        );
        return Err(AppError::UpstreamStatus(status));
    }

    resp.json::<Product>().await.map_err(|e| {
        tracing::error!("Could not decode product {}: {}", product_id, e);
        AppError::UpstreamDecode(e.to_string())
    })
}

/// JSON create. Returns the created record when the service answers 201,
/// `None` for any other success status (nothing to append locally).
pub async fn create_product(
    client: &Client,
    config: &CommerceConfig,
    body: &serde_json::Value,
) -> Result<Option<Product>, AppError> {
    let url = config.endpoint("/products");
    tracing::debug!("POST {} (json)", url);

    let resp = client.post(&url).json(body).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let error_text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        tracing::error!("Product create failed: status={}, body={}", status, error_text);
        return Err(AppError::UpstreamStatus(status));
    }
    if status != StatusCode::CREATED {
        tracing::warn!("Product create answered {} instead of 201", status);
        return Ok(None);
    }

    resp.json::<Product>().await.map(Some).map_err(|e| {
        tracing::error!("Could not decode created product: {}", e);
        AppError::UpstreamDecode(e.to_string())
    })
}

/// Sends a draft as its multipart submission: POST to the collection in
/// create mode, PUT to the item in edit mode.
pub async fn submit_draft(
    client: &Client,
    config: &CommerceConfig,
    draft: &ProductDraft,
) -> Result<(), AppError> {
    let (method, path) = draft.endpoint();
    let url = config.endpoint(&path);
    tracing::info!("{} {} (multipart)", method, url);

    let mut form = multipart::Form::new();
    for part in draft.submission_parts() {
        match part {
            SubmissionPart::Text { name, value } => {
                form = form.text(name, value);
            }
            SubmissionPart::File { name, filename, bytes } => {
                let file_part = multipart::Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str("image/*")?;
                form = form.part(name, file_part);
            }
        }
    }

    let resp = client.request(method, &url).multipart(form).send().await?;
    let status = resp.status();
    if status == StatusCode::OK || status == StatusCode::CREATED {
        return Ok(());
    }

    let error_text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
    tracing::error!("Draft submission failed: status={}, body={}", status, error_text);
    Err(AppError::UpstreamStatus(status))
}

/// Issues the DELETE and hands the status back; the caller decides what
/// 200/204 versus anything else means for its local collection.
pub async fn delete_product(
    client: &Client,
    config: &CommerceConfig,
    product_id: &str,
) -> Result<StatusCode, AppError> {
    let url = config.endpoint(&format!("/products/{}", product_id));
    tracing::info!("DELETE {}", url);

    let resp = client.delete(&url).send().await?;
    Ok(resp.status())
}

pub async fn list_customers(
    client: &Client,
    config: &CommerceConfig,
) -> Result<Vec<Customer>, AppError> {
    let url = config.endpoint("/auth/customers");
    tracing::debug!("GET {}", url);

    let resp = client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let error_text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        tracing::error!("Customer list fetch failed: status={}, body={}", status, error_text);
        return Err(AppError::UpstreamStatus(status));
    }

    resp.json::<Vec<Customer>>().await.map_err(|e| {
        tracing::error!("Could not decode customer list: {}", e);
        AppError::UpstreamDecode(e.to_string())
    })
}
