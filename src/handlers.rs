// src/handlers.rs

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
};
use maud::Markup;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::commerce;
use crate::draft::{ImageUpload, ProductDraft, add_category_to_set};
use crate::errors::AppError;
use crate::htmx_handlers::{
    render_category_field, render_feature_list, render_image_list, render_order_manager,
    render_product_form, render_product_rows,
};
use crate::models::{OrderStatus, remove_by_identifier};
use crate::state::AppState;

fn toast_headers(message: &str, kind: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let trigger_payload = json!({
        "showMessage": { "message": message, "type": kind }
    });
    if let Ok(val) = HeaderValue::from_str(&trigger_payload.to_string()) {
        headers.insert("HX-Trigger", val);
    }
    headers
}

async fn load_draft(app_state: &AppState, draft_id: Uuid) -> Result<ProductDraft, AppError> {
    app_state.drafts.get(&draft_id).await.ok_or_else(|| {
        tracing::warn!("No open draft with id {}", draft_id);
        AppError::NotFound
    })
}

// --- Product list mutations ---

#[derive(Debug, Deserialize)]
pub struct QuickAddPayload {
    pub name: String,
    pub price: String,
    pub stock: String,
}

/// POST /htmx/products/quick-add. JSON create against the collection
/// endpoint; a 201 appends the server's record to the local collection.
pub async fn quick_add_product_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<QuickAddPayload>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("Quick add: name='{}'", payload.name);

    // The form fields go over the wire as the strings they arrived as; the
    // service owns coercion.
    let body = json!({
        "name": payload.name,
        "price": payload.price,
        "stock": payload.stock,
    });

    let created = commerce::create_product(&app_state.http_client, &app_state.commerce, &body).await?;

    let mut products = app_state.products.write().await;
    let headers = match created {
        Some(product) => {
            products.push(product);
            toast_headers("Product added successfully!", "success")
        }
        None => {
            let mut headers = toast_headers("The service did not confirm the new product.", "error");
            headers.insert("HX-Reswap", HeaderValue::from_static("none"));
            headers
        }
    };

    Ok((headers, render_product_rows(&products)))
}

/// DELETE /htmx/products/{id}. A 200/204 answer splices the row out of the
/// local collection without re-fetching; anything else leaves it untouched.
pub async fn delete_product_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("Deleting product {}", product_id);

    let status =
        commerce::delete_product(&app_state.http_client, &app_state.commerce, &product_id).await?;

    let mut products = app_state.products.write().await;
    let headers = if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
        if !remove_by_identifier(&mut products, &product_id) {
            tracing::warn!("Deleted product {} was not in the local collection", product_id);
        }
        toast_headers("Product deleted successfully!", "success")
    } else {
        tracing::error!("Delete of {} answered with status {}", product_id, status);
        let mut headers = toast_headers("Failed to delete product. Please try again.", "error");
        headers.insert("HX-Reswap", HeaderValue::from_static("none"));
        headers
    };

    Ok((headers, render_product_rows(&products)))
}

// --- Form lifecycle ---

/// GET /htmx/products/form — a fresh create-mode draft.
pub async fn open_create_form_handler(State(app_state): State<AppState>) -> Markup {
    let draft = ProductDraft::new();
    let draft_id = Uuid::new_v4();
    app_state.drafts.insert(draft_id, draft.clone()).await;
    tracing::info!("Opened create draft {}", draft_id);

    let categories = app_state.categories.read().await;
    render_product_form(draft_id, &draft, &categories)
}

/// GET /htmx/products/{id}/form — fetches the record and overwrites a fresh
/// draft with it. The id is fixed for the draft's whole lifetime.
pub async fn open_edit_form_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Markup, AppError> {
    let product =
        commerce::fetch_product(&app_state.http_client, &app_state.commerce, &product_id).await?;

    let draft = ProductDraft::from_product(product_id.clone(), &product);
    let draft_id = Uuid::new_v4();
    app_state.drafts.insert(draft_id, draft.clone()).await;
    tracing::info!("Opened edit draft {} for product {}", draft_id, product_id);

    let categories = app_state.categories.read().await;
    Ok(render_product_form(draft_id, &draft, &categories))
}

// --- Draft operations ---

#[derive(Debug, Deserialize)]
pub struct FeaturePayload {
    #[serde(default)]
    pub feature: String,
}

pub async fn add_feature_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Form(payload): Form<FeaturePayload>,
) -> Result<Markup, AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;
    if !draft.add_feature(&payload.feature) {
        tracing::debug!("Ignoring blank feature on draft {}", draft_id);
    }
    app_state.drafts.insert(draft_id, draft.clone()).await;
    Ok(render_feature_list(draft_id, &draft.features))
}

#[derive(Debug, Deserialize)]
pub struct RemoveFeaturePayload {
    pub value: String,
}

pub async fn remove_feature_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Form(payload): Form<RemoveFeaturePayload>,
) -> Result<Markup, AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;
    draft.remove_feature(&payload.value);
    app_state.drafts.insert(draft_id, draft.clone()).await;
    Ok(render_feature_list(draft_id, &draft.features))
}

/// POST /htmx/form/{id}/images — appends the selected batch. One file over
/// the limit drops the whole batch; that is deliberate and silent apart from
/// the log line.
pub async fn upload_images_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;

    let mut batch: Vec<ImageUpload> = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            tracing::warn!("Received empty file field '{}', skipping", filename);
            continue;
        }
        batch.push(ImageUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    let accepted = batch.len();
    if !draft.append_images(batch) {
        tracing::warn!(
            "Dropped an image batch of {} file(s) on draft {}: at least one file exceeds the size limit",
            accepted,
            draft_id
        );
    }
    app_state.drafts.insert(draft_id, draft.clone()).await;
    Ok(render_image_list(draft_id, &draft.images))
}

#[derive(Debug, Deserialize)]
pub struct RemoveImagePayload {
    pub index: usize,
}

pub async fn remove_image_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Form(payload): Form<RemoveImagePayload>,
) -> Result<Markup, AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;
    draft.remove_image(payload.index);
    app_state.drafts.insert(draft_id, draft.clone()).await;
    Ok(render_image_list(draft_id, &draft.images))
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryPayload {
    #[serde(rename = "newCategory", default)]
    pub new_category: String,
}

/// POST /htmx/form/{id}/category — extends the shared category set (once)
/// and selects the new name in this draft.
pub async fn add_category_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Form(payload): Form<NewCategoryPayload>,
) -> Result<Markup, AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;

    let mut categories = app_state.categories.write().await;
    if let Some(selected) = add_category_to_set(&mut categories, &payload.new_category) {
        draft.select_category(&selected);
        app_state.drafts.insert(draft_id, draft.clone()).await;
    }

    Ok(render_category_field(draft_id, &draft.category, &categories))
}

/// POST /htmx/form/{id}/submit — applies the dialog's scalar fields to the
/// draft transactionally, then sends the multipart submission. Success drops
/// the draft, closes the dialog and tells the list to re-fetch; failure keeps
/// the draft open for retry.
pub async fn submit_draft_handler(
    State(app_state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, HeaderMap, String), AppError> {
    let mut draft = load_draft(&app_state, draft_id).await?;

    let mut text_fields: HashMap<String, String> = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        // File inputs sitting in the dialog are not part of the scalar set;
        // uploads only enter the draft through the dedicated image endpoint.
        if field.file_name().is_some() {
            continue;
        }
        text_fields.insert(field_name, field.text().await?);
    }

    draft.apply_scalar_fields(&text_fields)?;
    // Persist the applied fields first so a failed submission keeps them.
    app_state.drafts.insert(draft_id, draft.clone()).await;

    match commerce::submit_draft(&app_state.http_client, &app_state.commerce, &draft).await {
        Ok(()) => {
            app_state.drafts.invalidate(&draft_id).await;
            let message = if draft.is_edit() {
                "Product updated successfully!"
            } else {
                "Product created successfully!"
            };
            tracing::info!("Draft {} submitted: {}", draft_id, message);

            let mut headers = HeaderMap::new();
            let trigger_payload = json!({
                "closeProductModal": {},
                "reloadProductList": {},
                "showMessage": { "message": message, "type": "success" }
            });
            if let Ok(val) = HeaderValue::from_str(&trigger_payload.to_string()) {
                headers.insert("HX-Trigger", val);
            }
            Ok((StatusCode::OK, headers, String::new()))
        }
        Err(e) => {
            tracing::error!(
                "Submission of draft {} failed, keeping it open for retry: {:?}",
                draft_id,
                e
            );
            Err(e)
        }
    }
}

// --- Orders ---

/// POST /htmx/orders/{id}/deliver — the local status update of the seeded
/// order list; no network call involved.
pub async fn mark_order_delivered_handler(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Markup {
    let mut orders = app_state.orders.write().await;
    if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
        order.status = OrderStatus::Delivered;
        tracing::info!("Order {} marked as delivered", order_id);
    } else {
        tracing::warn!("Order {} not found", order_id);
    }
    render_order_manager(&orders)
}
