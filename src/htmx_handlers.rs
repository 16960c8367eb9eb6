// src/htmx_handlers.rs

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde_json::json;
use strum::IntoEnumIterator;

use crate::commerce;
use crate::draft::{ImageEntry, ProductDraft};
use crate::errors::AppError;
use crate::models::{
    Customer, DashboardSection, Order, OrderStatus, Product, ProductStatus, ShippingClass,
};
use crate::response::build_response;
use crate::state::AppState;

// --- Shell ---

const TOAST_AND_MODAL_JS: &str = r#"
document.body.addEventListener('showMessage', function (evt) {
    var detail = evt.detail || {};
    var toast = document.createElement('div');
    toast.textContent = detail.message || '';
    toast.className = 'fixed bottom-4 right-4 px-4 py-3 rounded shadow-lg text-white z-50 '
        + (detail.type === 'error' ? 'bg-red-600' : 'bg-green-600');
    document.body.appendChild(toast);
    setTimeout(function () { toast.remove(); }, 4000);
});
document.body.addEventListener('closeProductModal', function () {
    var root = document.getElementById('modal-root');
    if (root) { root.innerHTML = ''; }
});
document.addEventListener('click', function (evt) {
    var link = evt.target.closest('.nav-item');
    if (!link) { return; }
    document.querySelectorAll('.nav-item').forEach(function (el) {
        el.classList.remove('bg-blue-500', 'text-white');
        el.classList.add('hover:bg-gray-100', 'text-gray-700');
    });
    link.classList.add('bg-blue-500', 'text-white');
    link.classList.remove('hover:bg-gray-100', 'text-gray-700');
});
"#;

pub fn render_layout(active: DashboardSection, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Seller Dashboard" }
                script src="https://unpkg.com/htmx.org@1.9.12" {}
                script src="https://cdn.tailwindcss.com" {}
            }
            body ."flex h-screen bg-gray-50" {
                div ."w-64 bg-white border-r shadow-md flex flex-col" {
                    div ."p-5 border-b" {
                        h1 ."text-2xl font-bold text-gray-800" { "Seller Dashboard" }
                    }
                    nav ."p-4" {
                        @for section in DashboardSection::iter() {
                            @let base = "nav-item w-full text-left p-3 rounded flex items-center space-x-3 mb-2";
                            @let classes = if section == active {
                                format!("{} bg-blue-500 text-white", base)
                            } else {
                                format!("{} hover:bg-gray-100 text-gray-700", base)
                            };
                            button
                                class=(classes)
                                hx-get=(format!("/htmx/section/{}", section))
                                hx-target="#content"
                                hx-swap="innerHTML"
                            {
                                span { (section.label()) }
                            }
                        }
                    }
                    div ."border-t p-4 mt-auto" {
                        button ."w-full text-left p-3 rounded flex items-center space-x-3 hover:bg-gray-100 text-gray-700" {
                            span { "Settings" }
                        }
                        button ."w-full text-left p-3 rounded flex items-center space-x-3 hover:bg-gray-100 text-gray-700" {
                            span { "Logout" }
                        }
                    }
                }
                div ."flex-1 p-6 overflow-y-auto" {
                    div #content ."max-w-7xl mx-auto" {
                        (content)
                    }
                }
                div #modal-root {}
                script { (PreEscaped(TOAST_AND_MODAL_JS)) }
            }
        }
    }
}

// --- Section routing ---

pub async fn root_page(State(app_state): State<AppState>) -> Result<Markup, AppError> {
    let content = render_section(&app_state, DashboardSection::Dashboard).await?;
    Ok(render_layout(DashboardSection::Dashboard, content))
}

pub async fn section_handler(
    State(app_state): State<AppState>,
    Path(section): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let section: DashboardSection = section
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown section '{}'", section)))?;
    tracing::info!("Rendering section: {}", section);

    let content = render_section(&app_state, section).await?;
    Ok(build_response(&headers, section, content))
}

async fn render_section(
    app_state: &AppState,
    section: DashboardSection,
) -> Result<Markup, AppError> {
    Ok(match section {
        DashboardSection::Dashboard => {
            let product_manager = refreshed_product_manager(app_state).await;
            let orders = app_state.orders.read().await.clone();
            html! {
                div {
                    (render_stat_tiles())
                    div ."grid md:grid-cols-2 gap-6" {
                        (product_manager)
                        (render_order_manager(&orders))
                    }
                }
            }
        }
        DashboardSection::Products => refreshed_product_manager(app_state).await,
        DashboardSection::Orders => {
            let orders = app_state.orders.read().await.clone();
            render_order_manager(&orders)
        }
        DashboardSection::Customers => {
            let customers = match commerce::list_customers(&app_state.http_client, &app_state.commerce).await {
                Ok(customers) => customers,
                Err(e) => {
                    // Swallowed at this call site: the table just renders empty.
                    tracing::error!("Error fetching customers: {:?}", e);
                    Vec::new()
                }
            };
            render_customer_manager(&customers)
        }
        DashboardSection::Analytics => render_analytics_placeholder(),
    })
}

/// Fetches the collection, replaces the local one wholesale, and renders the
/// manager. Any fetch or decode failure clears the collection to empty.
async fn refreshed_product_manager(app_state: &AppState) -> Markup {
    let products = match commerce::list_products(&app_state.http_client, &app_state.commerce).await
    {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Error fetching products: {:?}", e);
            Vec::new()
        }
    };
    {
        let mut local = app_state.products.write().await;
        *local = products.clone();
    }
    render_product_manager(&products)
}

/// GET /htmx/products — the manager re-fetches itself through this route on
/// the `reloadProductList` trigger a successful form submission fires.
pub async fn product_manager_handler(State(app_state): State<AppState>) -> Markup {
    refreshed_product_manager(&app_state).await
}

// --- Dashboard stats ---

pub fn render_stat_tiles() -> Markup {
    // Placeholder numbers, wired to no data source.
    let stats = [
        ("Total Sales", "$54,320", "bg-blue-100"),
        ("Total Orders", "342", "bg-green-100"),
        ("Active Products", "56", "bg-purple-100"),
        ("Total Revenue", "$78,590", "bg-orange-100"),
    ];
    html! {
        div ."grid grid-cols-1 md:grid-cols-4 gap-4 mb-6" {
            @for (title, value, color) in stats {
                div class=(format!("{} p-4 rounded-lg shadow-md hover:shadow-lg transition-all", color)) {
                    h3 ."text-gray-600 text-sm mb-2" { (title) }
                    p ."text-2xl font-bold text-gray-800" { (value) }
                }
            }
        }
    }
}

// --- Product manager ---

pub fn render_product_manager(products: &[Product]) -> Markup {
    html! {
        div #product-manager
            ."overflow-x-auto bg-white shadow-md rounded-lg"
            hx-get="/htmx/products"
            hx-trigger="reloadProductList from:body"
            hx-target="this"
            hx-swap="outerHTML"
        {
            div ."flex justify-between items-center p-4 border-b" {
                h2 ."text-xl font-semibold" { "Product Inventory" }
                button
                    hx-get="/htmx/products/form"
                    hx-target="#modal-root"
                    hx-swap="innerHTML"
                    class="bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600 transition-colors"
                {
                    "Add Product"
                }
            }
            form ."flex items-end gap-2 p-4 border-b bg-gray-50"
                hx-post="/htmx/products/quick-add"
                hx-target="#product-rows"
                hx-swap="innerHTML"
            {
                div {
                    label ."block text-xs text-gray-500" { "Name" }
                    input ."border rounded px-2 py-1 text-sm" type="text" name="name";
                }
                div {
                    label ."block text-xs text-gray-500" { "Price" }
                    input ."border rounded px-2 py-1 text-sm w-24" type="number" name="price" min="0" step="0.01";
                }
                div {
                    label ."block text-xs text-gray-500" { "Stock" }
                    input ."border rounded px-2 py-1 text-sm w-20" type="number" name="stock" min="0";
                }
                button type="submit"
                    class="bg-gray-700 text-white px-3 py-1.5 rounded text-sm hover:bg-gray-800" {
                    "Quick Add"
                }
            }
            div ."overflow-x-auto" {
                table ."w-full table-auto" {
                    thead ."bg-gray-100" {
                        tr {
                            th ."p-3 text-left text-sm font-medium text-gray-600" { "Product Name" }
                            th ."p-3 text-left text-sm font-medium text-gray-600" { "Price" }
                            th ."p-3 text-left text-sm font-medium text-gray-600" { "Stock" }
                            th ."p-3 text-left text-sm font-medium text-gray-600" { "Image" }
                            th ."p-3 text-left text-sm font-medium text-gray-600" { "Actions" }
                        }
                    }
                    tbody #product-rows {
                        (render_product_rows(products))
                    }
                }
            }
        }
    }
}

pub fn render_product_rows(products: &[Product]) -> Markup {
    html! {
        @if products.is_empty() {
            tr {
                td colspan="5" ."p-3 text-center text-gray-500" { "No products available." }
            }
        } @else {
            @for product in products {
                @let ident = product.identifier().unwrap_or("").to_string();
                tr ."border-b hover:bg-gray-50" {
                    td ."p-3" { (product.name) }
                    td ."p-3" { "$" (product.price.unwrap_or(0.0)) }
                    td ."p-3" { (product.stock.unwrap_or(0)) }
                    td ."p-3" {
                        @if let Some(first) = product.images.first() {
                            img src=(first) alt=(product.name) width="50";
                        } @else {
                            span { "No image" }
                        }
                    }
                    td ."p-3 space-x-2" {
                        button
                            hx-get=(format!("/htmx/products/{}/form", urlencoding::encode(&ident)))
                            hx-target="#modal-root"
                            hx-swap="innerHTML"
                            class="bg-green-500 text-white px-2 py-1 rounded text-sm hover:bg-green-600"
                        {
                            "Edit"
                        }
                        button
                            hx-delete=(format!("/htmx/products/{}", urlencoding::encode(&ident)))
                            hx-target="#product-rows"
                            hx-swap="innerHTML"
                            class="bg-red-500 text-white px-2 py-1 rounded text-sm hover:bg-red-600"
                        {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

// --- Product form dialog ---

pub fn render_product_form(
    draft_id: uuid::Uuid,
    draft: &ProductDraft,
    categories: &[String],
) -> Markup {
    let title = if draft.is_edit() { "Edit Product" } else { "Add New Product" };
    let submit_label = if draft.is_edit() { "Update Product" } else { "Create Product" };

    html! {
        div ."fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center z-40" {
            div ."bg-white rounded-lg shadow-xl w-full max-w-3xl max-h-[90vh] overflow-y-auto" {
                div ."flex justify-between items-center p-4 border-b" {
                    h2 ."text-lg font-semibold" { (title) }
                    button type="button"
                        onclick="document.getElementById('modal-root').innerHTML=''"
                        class="text-gray-500 hover:text-gray-800 text-xl leading-none" { "\u{00d7}" }
                }
                form
                    hx-post=(format!("/htmx/form/{}/submit", draft_id))
                    hx-encoding="multipart/form-data"
                    hx-swap="none"
                {
                    div ."p-4 space-y-4" {
                        h3 ."text-md font-semibold text-gray-800" { "Basic Information" }
                        div ."grid grid-cols-1 md:grid-cols-2 gap-4" {
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Product Name" }
                                input ."w-full border rounded px-3 py-2" type="text" name="name" value=(draft.name) required;
                            }
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "SKU" }
                                input ."w-full border rounded px-3 py-2" type="text" name="sku" value=(draft.sku) required;
                            }
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Price ($)" }
                                input ."w-full border rounded px-3 py-2" type="number" name="price"
                                    value=(decimal_attr(draft.price)) min="0" step="0.01" required;
                            }
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Stock Quantity" }
                                input ."w-full border rounded px-3 py-2" type="number" name="stock"
                                    value=(draft.stock.map(|v| v.to_string()).unwrap_or_default()) min="0" required;
                            }
                        }
                        (render_category_field(draft_id, &draft.category, categories))
                        div {
                            label ."block text-sm text-gray-600 mb-1" { "Description" }
                            textarea ."w-full border rounded px-3 py-2" name="description" rows="4" {
                                (draft.description)
                            }
                        }
                        div {
                            span ."block text-sm text-gray-600 mb-1" { "Product Status" }
                            div ."flex space-x-6" {
                                @for status in ProductStatus::iter() {
                                    label ."inline-flex items-center space-x-2" {
                                        input type="radio" name="status" value=(status)
                                            checked[draft.status == Some(status)];
                                        span ."capitalize" { (status) }
                                    }
                                }
                            }
                        }
                        div {
                            label ."block text-sm text-gray-600 mb-1" { "Shipping Class" }
                            select ."w-full border rounded px-3 py-2" name="shippingClass" required {
                                option value="" disabled selected[draft.shipping_class.is_none()] { "Select a class" }
                                @for class in ShippingClass::iter() {
                                    option value=(class) selected[draft.shipping_class == Some(class)] {
                                        (class.label())
                                    }
                                }
                            }
                        }

                        h3 ."text-md font-semibold text-gray-800" { "Features" }
                        div ."flex gap-2" {
                            input #new-feature-input ."flex-1 border rounded px-3 py-2"
                                type="text" name="feature" placeholder="Add Feature";
                            button type="button"
                                hx-post=(format!("/htmx/form/{}/features", draft_id))
                                hx-include="#new-feature-input"
                                hx-target="#feature-list"
                                hx-swap="outerHTML"
                                class="bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600" {
                                "Add"
                            }
                        }
                        (render_feature_list(draft_id, &draft.features))

                        h3 ."text-md font-semibold text-gray-800" { "Shipping Information" }
                        div {
                            label ."block text-sm text-gray-600 mb-1" { "Weight (kg)" }
                            input ."w-full border rounded px-3 py-2" type="number" name="weight"
                                value=(decimal_attr(draft.weight)) min="0" step="0.1";
                        }
                        div ."grid grid-cols-3 gap-4" {
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Length (cm)" }
                                input ."w-full border rounded px-3 py-2" type="number" name="length"
                                    value=(decimal_attr(draft.dimensions.length)) min="0";
                            }
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Width (cm)" }
                                input ."w-full border rounded px-3 py-2" type="number" name="width"
                                    value=(decimal_attr(draft.dimensions.width)) min="0";
                            }
                            div {
                                label ."block text-sm text-gray-600 mb-1" { "Height (cm)" }
                                input ."w-full border rounded px-3 py-2" type="number" name="height"
                                    value=(decimal_attr(draft.dimensions.height)) min="0";
                            }
                        }

                        h3 ."text-md font-semibold text-gray-800" { "Product Images" }
                        (render_image_list(draft_id, &draft.images))
                    }
                    div ."flex justify-end gap-2 p-4 border-t" {
                        button type="button"
                            onclick="document.getElementById('modal-root').innerHTML=''"
                            class="px-4 py-2 rounded text-gray-600 hover:bg-gray-100" { "Cancel" }
                        button type="submit"
                            class="bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600" {
                            (submit_label)
                        }
                    }
                }
            }
        }
    }
}

pub fn render_category_field(
    draft_id: uuid::Uuid,
    selected: &str,
    categories: &[String],
) -> Markup {
    html! {
        div #category-field {
            label ."block text-sm text-gray-600 mb-1" { "Category" }
            select ."w-full border rounded px-3 py-2" name="category" required {
                option value="" disabled selected[selected.is_empty()] { "Select a category" }
                // An edit-mode draft may carry a category the shared set has
                // never seen; keep it selectable.
                @if !selected.is_empty() && !categories.iter().any(|c| c == selected) {
                    option value=(selected) selected { (selected) }
                }
                @for category in categories {
                    option value=(category) selected[category == selected] { (category) }
                }
            }
            div ."flex gap-2 mt-2" {
                input #new-category-input ."flex-1 border rounded px-3 py-2"
                    type="text" name="newCategory" placeholder="New Category";
                button type="button"
                    hx-post=(format!("/htmx/form/{}/category", draft_id))
                    hx-include="#new-category-input"
                    hx-target="#category-field"
                    hx-swap="outerHTML"
                    class="bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600" {
                    "Add Category"
                }
            }
        }
    }
}

pub fn render_feature_list(draft_id: uuid::Uuid, features: &[String]) -> Markup {
    html! {
        div #feature-list ."space-y-1" {
            @if features.is_empty() {
                p ."text-sm text-gray-400" { "No features added." }
            } @else {
                @for feature in features {
                    div ."flex items-center justify-between border rounded px-3 py-1.5 text-sm" {
                        span { (feature) }
                        button type="button"
                            hx-post=(format!("/htmx/form/{}/features/remove", draft_id))
                            hx-vals=(json!({ "value": feature }).to_string())
                            hx-target="#feature-list"
                            hx-swap="outerHTML"
                            class="text-red-500 hover:text-red-700" {
                            "Remove"
                        }
                    }
                }
            }
        }
    }
}

pub fn render_image_list(draft_id: uuid::Uuid, images: &[ImageEntry]) -> Markup {
    html! {
        div #image-list {
            div ."flex items-center gap-2" {
                input #image-file-input ."text-sm" type="file" name="images" multiple accept="image/*";
                // type=button keeps this out of the dialog's own submit; the
                // file input travels via hx-include instead.
                button type="button"
                    hx-post=(format!("/htmx/form/{}/images", draft_id))
                    hx-encoding="multipart/form-data"
                    hx-include="#image-file-input"
                    hx-target="#image-list"
                    hx-swap="outerHTML"
                    class="bg-gray-700 text-white px-3 py-1.5 rounded text-sm hover:bg-gray-800" {
                    "Upload Images"
                }
            }
            p ."text-sm text-gray-500 mt-1" { (images.len()) " image(s) selected" }
            div ."space-y-1 mt-2" {
                @for (index, entry) in images.iter().enumerate() {
                    div ."flex items-center justify-between border rounded px-3 py-1.5 text-sm" {
                        @match entry {
                            ImageEntry::Existing(url) => {
                                span ."truncate max-w-md" { (url) }
                            }
                            ImageEntry::Upload(upload) => {
                                span { (upload.filename) " (" (upload.bytes.len()) " bytes)" }
                            }
                        }
                        button type="button"
                            hx-post=(format!("/htmx/form/{}/images/remove", draft_id))
                            hx-vals=(json!({ "index": index }).to_string())
                            hx-target="#image-list"
                            hx-swap="outerHTML"
                            class="text-red-500 hover:text-red-700" {
                            "Remove"
                        }
                    }
                }
            }
        }
    }
}

// --- Order manager ---

pub fn render_order_manager(orders: &[Order]) -> Markup {
    html! {
        div #order-manager ."bg-white shadow-md rounded-lg overflow-hidden" {
            div ."p-4 border-b" {
                h2 ."text-xl font-semibold" { "Order Management" }
            }
            table ."w-full" {
                thead ."bg-gray-100" {
                    tr {
                        @for header in ["Order ID", "Customer", "Total", "Status", "Actions"] {
                            th ."p-3 text-left text-sm font-medium text-gray-600" { (header) }
                        }
                    }
                }
                tbody {
                    @for order in orders {
                        tr ."border-b hover:bg-gray-50" {
                            td ."p-3" { (order.id) }
                            td ."p-3" { (order.customer) }
                            td ."p-3" { "$" (order.total) }
                            td ."p-3" {
                                @let badge = match order.status {
                                    OrderStatus::Shipped => "bg-green-100 text-green-800",
                                    OrderStatus::Processing => "bg-yellow-100 text-yellow-800",
                                    OrderStatus::Delivered => "bg-blue-100 text-blue-800",
                                };
                                span class=(format!("px-2 py-1 rounded text-sm {}", badge)) {
                                    (order.status)
                                }
                            }
                            td ."p-3" {
                                button
                                    hx-post=(format!("/htmx/orders/{}/deliver", order.id))
                                    hx-target="#order-manager"
                                    hx-swap="outerHTML"
                                    class="bg-blue-500 text-white px-2 py-1 rounded text-sm hover:bg-blue-600" {
                                    "View"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

// --- Customer manager ---

pub fn render_customer_manager(customers: &[Customer]) -> Markup {
    html! {
        div ."bg-white shadow-md rounded-lg overflow-hidden p-4" {
            h2 ."text-xl font-semibold mb-4" { "Customer Management" }
            div ."overflow-x-auto" {
                table ."w-full border-collapse border border-gray-200" {
                    thead {
                        tr ."bg-gray-100 border-b" {
                            th ."p-3 text-left border" { "Name" }
                            th ."p-3 text-left border" { "Email" }
                            th ."p-3 text-left border" { "Phone" }
                        }
                    }
                    tbody {
                        @if customers.is_empty() {
                            tr {
                                td colspan="3" ."p-3 text-center text-gray-500" { "No customers found." }
                            }
                        } @else {
                            @for customer in customers {
                                tr ."border-b hover:bg-gray-50" {
                                    td ."p-3 border" { (customer.first_name) " " (customer.last_name) }
                                    td ."p-3 border" { (customer.email) }
                                    td ."p-3 border" { (customer.phone) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_analytics_placeholder() -> Markup {
    html! {
        div ."bg-white shadow-md rounded-lg p-8 text-center text-gray-500" {
            h2 ."text-xl font-semibold mb-2 text-gray-700" { "Analytics" }
            p { "Analytics reporting is not wired up yet." }
        }
    }
}

fn decimal_attr(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
