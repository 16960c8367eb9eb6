// src/draft.rs
//
// The product form controller: a mutable draft mirroring one product's
// fields, seeded from a fetched record when editing and from empty defaults
// when creating, and flattened into the multipart submission the commerce
// service expects.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{Dimensions, Product, ProductStatus, ShippingClass};

/// Files above this size are refused; one oversized file drops its whole
/// selection batch, never a partial prefix.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum DraftMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One entry of the draft's ordered image sequence: either a reference the
/// record already carries, or a pending upload added in this dialog.
#[derive(Debug, Clone)]
pub enum ImageEntry {
    Existing(String),
    Upload(ImageUpload),
}

/// A flattened piece of the multipart submission. Kept as plain data so the
/// payload layout is testable without a running HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPart {
    Text { name: String, value: String },
    File { name: String, filename: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
pub struct ProductDraft {
    mode: DraftMode,
    pub name: String,
    pub sku: String,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: String,
    pub description: String,
    pub status: Option<ProductStatus>,
    pub weight: Option<f64>,
    pub dimensions: Dimensions,
    pub shipping_class: Option<ShippingClass>,
    pub features: Vec<String>,
    pub images: Vec<ImageEntry>,
}

impl ProductDraft {
    pub fn new() -> Self {
        ProductDraft {
            mode: DraftMode::Create,
            name: String::new(),
            sku: String::new(),
            price: None,
            stock: None,
            category: String::new(),
            description: String::new(),
            status: None,
            weight: None,
            dimensions: Dimensions::default(),
            shipping_class: None,
            features: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Seeds an edit-mode draft from a fetched record. `product_id` is the
    /// identifier the row was opened with; it never changes afterwards.
    pub fn from_product(product_id: String, product: &Product) -> Self {
        ProductDraft {
            mode: DraftMode::Edit(product_id),
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
            stock: product.stock,
            category: product.category.clone(),
            description: product.description.clone(),
            status: product.status,
            weight: product.weight,
            dimensions: product.dimensions,
            shipping_class: product.shipping_class,
            features: product.features.clone(),
            images: product
                .images
                .iter()
                .cloned()
                .map(ImageEntry::Existing)
                .collect(),
        }
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DraftMode::Edit(_))
    }

    /// HTTP verb and item/collection path the submission targets.
    pub fn endpoint(&self) -> (reqwest::Method, String) {
        match &self.mode {
            DraftMode::Create => (reqwest::Method::POST, "/products".to_string()),
            DraftMode::Edit(id) => (reqwest::Method::PUT, format!("/products/{}", id)),
        }
    }

    /// Applies one batch of scalar form fields. Everything is parsed before
    /// anything is assigned, so a bad value leaves the draft exactly as it
    /// was. Absent keys leave their field untouched; a present-but-empty
    /// value clears it.
    pub fn apply_scalar_fields(
        &mut self,
        fields: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let price = parse_decimal_field(fields, "price")?;
        let stock = parse_integer_field(fields, "stock")?;
        let weight = parse_decimal_field(fields, "weight")?;
        let length = parse_decimal_field(fields, "length")?;
        let width = parse_decimal_field(fields, "width")?;
        let height = parse_decimal_field(fields, "height")?;

        let status = match fields.get("status").map(String::as_str) {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(raw.parse::<ProductStatus>().map_err(|_| {
                AppError::UnprocessableEntity(format!("Invalid value for 'status': {}", raw))
            })?)),
        };
        let shipping_class = match fields.get("shippingClass").map(String::as_str) {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(raw.parse::<ShippingClass>().map_err(|_| {
                AppError::UnprocessableEntity(format!("Invalid value for 'shippingClass': {}", raw))
            })?)),
        };

        if let Some(name) = fields.get("name") {
            self.name = name.clone();
        }
        if let Some(sku) = fields.get("sku") {
            self.sku = sku.clone();
        }
        if let Some(category) = fields.get("category") {
            self.category = category.clone();
        }
        if let Some(description) = fields.get("description") {
            self.description = description.clone();
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = stock {
            self.stock = v;
        }
        if let Some(v) = weight {
            self.weight = v;
        }
        if let Some(v) = length {
            self.dimensions.length = v;
        }
        if let Some(v) = width {
            self.dimensions.width = v;
        }
        if let Some(v) = height {
            self.dimensions.height = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = shipping_class {
            self.shipping_class = v;
        }

        Ok(())
    }

    /// Adds a feature unless it is blank after trimming. The stored value
    /// keeps its original whitespace.
    pub fn add_feature(&mut self, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }
        self.features.push(raw.to_string());
        true
    }

    /// Removes exactly one feature matching `value`, keeping the order of
    /// the rest. Duplicates beyond the first match stay.
    pub fn remove_feature(&mut self, value: &str) -> bool {
        match self.features.iter().position(|f| f == value) {
            Some(idx) => {
                self.features.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Appends a batch of uploads. If any file in the batch exceeds the size
    /// limit the whole batch is dropped and the sequence stays unchanged.
    pub fn append_images(&mut self, batch: Vec<ImageUpload>) -> bool {
        if batch.iter().any(|u| u.bytes.len() > MAX_IMAGE_BYTES) {
            return false;
        }
        self.images
            .extend(batch.into_iter().map(ImageEntry::Upload));
        true
    }

    /// Removes the image at `index`, preserving the order of the rest.
    pub fn remove_image(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.images.remove(index);
            true
        } else {
            false
        }
    }

    pub fn select_category(&mut self, name: &str) {
        self.category = name.to_string();
    }

    /// Flattens the draft into the multipart layout the commerce service
    /// expects: every scalar as a string part (unset renders empty), the
    /// dimension trio under bracketed keys, features comma-joined, existing
    /// image references as repeated text parts and pending uploads as
    /// repeated file parts, all under the name `images`.
    pub fn submission_parts(&self) -> Vec<SubmissionPart> {
        let mut parts = vec![
            text_part("name", self.name.clone()),
            text_part("sku", self.sku.clone()),
            text_part("price", decimal_to_string(self.price)),
            text_part("stock", self.stock.map(|v| v.to_string()).unwrap_or_default()),
            text_part("category", self.category.clone()),
            text_part("description", self.description.clone()),
            text_part(
                "status",
                self.status.map(|s| s.to_string()).unwrap_or_default(),
            ),
            text_part("weight", decimal_to_string(self.weight)),
            text_part(
                "shippingClass",
                self.shipping_class
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            ),
            text_part("features", self.features.join(",")),
            text_part("dimensions[length]", decimal_to_string(self.dimensions.length)),
            text_part("dimensions[width]", decimal_to_string(self.dimensions.width)),
            text_part("dimensions[height]", decimal_to_string(self.dimensions.height)),
        ];

        for entry in &self.images {
            match entry {
                ImageEntry::Existing(url) => parts.push(text_part("images", url.clone())),
                ImageEntry::Upload(upload) => parts.push(SubmissionPart::File {
                    name: "images".to_string(),
                    filename: upload.filename.clone(),
                    bytes: upload.bytes.clone(),
                }),
            }
        }

        parts
    }
}

/// Adds `name` to the shared category set unless it is blank after trimming,
/// never inserting a duplicate. Returns the name to select on success.
pub fn add_category_to_set(categories: &mut Vec<String>, name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    if !categories.iter().any(|c| c == name) {
        categories.push(name.to_string());
    }
    Some(name.to_string())
}

fn text_part(name: &str, value: String) -> SubmissionPart {
    SubmissionPart::Text {
        name: name.to_string(),
        value,
    }
}

fn decimal_to_string(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_decimal_field(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Option<f64>>, AppError> {
    match fields.get(key).map(|s| s.trim()) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(raw) => raw
            .parse::<f64>()
            .map(|v| Some(Some(v)))
            .map_err(|_| AppError::UnprocessableEntity(format!("'{}' must be a number", key))),
    }
}

fn parse_integer_field(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Option<i64>>, AppError> {
    match fields.get(key).map(|s| s.trim()) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(raw) => raw
            .parse::<i64>()
            .map(|v| Some(Some(v)))
            .map_err(|_| AppError::UnprocessableEntity(format!("'{}' must be an integer", key))),
    }
}
