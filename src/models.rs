// src/models.rs
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProductStatus {
    Active,
    Inactive,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ShippingClass {
    Standard,
    Express,
    Free,
}

impl ShippingClass {
    pub fn label(&self) -> &'static str {
        match self {
            ShippingClass::Standard => "Standard",
            ShippingClass::Express => "Express",
            ShippingClass::Free => "Free Shipping",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// A product as the remote commerce service returns it. Every field is
/// defaulted: responses routinely omit fields, and an absent field decodes to
/// the empty value instead of failing the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    // Older records carry their identifier under "_id" instead.
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default, rename = "shippingClass")]
    pub shipping_class: Option<ShippingClass>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Preferred identifier, legacy spelling first.
    pub fn identifier(&self) -> Option<&str> {
        self.legacy_id.as_deref().or(self.id.as_deref())
    }
}

/// Drops every product whose identifier (either spelling) matches `id`.
/// Returns true when something was removed.
pub fn remove_by_identifier(products: &mut Vec<Product>, id: &str) -> bool {
    let before = products.len();
    products.retain(|p| p.id.as_deref() != Some(id) && p.legacy_id.as_deref() != Some(id));
    products.len() != before
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default, rename = "firstName")]
    pub first_name: String,
    #[serde(default, rename = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
}

/// Order rows are placeholder state: the dashboard wires no order endpoint,
/// so the manager works against a seeded in-memory list.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub total: i64,
    pub status: OrderStatus,
}

pub fn seed_orders() -> Vec<Order> {
    vec![
        Order {
            id: "ORD001".to_string(),
            customer: "John Doe".to_string(),
            total: 1299,
            status: OrderStatus::Shipped,
        },
        Order {
            id: "ORD002".to_string(),
            customer: "Jane Smith".to_string(),
            total: 799,
            status: OrderStatus::Processing,
        },
        Order {
            id: "ORD003".to_string(),
            customer: "Mike Johnson".to_string(),
            total: 599,
            status: OrderStatus::Delivered,
        },
    ]
}

/// Which manager the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DashboardSection {
    Dashboard,
    Products,
    Orders,
    Customers,
    Analytics,
}

impl DashboardSection {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardSection::Dashboard => "Dashboard",
            DashboardSection::Products => "Products",
            DashboardSection::Orders => "Orders",
            DashboardSection::Customers => "Customers",
            DashboardSection::Analytics => "Analytics",
        }
    }
}
