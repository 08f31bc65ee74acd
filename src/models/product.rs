use axum::body::Bytes;
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The unique identifier for the product.
    pub id: Uuid,
    /// The trimmed product name.
    pub name: String,
    /// The price; always strictly positive.
    pub price: f64,
    /// The durable URL of the product image.
    pub image: String,
    /// An optional description.
    pub description: Option<String>,
    /// An optional discount percentage between 0 and 100.
    pub discount: Option<f64>,
    /// The category this product belongs to.
    pub category: Uuid,
    /// The timestamp when the product was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Product {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            image: row.try_get("image")?,
            description: row.try_get("description")?,
            discount: row.try_get("discount")?,
            category: row.try_get("category_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A product with its category's display name populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}

/// A validated product about to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub description: Option<String>,
    pub discount: Option<f64>,
    pub category: Uuid,
}

/// Product fields as submitted. On create, `name`, `price` and `category`
/// are required; on update every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductFields {
    #[garde(length(chars, max = 200))]
    pub name: Option<String>,
    #[garde(skip)]
    pub price: Option<f64>,
    #[garde(skip)]
    pub category: Option<String>,
    #[garde(length(chars, max = 2000))]
    pub description: Option<String>,
    #[garde(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
}

/// An uploaded image buffer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Filters for listing products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<Uuid>,
    /// Case-insensitive substring over name or description.
    pub search: Option<String>,
}
