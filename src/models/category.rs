use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use utoipa::ToSchema;
use uuid::Uuid;

/// A named grouping that every product references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The unique identifier for the category.
    pub id: Uuid,
    /// The title-cased display name.
    #[schema(max_length = 50, example = "Electronics")]
    pub name: String,
    /// An optional description.
    pub description: Option<String>,
    /// The URL-safe identifier derived from the name.
    #[schema(example = "electronics")]
    pub slug: String,
    /// Whether the category is active.
    pub is_active: bool,
    /// The timestamp when the category was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the category was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Category {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            slug: row.try_get("slug")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A normalized category about to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
}

/// The body of a category create request.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CategoryDraft {
    #[garde(length(chars, max = 50))]
    #[schema(max_length = 50)]
    pub name: Option<String>,
    #[garde(length(chars, max = 500))]
    pub description: Option<String>,
}

/// A partial update: absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[garde(length(chars, max = 50))]
    #[schema(max_length = 50)]
    pub name: Option<String>,
    #[garde(length(chars, max = 500))]
    pub description: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
}
