use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

/// The administrative account that manages the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// The unique identifier for the owner.
    pub id: Uuid,
    /// The owner's full name.
    pub fullname: String,
    /// The owner's email address.
    pub email: String,
    /// The Argon2id hash of the owner's password. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The timestamp when the owner was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the owner was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Owner {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            fullname: row.try_get("fullname")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// An owner about to be persisted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
}
