use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::owner::{NewOwner, Owner},
    repositories::{OWNER_EXISTS, OwnerRepository},
};

const OWNER_COLUMNS: &str = "id, fullname, email, password_hash, created_at, updated_at";

/// Owner accounts stored in PostgreSQL.
#[derive(Clone)]
pub struct PgOwnerRepository {
    pool: Pool,
}

impl PgOwnerRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn count(&self) -> Result<i64> {
        let client = self.pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM owners", &[]).await?;
        Ok(row.try_get(0)?)
    }

    async fn insert(&self, owner: NewOwner) -> Result<Owner> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO owners (id, fullname, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {OWNER_COLUMNS}"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client
            .query_one(
                &statement,
                &[&Uuid::new_v4(), &owner.fullname, &owner.email, &owner.password_hash],
            )
            .await
            .map_err(|e| AppError::conflict_on_unique(e, OWNER_EXISTS))?;

        Ok(Owner::try_from(&row)?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {OWNER_COLUMNS} FROM owners WHERE lower(email) = lower($1)");
        let statement = client.prepare_cached(&sql).await?;
        let row = client.query_opt(&statement, &[&email]).await?;

        Ok(row.as_ref().map(Owner::try_from).transpose()?)
    }
}
