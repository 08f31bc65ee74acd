use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::category::{Category, NewCategory},
    repositories::{CATEGORY_EXISTS, CategoryRepository},
};

const CATEGORY_COLUMNS: &str =
    "id, name, description, slug, is_active, created_at, updated_at";

/// Categories stored in PostgreSQL.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at ASC");
        let statement = client.prepare_cached(&sql).await?;
        let rows = client.query(&statement, &[]).await?;

        Ok(rows.iter().map(Category::try_from).collect::<std::result::Result<_, _>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let statement = client.prepare_cached(&sql).await?;
        let row = client.query_opt(&statement, &[&id]).await?;

        Ok(row.as_ref().map(Category::try_from).transpose()?)
    }

    async fn find_by_name(&self, name_key: &str, exclude: Option<Uuid>) -> Result<Option<Category>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE lower(name) = $1 AND ($2::uuid IS NULL OR id <> $2)
             LIMIT 1"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client.query_opt(&statement, &[&name_key, &exclude]).await?;

        Ok(row.as_ref().map(Category::try_from).transpose()?)
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO categories (id, name, description, slug)
             VALUES ($1, $2, $3, $4)
             RETURNING {CATEGORY_COLUMNS}"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client
            .query_one(
                &statement,
                &[&Uuid::new_v4(), &category.name, &category.description, &category.slug],
            )
            .await
            .map_err(|e| AppError::conflict_on_unique(e, CATEGORY_EXISTS))?;

        Ok(Category::try_from(&row)?)
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        let client = self.pool.get().await?;
        let sql = format!(
            "UPDATE categories
             SET name = $2, description = $3, slug = $4, is_active = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client
            .query_opt(
                &statement,
                &[
                    &category.id,
                    &category.name,
                    &category.description,
                    &category.slug,
                    &category.is_active,
                ],
            )
            .await
            .map_err(|e| AppError::conflict_on_unique(e, CATEGORY_EXISTS))?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        Ok(Category::try_from(&row)?)
    }
}
