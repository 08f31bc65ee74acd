use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::product::{NewProduct, Product, ProductFilter},
    repositories::{PRODUCT_EXISTS, ProductRepository},
};

const PRODUCT_COLUMNS: &str =
    "id, name, price, image, description, discount, category_id, created_at, updated_at";

/// Escapes `LIKE` metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Products stored in PostgreSQL.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: Pool,
}

impl PgProductRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::uuid IS NULL OR category_id = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR description ILIKE $2)
             ORDER BY created_at DESC"
        );
        let pattern = filter.search.as_deref().map(like_pattern);
        let statement = client.prepare_cached(&sql).await?;
        let rows = client.query(&statement, &[&filter.category, &pattern]).await?;

        Ok(rows.iter().map(Product::try_from).collect::<std::result::Result<_, _>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let statement = client.prepare_cached(&sql).await?;
        let row = client.query_opt(&statement, &[&id]).await?;

        Ok(row.as_ref().map(Product::try_from).transpose()?)
    }

    async fn find_by_name(&self, name_key: &str, exclude: Option<Uuid>) -> Result<Option<Product>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE lower(name) = $1 AND ($2::uuid IS NULL OR id <> $2)
             LIMIT 1"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client.query_opt(&statement, &[&name_key, &exclude]).await?;

        Ok(row.as_ref().map(Product::try_from).transpose()?)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO products (id, name, price, image, description, discount, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client
            .query_one(
                &statement,
                &[
                    &Uuid::new_v4(),
                    &product.name,
                    &product.price,
                    &product.image,
                    &product.description,
                    &product.discount,
                    &product.category,
                ],
            )
            .await
            .map_err(|e| AppError::conflict_on_unique(e, PRODUCT_EXISTS))?;

        Ok(Product::try_from(&row)?)
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let client = self.pool.get().await?;
        let sql = format!(
            "UPDATE products
             SET name = $2, price = $3, image = $4, description = $5, discount = $6,
                 category_id = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        let statement = client.prepare_cached(&sql).await?;
        let row = client
            .query_opt(
                &statement,
                &[
                    &product.id,
                    &product.name,
                    &product.price,
                    &product.image,
                    &product.description,
                    &product.discount,
                    &product.category,
                ],
            )
            .await
            .map_err(|e| AppError::conflict_on_unique(e, PRODUCT_EXISTS))?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        Ok(Product::try_from(&row)?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let statement = client.prepare_cached("DELETE FROM products WHERE id = $1").await?;
        let deleted = client.execute(&statement, &[&id]).await?;

        Ok(deleted > 0)
    }
}
