use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        category::{Category, NewCategory},
        owner::{NewOwner, Owner},
        product::{NewProduct, Product, ProductFilter},
    },
    repositories::{
        CATEGORY_EXISTS, CategoryRepository, OWNER_EXISTS, OwnerRepository, PRODUCT_EXISTS,
        ProductRepository,
    },
    validation::catalog::name_key,
};

#[derive(Default)]
struct Collections {
    owners: Vec<Owner>,
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// A process-local store used when no database is configured and in tests.
///
/// Each write holds the lock across its uniqueness check and the mutation,
/// mirroring the unique indexes of the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(category) = filter.category {
        if product.category != category {
            return false;
        }
    }

    match filter.search.as_deref() {
        Some(term) => {
            let term = term.to_lowercase();
            product.name.to_lowercase().contains(&term)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        }
        None => true,
    }
}

#[async_trait]
impl OwnerRepository for MemoryStore {
    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.owners.len() as i64)
    }

    async fn insert(&self, owner: NewOwner) -> Result<Owner> {
        let mut inner = self.inner.write().await;
        let key = name_key(&owner.email);
        if inner.owners.iter().any(|o| name_key(&o.email) == key) {
            return Err(AppError::Conflict(OWNER_EXISTS.to_string()));
        }

        let now = Utc::now();
        let created = Owner {
            id: Uuid::new_v4(),
            fullname: owner.fullname,
            email: owner.email,
            password_hash: owner.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.owners.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>> {
        let key = name_key(email);
        Ok(self
            .inner
            .read()
            .await
            .owners
            .iter()
            .find(|o| name_key(&o.email) == key)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.inner.read().await.categories.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .inner
            .read()
            .await
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_name(&self, key: &str, exclude: Option<Uuid>) -> Result<Option<Category>> {
        Ok(self
            .inner
            .read()
            .await
            .categories
            .iter()
            .find(|c| Some(c.id) != exclude && name_key(&c.name) == key)
            .cloned())
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let mut inner = self.inner.write().await;
        let key = name_key(&category.name);
        if inner.categories.iter().any(|c| name_key(&c.name) == key) {
            return Err(AppError::Conflict(CATEGORY_EXISTS.to_string()));
        }

        let now = Utc::now();
        let created = Category {
            id: Uuid::new_v4(),
            name: category.name,
            description: category.description,
            slug: category.slug,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.categories.push(created.clone());
        Ok(created)
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        let mut inner = self.inner.write().await;
        let key = name_key(&category.name);
        if inner
            .categories
            .iter()
            .any(|c| c.id != category.id && name_key(&c.name) == key)
        {
            return Err(AppError::Conflict(CATEGORY_EXISTS.to_string()));
        }

        let stored = inner
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        *stored = Category {
            updated_at: Utc::now(),
            created_at: stored.created_at,
            ..category.clone()
        };
        Ok(stored.clone())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self
            .inner
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_name(&self, key: &str, exclude: Option<Uuid>) -> Result<Option<Product>> {
        Ok(self
            .inner
            .read()
            .await
            .products
            .iter()
            .find(|p| Some(p.id) != exclude && name_key(&p.name) == key)
            .cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let key = name_key(&product.name);
        if inner.products.iter().any(|p| name_key(&p.name) == key) {
            return Err(AppError::Conflict(PRODUCT_EXISTS.to_string()));
        }
        if !inner.categories.iter().any(|c| c.id == product.category) {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        let now = Utc::now();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            image: product.image,
            description: product.description,
            discount: product.discount,
            category: product.category,
            created_at: now,
            updated_at: now,
        };
        inner.products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let key = name_key(&product.name);
        if inner
            .products
            .iter()
            .any(|p| p.id != product.id && name_key(&p.name) == key)
        {
            return Err(AppError::Conflict(PRODUCT_EXISTS.to_string()));
        }
        if !inner.categories.iter().any(|c| c.id == product.category) {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        let stored = inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        *stored = Product {
            updated_at: Utc::now(),
            created_at: stored.created_at,
            ..product.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        Ok(inner.products.len() < before)
    }
}
