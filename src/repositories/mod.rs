//! Persistence for owners, categories and products.
//!
//! Each record kind has a repository trait with two implementations: one
//! backed by PostgreSQL and one kept in process memory. Both enforce
//! case-insensitive name uniqueness at write time, so a duplicate that slips
//! past the service-level check still surfaces as `AppError::Conflict`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        category::{Category, NewCategory},
        owner::{NewOwner, Owner},
        product::{NewProduct, Product, ProductFilter},
    },
};

pub mod category;
pub mod memory;
pub mod owner;
pub mod product;

pub const CATEGORY_EXISTS: &str = "Category already exists";
pub const PRODUCT_EXISTS: &str = "Product already exists";
pub const OWNER_EXISTS: &str = "Owner already exists";

#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Number of owner accounts.
    async fn count(&self) -> Result<i64>;

    /// Persists a new owner.
    async fn insert(&self, owner: NewOwner) -> Result<Owner>;

    /// Looks up an owner by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories.
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    /// Finds a category whose lowercased name equals `name_key`, ignoring
    /// the record `exclude` if given.
    async fn find_by_name(&self, name_key: &str, exclude: Option<Uuid>) -> Result<Option<Category>>;

    async fn insert(&self, category: NewCategory) -> Result<Category>;

    /// Writes every mutable field of `category` in one statement.
    async fn update(&self, category: &Category) -> Result<Category>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Finds a product whose lowercased name equals `name_key`, ignoring
    /// the record `exclude` if given.
    async fn find_by_name(&self, name_key: &str, exclude: Option<Uuid>) -> Result<Option<Product>>;

    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Writes every mutable field of `product` in one statement.
    async fn update(&self, product: &Product) -> Result<Product>;

    /// Deletes a product. Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
