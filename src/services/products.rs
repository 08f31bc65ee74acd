use std::collections::HashMap;

use garde::Validate;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        category::Category,
        product::{ImageUpload, NewProduct, Product, ProductDetails, ProductFields, ProductFilter},
    },
    repositories::PRODUCT_EXISTS,
    services::descriptions::ProductBrief,
    state::AppState,
    validation::catalog::{
        name_key, parse_id, report_to_error, require_name, validate_discount, validate_price,
    },
};

/// Input for generating a description.
#[derive(Debug, Clone, Default)]
pub struct DescriptionRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub discount: Option<f64>,
    pub image: Option<ImageUpload>,
    pub image_url: Option<String>,
}

fn with_category_names(products: Vec<Product>, categories: &[Category]) -> Vec<ProductDetails> {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    products
        .into_iter()
        .map(|product| ProductDetails {
            category_name: names.get(&product.category).map(|n| n.to_string()),
            product,
        })
        .collect()
}

/// Lists products matching `filter`, each with its category's name.
pub async fn list_products(state: &AppState, filter: &ProductFilter) -> Result<Vec<ProductDetails>> {
    let products = state.products.list(filter).await?;
    let categories = state.categories.list().await?;
    Ok(with_category_names(products, &categories))
}

/// Fetches one product with its category's name.
pub async fn get_product(state: &AppState, id: Uuid) -> Result<ProductDetails> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let category_name = state
        .categories
        .find_by_id(product.category)
        .await?
        .map(|c| c.name);

    Ok(ProductDetails {
        product,
        category_name,
    })
}

async fn resolve_category(state: &AppState, raw: &str) -> Result<Category> {
    let id = parse_id(raw, "category")?;
    state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

async fn ensure_name_free(state: &AppState, name: &str, exclude: Option<Uuid>) -> Result<()> {
    if state
        .products
        .find_by_name(&name_key(name), exclude)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(PRODUCT_EXISTS.to_string()));
    }
    Ok(())
}

async fn store_image(state: &AppState, image: ImageUpload) -> Result<String> {
    state.images.upload(image).await.map_err(|e| match e {
        AppError::Validation(_) | AppError::Upstream(_) => e,
        other => AppError::Upstream(format!("Image upload failed: {}", other)),
    })
}

fn non_empty(image: Option<ImageUpload>) -> Option<ImageUpload> {
    image.filter(|i| !i.bytes.is_empty())
}

/// Creates a product.
///
/// Every field is validated and the category resolved before the image is
/// uploaded, so a rejected create never reaches the image store.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `fields` - The submitted fields; `name`, `price` and `category` are required.
/// * `image` - The product image; required and non-empty.
///
/// # Returns
///
/// A `Result` containing the created `Product`.
pub async fn create_product(
    state: &AppState,
    fields: ProductFields,
    image: Option<ImageUpload>,
) -> Result<Product> {
    fields.validate().map_err(report_to_error)?;

    let (Some(name), Some(price), Some(category), Some(image)) = (
        fields.name.as_deref().filter(|n| !n.trim().is_empty()),
        fields.price,
        fields.category.as_deref().filter(|c| !c.trim().is_empty()),
        non_empty(image),
    ) else {
        return Err(AppError::Validation(
            "Name, price, category and image are required".to_string(),
        ));
    };

    let name = require_name(name, "Product name is required")?;
    let price = validate_price(price)?;
    let discount = fields.discount.map(validate_discount).transpose()?;
    let category = resolve_category(state, category).await?;
    ensure_name_free(state, &name, None).await?;

    let image_url = store_image(state, image).await?;

    let product = state
        .products
        .insert(NewProduct {
            name,
            price,
            image: image_url,
            description: fields.description,
            discount,
            category: category.id,
        })
        .await?;

    tracing::info!("✅ Product created: {} ({})", product.name, product.id);
    Ok(product)
}

/// Applies a partial update to a product.
///
/// Present fields are validated with the same rules as on create. Changes are
/// staged on a copy and written in one repository call, so a failure leaves
/// the stored record untouched.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `id` - The product to update.
/// * `fields` - The fields to change.
/// * `image` - A replacement image, if any.
///
/// # Returns
///
/// A `Result` containing the updated `Product`.
pub async fn update_product(
    state: &AppState,
    id: Uuid,
    fields: ProductFields,
    image: Option<ImageUpload>,
) -> Result<Product> {
    fields.validate().map_err(report_to_error)?;

    let mut product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if let Some(name) = fields.name.as_deref() {
        let name = require_name(name, "Product name cannot be empty")?;
        ensure_name_free(state, &name, Some(id)).await?;
        product.name = name;
    }
    if let Some(price) = fields.price {
        product.price = validate_price(price)?;
    }
    if let Some(discount) = fields.discount {
        product.discount = Some(validate_discount(discount)?);
    }
    if let Some(category) = fields.category.as_deref() {
        product.category = resolve_category(state, category).await?.id;
    }
    if let Some(description) = fields.description {
        product.description = Some(description);
    }
    if let Some(image) = non_empty(image) {
        product.image = store_image(state, image).await?;
    }

    let product = state.products.update(&product).await?;
    tracing::info!("✅ Product updated: {}", product.id);
    Ok(product)
}

/// Deletes a product.
pub async fn delete_product(state: &AppState, id: Uuid) -> Result<()> {
    if !state.products.delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!("🗑️ Product deleted: {}", id);
    Ok(())
}

/// Generates a description for a product that may not exist yet.
///
/// # Returns
///
/// A `Result` containing the description and the image URL it was based on.
pub async fn describe_product(
    state: &AppState,
    request: DescriptionRequest,
) -> Result<(String, Option<String>)> {
    let (Some(name), Some(price), Some(category)) = (
        request.name.as_deref().filter(|n| !n.trim().is_empty()),
        request.price,
        request.category.as_deref().filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Name, price and category are required".to_string(),
        ));
    };

    let name = require_name(name, "Product name is required")?;
    let price = validate_price(price)?;
    let discount = request.discount.map(validate_discount).transpose()?;
    let category = resolve_category(state, category).await?;

    let image_url = match non_empty(request.image) {
        Some(image) => Some(store_image(state, image).await?),
        None => request.image_url.filter(|u| !u.trim().is_empty()),
    };

    let description = state
        .descriptions
        .generate(ProductBrief {
            name,
            price,
            category_name: category.name,
            discount,
            image_url: image_url.clone(),
        })
        .await
        .map_err(|e| match e {
            AppError::Config(_) | AppError::Upstream(_) => e,
            other => AppError::Upstream(format!("Description generation failed: {}", other)),
        })?;

    Ok((description, image_url))
}
