use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::category::{Category, CategoryDraft, CategoryPatch, NewCategory},
    repositories::CATEGORY_EXISTS,
    state::AppState,
    validation::catalog::{name_key, require_name, slugify, title_case},
};

/// Lists every category.
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>> {
    state.categories.list().await
}

async fn ensure_name_free(state: &AppState, name: &str, exclude: Option<Uuid>) -> Result<()> {
    if state
        .categories
        .find_by_name(&name_key(name), exclude)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(CATEGORY_EXISTS.to_string()));
    }
    Ok(())
}

/// Creates a category.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `draft` - The submitted name and description.
///
/// # Returns
///
/// A `Result` containing the created `Category`, its name title-cased.
pub async fn create_category(state: &AppState, draft: CategoryDraft) -> Result<Category> {
    let name = require_name(draft.name.as_deref().unwrap_or_default(), "Missing fields")?;
    ensure_name_free(state, &name, None).await?;

    let category = state
        .categories
        .insert(NewCategory {
            name: title_case(&name),
            slug: slugify(&name),
            description: draft.description,
        })
        .await?;

    tracing::info!("✅ Category created: {} ({})", category.name, category.id);
    Ok(category)
}

/// Applies a partial update to a category.
///
/// Only the fields present in `patch` change. The slug is recomputed only
/// when the name changes.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `id` - The category to update.
/// * `patch` - The fields to change.
///
/// # Returns
///
/// A `Result` containing the updated `Category`.
pub async fn update_category(state: &AppState, id: Uuid, patch: CategoryPatch) -> Result<Category> {
    let mut category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    if let Some(name) = patch.name.as_deref() {
        let name = require_name(name, "Category name cannot be empty")?;
        ensure_name_free(state, &name, Some(id)).await?;
        category.name = title_case(&name);
        category.slug = slugify(&name);
    }
    if let Some(description) = patch.description {
        category.description = Some(description);
    }
    if let Some(is_active) = patch.is_active {
        category.is_active = is_active;
    }

    let category = state.categories.update(&category).await?;
    tracing::info!("✅ Category updated: {}", category.id);
    Ok(category)
}
