use std::time::Duration;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    flash::{Flash, redirect_with, take_flash},
    models::{
        category::Category,
        product::{ImageUpload, ProductDetails, ProductFields, ProductFilter},
    },
    services::{
        categories as category_service,
        products::{self as product_service, DescriptionRequest},
    },
    state::AppState,
    validation::catalog::{parse_id, parse_number},
};

/// Seconds allowed for reading one multipart field.
const FIELD_TIMEOUT_SECS: u64 = 30;

pub const PRODUCTS_PATH: &str = "/owners/products";
const CREATE_PATH: &str = "/owners/products/create";
const DASHBOARD_PATH: &str = "/owners/dashboard";

fn edit_path(id: Uuid) -> String {
    format!("{}/{}/edit", PRODUCTS_PATH, id)
}

/// Query string of the product list.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct ProductListPage {
    pub products: Vec<ProductDetails>,
    pub categories: Vec<Category>,
    pub filter: ProductQuery,
    pub flash: Option<Flash>,
}

#[derive(Serialize)]
pub struct ProductFormPage {
    pub categories: Vec<Category>,
    pub flash: Option<Flash>,
}

#[derive(Serialize)]
pub struct ProductEditPage {
    pub product: ProductDetails,
    pub categories: Vec<Category>,
    pub flash: Option<Flash>,
}

#[derive(Serialize)]
pub struct ProductPage {
    pub product: ProductDetails,
    pub flash: Option<Flash>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDescription {
    pub description: String,
    pub image_url: Option<String>,
}

/// Everything a product form can carry.
#[derive(Debug, Default)]
struct ProductForm {
    fields: ProductFields,
    image: Option<ImageUpload>,
    image_url: Option<String>,
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Reads a multipart product form. Blank optional fields count as absent
/// and an empty file part counts as no image.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();
    let field_timeout = Duration::from_secs(FIELD_TIMEOUT_SECS);

    loop {
        let field = match timeout(field_timeout, multipart.next_field()).await {
            Ok(Ok(Some(field))) => field,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(AppError::Multipart(format!("Parse error: {}", e))),
            Err(_) => return Err(AppError::Multipart("Upload timeout exceeded".into())),
        };

        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = timeout(field_timeout, field.bytes())
                .await
                .map_err(|_| AppError::Multipart("Upload timeout exceeded".into()))?
                .map_err(|e| AppError::Multipart(format!("image: {}", e)))?;
            if !bytes.is_empty() {
                form.image = Some(ImageUpload { file_name, bytes });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::Multipart(format!("{}: {}", field_name, e)))?;

        match field_name.as_str() {
            "name" => form.fields.name = Some(text),
            "price" => {
                form.fields.price = non_blank(text)
                    .map(|t| parse_number(&t, "Price"))
                    .transpose()?
            }
            "category" => form.fields.category = non_blank(text),
            "description" => form.fields.description = non_blank(text),
            "discount" => {
                form.fields.discount = non_blank(text)
                    .map(|t| parse_number(&t, "Discount"))
                    .transpose()?
            }
            "imageUrl" => form.image_url = non_blank(text),
            _ => {}
        }
    }

    tracing::debug!(
        "📋 Parsed product form - name: {:?}, image: {} bytes",
        form.fields.name,
        form.image.as_ref().map_or(0, |i| i.bytes.len())
    );

    Ok(form)
}

async fn load_list_page(
    state: &AppState,
    query: ProductQuery,
    flash: Option<Flash>,
) -> Result<ProductListPage> {
    let filter = ProductFilter {
        category: query
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| parse_id(c, "category"))
            .transpose()?,
        search: query.search.clone().and_then(non_blank),
    };

    Ok(ProductListPage {
        products: product_service::list_products(state, &filter).await?,
        categories: category_service::list_categories(state).await?,
        filter: query,
        flash,
    })
}

/// Lists products, optionally filtered by category and search term.
pub async fn list_products(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<ProductQuery>,
) -> Response {
    match load_list_page(&state, query, take_flash(&cookies)).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => redirect_with(&cookies, DASHBOARD_PATH, Flash::from_error(&e)).into_response(),
    }
}

/// The product creation form.
pub async fn new_product_page(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Response {
    match category_service::list_categories(&state).await {
        Ok(categories) => Json(ProductFormPage {
            categories,
            flash: take_flash(&cookies),
        })
        .into_response(),
        Err(e) => redirect_with(&cookies, PRODUCTS_PATH, Flash::from_error(&e)).into_response(),
    }
}

/// Creates a product from a multipart form.
pub async fn create_product(
    State(state): State<AppState>,
    cookies: Cookies,
    multipart: Multipart,
) -> Redirect {
    let result = async {
        let form = read_product_form(multipart).await?;
        product_service::create_product(&state, form.fields, form.image).await
    }
    .await;

    match result {
        Ok(product) => redirect_with(
            &cookies,
            PRODUCTS_PATH,
            Flash::success(format!("Product \"{}\" created successfully", product.name)),
        ),
        Err(e) => redirect_with(&cookies, CREATE_PATH, Flash::from_error(&e)),
    }
}

/// Shows one product.
pub async fn show_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = parse_id(&id, "product")?;
        product_service::get_product(&state, id).await
    }
    .await;

    match result {
        Ok(product) => Json(ProductPage {
            product,
            flash: take_flash(&cookies),
        })
        .into_response(),
        Err(e) => redirect_with(&cookies, PRODUCTS_PATH, Flash::from_error(&e)).into_response(),
    }
}

/// The product edit form.
pub async fn edit_product_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = parse_id(&id, "product")?;
        let product = product_service::get_product(&state, id).await?;
        let categories = category_service::list_categories(&state).await?;
        Ok::<_, AppError>((product, categories))
    }
    .await;

    match result {
        Ok((product, categories)) => Json(ProductEditPage {
            product,
            categories,
            flash: take_flash(&cookies),
        })
        .into_response(),
        Err(e) => redirect_with(&cookies, PRODUCTS_PATH, Flash::from_error(&e)).into_response(),
    }
}

/// Applies a partial update from a multipart form.
pub async fn update_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Redirect {
    let product_id = match parse_id(&id, "product") {
        Ok(product_id) => product_id,
        Err(e) => return redirect_with(&cookies, PRODUCTS_PATH, Flash::from_error(&e)),
    };

    let result = async {
        let form = read_product_form(multipart).await?;
        product_service::update_product(&state, product_id, form.fields, form.image).await
    }
    .await;

    match result {
        Ok(product) => redirect_with(
            &cookies,
            PRODUCTS_PATH,
            Flash::success(format!("Product \"{}\" updated successfully", product.name)),
        ),
        Err(e) => redirect_with(&cookies, &edit_path(product_id), Flash::from_error(&e)),
    }
}

/// Deletes a product.
pub async fn delete_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Redirect {
    let result = async {
        let id = parse_id(&id, "product")?;
        product_service::delete_product(&state, id).await
    }
    .await;

    let flash = match result {
        Ok(()) => Flash::success("Product deleted successfully"),
        Err(e) => Flash::from_error(&e),
    };
    redirect_with(&cookies, PRODUCTS_PATH, flash)
}

/// Generates a product description from a multipart form.
#[axum::debug_handler]
pub async fn generate_description(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GeneratedDescription>> {
    let form = read_product_form(multipart).await?;

    let (description, image_url) = product_service::describe_product(
        &state,
        DescriptionRequest {
            name: form.fields.name,
            price: form.fields.price,
            category: form.fields.category,
            discount: form.fields.discount,
            image: form.image,
            image_url: form.image_url,
        },
    )
    .await?;

    Ok(Json(GeneratedDescription {
        description,
        image_url,
    }))
}
