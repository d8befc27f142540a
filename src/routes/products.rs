/// Product Routes
///
/// Images are already-hosted URLs: `image` is the primary picture and
/// `relatedImages` holds up to five more. Reads return products with their
/// cloth and featured categories populated.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{AppError, ValidationError};
use crate::models::{merge_related_images, NewProduct, RelatedImage, MAX_RELATED_IMAGES};
use crate::validators::{required, required_lowercase, required_value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    pub cloth_category: Option<Uuid>,
    pub featured_category: Option<Uuid>,
    pub gender: Option<String>,
    pub price: Option<f64>,
    pub is_featured: Option<bool>,
    pub quantity: Option<i32>,
    pub image: Option<String>,
    pub related_images: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub prod_id: Option<Uuid>,
}

/// Fields required on both create and update
struct ProductCore {
    name: String,
    cloth_category_id: Uuid,
    gender: String,
    price: f64,
    quantity: i32,
}

impl ProductForm {
    fn core(&self) -> Result<ProductCore, ValidationError> {
        Ok(ProductCore {
            name: required_lowercase("name", self.name.as_deref())?,
            cloth_category_id: required_value("clothCategory", self.cloth_category)?,
            gender: required("gender", self.gender.as_deref())?,
            price: required_value("price", self.price)?,
            quantity: required_value("quantity", self.quantity)?,
        })
    }

    /// Related image URLs, trimmed, blank entries dropped
    fn related_image_urls(&self) -> Result<Vec<String>, ValidationError> {
        let urls: Vec<String> = self
            .related_images
            .iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        if urls.len() > MAX_RELATED_IMAGES {
            return Err(ValidationError::TooMany(
                "relatedImages".to_string(),
                MAX_RELATED_IMAGES,
            ));
        }

        Ok(urls)
    }

    fn description(&self) -> Option<String> {
        self.description.as_deref().map(|d| d.trim().to_lowercase())
    }
}

/// Referenced categories must exist
async fn check_references(
    catalog: &Catalog,
    cloth_category_id: Uuid,
    featured_category_id: Option<Uuid>,
) -> Result<(), AppError> {
    if catalog.store.find_category(cloth_category_id).await?.is_none() {
        return Err(AppError::not_found("Cloth category not found"));
    }

    if let Some(id) = featured_category_id {
        if catalog.store.find_featured_category(id).await?.is_none() {
            return Err(AppError::not_found("Featured category not found"));
        }
    }

    Ok(())
}

/// POST /product/create-product
///
/// # Errors
/// - 400: a required field or the image is missing, or more than five related images
/// - 404: the cloth or featured category does not exist
pub async fn create_product(
    form: web::Json<ProductForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let core = form.core()?;
    let image = required("image", form.image.as_deref())?;
    let related_images: Vec<RelatedImage> = merge_related_images(&[], form.related_image_urls()?);

    check_references(&catalog, core.cloth_category_id, form.featured_category).await?;

    let product = catalog
        .store
        .insert_product(NewProduct {
            name: core.name,
            cloth_category_id: core.cloth_category_id,
            featured_category_id: form.featured_category,
            gender: core.gender,
            price: core.price,
            is_featured: form.is_featured.unwrap_or(false),
            quantity: core.quantity,
            image,
            related_images,
            description: form.description().unwrap_or_default(),
        })
        .await?;
    catalog.products.invalidate_all().await;

    tracing::info!(product_id = %product.id, "Product created");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Product created successfully",
        "product": product,
    })))
}

/// PUT /product/update-product/{prodId}
///
/// A new `image` replaces the current one. A non-empty `relatedImages`
/// replaces the whole list, keeping the ids of URLs the product already had.
pub async fn update_product(
    path: web::Path<Uuid>,
    form: web::Json<ProductForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let core = form.core()?;
    let related_urls = form.related_image_urls()?;

    let mut product = catalog
        .store
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    check_references(&catalog, core.cloth_category_id, form.featured_category).await?;

    product.name = core.name;
    product.cloth_category_id = core.cloth_category_id;
    if let Some(featured_category_id) = form.featured_category {
        product.featured_category_id = Some(featured_category_id);
    }
    product.gender = core.gender;
    product.price = core.price;
    product.quantity = core.quantity;
    if let Some(is_featured) = form.is_featured {
        product.is_featured = is_featured;
    }
    if let Some(description) = form.description() {
        product.description = description;
    }
    if let Some(image) = form.image.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        product.image = image.to_string();
    }
    if !related_urls.is_empty() {
        product.related_images = merge_related_images(&product.related_images, related_urls);
    }

    let updated_product = catalog
        .store
        .update_product(&product)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    catalog.products.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Updated Product",
        "updatedProduct": updated_product,
    })))
}

/// GET /product/allproducts[?prodId=<id>]
pub async fn all_products(
    query: web::Query<ProductQuery>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    if let Some(id) = query.prod_id {
        let product = catalog
            .products
            .get_by_id(id, || catalog.store.find_product_view(id))
            .await?;

        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Product - {}", product.product.name),
            "product": product,
        })));
    }

    let all_products = catalog
        .products
        .get_all(|| catalog.store.list_product_views())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "All products",
        "totalProducts": all_products.len(),
        "allProducts": all_products,
    })))
}

/// DELETE /product/deleteproduct/{prodId}
pub async fn delete_product(
    path: web::Path<Uuid>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !catalog.store.delete_product(id).await? {
        return Err(AppError::not_found("Product not found"));
    }
    catalog.products.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Product deleted successfully",
    })))
}
