use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::CategoryInput;
use crate::validators::{required, slugify};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub category_name: Option<String>,
}

impl CategoryForm {
    fn validate(&self) -> Result<CategoryInput, AppError> {
        let category_name = required("categoryName", self.category_name.as_deref())?;
        Ok(CategoryInput {
            slug: slugify(&category_name),
            category_name,
        })
    }
}

/// POST /category/new-category
pub async fn create_category(
    form: web::Json<CategoryForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let input = form.validate()?;

    if catalog
        .store
        .find_category_by_name(&input.category_name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Category already exists"));
    }

    let category = catalog.store.insert_category(input).await?;
    catalog.categories.invalidate_all().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Category saved successfully",
        "category": category,
    })))
}

/// PUT /category/update-category/{id}
pub async fn update_category(
    path: web::Path<Uuid>,
    form: web::Json<CategoryForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = form.validate()?;

    let category = catalog
        .store
        .update_category(id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    catalog.categories.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Category updated successfully",
        "category": category,
    })))
}

/// GET /category/all-categories
pub async fn all_categories(catalog: web::Data<Catalog>) -> Result<HttpResponse, AppError> {
    let all_category = catalog
        .categories
        .get_all(|| catalog.store.list_categories())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "All categories",
        "totalCategory": all_category.len(),
        "allCategory": all_category,
    })))
}

/// GET /category/single-category/{id}
pub async fn single_category(
    path: web::Path<Uuid>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let single_category = catalog
        .categories
        .get_by_id(id, || catalog.store.find_category(id))
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Category found successfully",
        "singleCategory": single_category,
    })))
}

/// DELETE /category/delete-category/{id}
pub async fn delete_category(
    path: web::Path<Uuid>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !catalog.store.delete_category(id).await? {
        return Err(AppError::not_found("Category not found"));
    }
    catalog.categories.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Category deleted successfully",
    })))
}
