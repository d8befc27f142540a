use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::FeaturedCategoryInput;
use crate::validators::{required_lowercase, slugify};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedCategoryForm {
    pub name: Option<String>,
    pub featured_gender: Option<String>,
    pub is_featured: Option<bool>,
}

impl FeaturedCategoryForm {
    fn validate(&self) -> Result<FeaturedCategoryInput, AppError> {
        let name = required_lowercase("name", self.name.as_deref())?;
        let featured_gender = required_lowercase("featuredGender", self.featured_gender.as_deref())?;
        Ok(FeaturedCategoryInput {
            slug: slugify(&name),
            name,
            featured_gender,
            is_featured: self.is_featured.unwrap_or(true),
        })
    }
}

/// POST /featuredCategory/newfeaturedcategory
pub async fn create_featured_category(
    form: web::Json<FeaturedCategoryForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let featured_category = catalog
        .store
        .insert_featured_category(form.validate()?)
        .await?;
    catalog.featured_categories.invalidate_all().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "FeaturedCategory saved successfully",
        "featuredCategory": featured_category,
    })))
}

/// PUT /featuredCategory/updatefeaturedcategory/{id}
pub async fn update_featured_category(
    path: web::Path<Uuid>,
    form: web::Json<FeaturedCategoryForm>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = form.validate()?;

    let featured_category = catalog
        .store
        .update_featured_category(id, input)
        .await?
        .ok_or_else(|| AppError::not_found("FeaturedCategory not found"))?;
    catalog.featured_categories.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "FeaturedCategory updated successfully",
        "featuredCategory": featured_category,
    })))
}

/// GET /featuredCategory/allfeaturedcategories
pub async fn all_featured_categories(
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let all = catalog
        .featured_categories
        .get_all(|| catalog.store.list_featured_categories())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "FeaturedCategory All data",
        "totalCategory": all.len(),
        "allFeaturedCategory": all,
    })))
}

/// GET /featuredCategory/singlefeaturedcategory/{id}
pub async fn single_featured_category(
    path: web::Path<Uuid>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let single_featured = catalog
        .featured_categories
        .get_by_id(id, || catalog.store.find_featured_category(id))
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "SingleFeaturedCategory found successfully",
        "singleFeatured": single_featured,
    })))
}

/// DELETE /featuredCategory/deletefeaturedcategory/{id}
pub async fn delete_featured_category(
    path: web::Path<Uuid>,
    catalog: web::Data<Catalog>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !catalog.store.delete_featured_category(id).await? {
        return Err(AppError::not_found("FeaturedCategory not found"));
    }
    catalog.featured_categories.invalidate_after_write(id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "FeaturedCategory deleted successfully",
    })))
}
