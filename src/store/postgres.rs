//! PostgreSQL backend.
//!
//! Schema lives in `migrations/`. Unique indexes on `users.user_name`,
//! `users.email` and `categories.category_name` back the conflict checks;
//! a violation surfaces as a 409 through `From<sqlx::Error> for AppError`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CatalogStore, UserStore};
use crate::error::AppError;
use crate::models::{
    populate_products, Address, Category, CategoryInput, FeaturedCategory,
    FeaturedCategoryInput, NewAddress, NewProduct, NewUser, Product, ProductView, RelatedImage,
    User,
};

const USER_COLUMNS: &str = "id, user_name, full_name, email, password_hash, answer, is_admin, \
                            refresh_token, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, street, phone, city, state, postal_code, country, user_id, created_at";
const CATEGORY_COLUMNS: &str = "id, category_name, slug, created_at, updated_at";
const FEATURED_COLUMNS: &str =
    "id, name, slug, featured_gender, is_featured, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, cloth_category_id, featured_category_id, gender, price, \
                               is_featured, quantity, image, related_images, description, \
                               created_at, updated_at";

// ============================================================================
// USERS
// ============================================================================

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, user_name, full_name, email, password_hash, answer, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, false, $7, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.user_name)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.answer)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_user_name_or_email(
        &self,
        user_name: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1 OR email = $2 LIMIT 1"
        ))
        .bind(user_name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token = $1, updated_at = $2 WHERE id = $3")
            .bind(token)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_password(
        &self,
        email: &str,
        answer: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = $2 WHERE email = $3 AND answer = $4",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(email)
        .bind(answer)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        // addresses.user_id cascades
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_address(&self, new: NewAddress) -> Result<Address, AppError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            INSERT INTO addresses (id, street, phone, city, state, postal_code, country, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.street)
        .bind(&new.phone)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.postal_code)
        .bind(&new.country)
        .bind(new.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    async fn addresses_for(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    cloth_category_id: Uuid,
    featured_category_id: Option<Uuid>,
    gender: String,
    price: f64,
    is_featured: bool,
    quantity: i32,
    image: String,
    related_images: Json<Vec<RelatedImage>>,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            cloth_category_id: row.cloth_category_id,
            featured_category_id: row.featured_category_id,
            gender: row.gender,
            price: row.price,
            is_featured: row.is_featured,
            quantity: row.quantity,
            image: row.image,
            related_images: row.related_images.0,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve category references with one query per referenced table
    async fn populate(&self, products: Vec<Product>) -> Result<Vec<ProductView>, AppError> {
        let category_ids: Vec<Uuid> = products.iter().map(|p| p.cloth_category_id).collect();
        let featured_ids: Vec<Uuid> = products
            .iter()
            .filter_map(|p| p.featured_category_id)
            .collect();

        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ANY($1)"
        ))
        .bind(&category_ids)
        .fetch_all(&self.pool)
        .await?;

        let featured = sqlx::query_as::<_, FeaturedCategory>(&format!(
            "SELECT {FEATURED_COLUMNS} FROM featured_categories WHERE id = ANY($1)"
        ))
        .bind(&featured_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(populate_products(products, &categories, &featured))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn insert_category(&self, input: CategoryInput) -> Result<Category, AppError> {
        let now = Utc::now();
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (id, category_name, slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.category_name)
        .bind(&input.slug)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET category_name = $1, slug = $2, updated_at = $3
            WHERE id = $4
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&input.category_name)
        .bind(&input.slug)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE category_name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_featured_category(
        &self,
        input: FeaturedCategoryInput,
    ) -> Result<FeaturedCategory, AppError> {
        let now = Utc::now();
        let featured = sqlx::query_as::<_, FeaturedCategory>(&format!(
            r#"
            INSERT INTO featured_categories (id, name, slug, featured_gender, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {FEATURED_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.featured_gender)
        .bind(input.is_featured)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(featured)
    }

    async fn update_featured_category(
        &self,
        id: Uuid,
        input: FeaturedCategoryInput,
    ) -> Result<Option<FeaturedCategory>, AppError> {
        let featured = sqlx::query_as::<_, FeaturedCategory>(&format!(
            r#"
            UPDATE featured_categories
            SET name = $1, slug = $2, featured_gender = $3, is_featured = $4, updated_at = $5
            WHERE id = $6
            RETURNING {FEATURED_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.featured_gender)
        .bind(input.is_featured)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(featured)
    }

    async fn find_featured_category(
        &self,
        id: Uuid,
    ) -> Result<Option<FeaturedCategory>, AppError> {
        let featured = sqlx::query_as::<_, FeaturedCategory>(&format!(
            "SELECT {FEATURED_COLUMNS} FROM featured_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(featured)
    }

    async fn list_featured_categories(&self) -> Result<Vec<FeaturedCategory>, AppError> {
        let featured = sqlx::query_as::<_, FeaturedCategory>(&format!(
            "SELECT {FEATURED_COLUMNS} FROM featured_categories ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(featured)
    }

    async fn delete_featured_category(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM featured_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products
                (id, name, cloth_category_id, featured_category_id, gender, price, is_featured,
                 quantity, image, related_images, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.cloth_category_id)
        .bind(new.featured_category_id)
        .bind(&new.gender)
        .bind(new.price)
        .bind(new.is_featured)
        .bind(new.quantity)
        .bind(&new.image)
        .bind(Json(&new.related_images))
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $1, cloth_category_id = $2, featured_category_id = $3, gender = $4,
                price = $5, is_featured = $6, quantity = $7, image = $8, related_images = $9,
                description = $10, updated_at = $11
            WHERE id = $12
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(product.cloth_category_id)
        .bind(product.featured_category_id)
        .bind(&product.gender)
        .bind(product.price)
        .bind(product.is_featured)
        .bind(product.quantity)
        .bind(&product.image)
        .bind(Json(&product.related_images))
        .bind(&product.description)
        .bind(Utc::now())
        .bind(product.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_product_view(&self, id: Uuid) -> Result<Option<ProductView>, AppError> {
        match self.find_product(id).await? {
            Some(product) => Ok(self.populate(vec![product]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list_product_views(&self) -> Result<Vec<ProductView>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.populate(rows.into_iter().map(Product::from).collect())
            .await
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
