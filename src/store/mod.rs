//! Persistence seams.
//!
//! Handlers and the session manager talk to storage only through
//! [`UserStore`] and [`CatalogStore`]. Two backends implement them:
//! PostgreSQL ([`PgUserStore`], [`PgCatalogStore`]) and an in-process map
//! ([`InMemoryUserStore`], [`InMemoryCatalogStore`]) selected through
//! `database.backend`.

mod memory;
mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Address, Category, CategoryInput, FeaturedCategory, FeaturedCategoryInput, NewAddress,
    NewProduct, NewUser, Product, ProductView, User,
};

pub use memory::{InMemoryCatalogStore, InMemoryUserStore};
pub use postgres::{PgCatalogStore, PgUserStore};

pub type DynUserStore = Arc<dyn UserStore>;
pub type DynCatalogStore = Arc<dyn CatalogStore>;

/// Users and the addresses they own
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError>;

    /// Any user holding either the user name or the email
    async fn find_user_by_user_name_or_email(
        &self,
        user_name: &str,
        email: &str,
    ) -> Result<Option<User>, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Overwrite the stored refresh token; `None` clears it. Unknown ids are a no-op.
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), AppError>;

    /// Replace the password of the user matching both email and answer.
    /// Returns `false` when no user matched.
    async fn update_password(
        &self,
        email: &str,
        answer: &str,
        password_hash: &str,
    ) -> Result<bool, AppError>;

    /// Delete a user and their addresses. Returns `false` when nothing was deleted.
    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_address(&self, address: NewAddress) -> Result<Address, AppError>;

    /// Addresses owned by a user, oldest first
    async fn addresses_for(&self, user_id: Uuid) -> Result<Vec<Address>, AppError>;
}

/// Categories, featured categories and products
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_category(&self, input: CategoryInput) -> Result<Category, AppError>;

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<Option<Category>, AppError>;

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_featured_category(
        &self,
        input: FeaturedCategoryInput,
    ) -> Result<FeaturedCategory, AppError>;

    async fn update_featured_category(
        &self,
        id: Uuid,
        input: FeaturedCategoryInput,
    ) -> Result<Option<FeaturedCategory>, AppError>;

    async fn find_featured_category(&self, id: Uuid)
        -> Result<Option<FeaturedCategory>, AppError>;

    async fn list_featured_categories(&self) -> Result<Vec<FeaturedCategory>, AppError>;

    async fn delete_featured_category(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Replace every mutable field of an existing product
    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError>;

    /// Raw product without populated references
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn find_product_view(&self, id: Uuid) -> Result<Option<ProductView>, AppError>;

    async fn list_product_views(&self) -> Result<Vec<ProductView>, AppError>;

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError>;
}
