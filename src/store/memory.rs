//! In-process backend.
//!
//! Keeps records in insertion order behind a mutex. Enforces the same
//! uniqueness rules as the database schema so behaviour matches the
//! PostgreSQL backend. Used for tests and database-less local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{CatalogStore, UserStore};
use crate::error::AppError;
use crate::models::{
    populate_products, Address, Category, CategoryInput, FeaturedCategory,
    FeaturedCategoryInput, NewAddress, NewProduct, NewUser, Product, ProductView, User,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
}

// ============================================================================
// USERS
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    addresses: Mutex<Vec<Address>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the admin flag; there is no HTTP route for this
    pub fn set_admin(&self, id: Uuid, is_admin: bool) -> Result<(), AppError> {
        let mut users = lock(&self.users)?;
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.is_admin = is_admin;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut users = lock(&self.users)?;
        if users
            .iter()
            .any(|u| u.user_name == new.user_name || u.email == new.email)
        {
            return Err(AppError::conflict("Already registered"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            user_name: new.user_name,
            full_name: new.full_name,
            email: new.email,
            password_hash: new.password_hash,
            answer: new.answer,
            is_admin: false,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(lock(&self.users)?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        Ok(lock(&self.users)?
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn find_user_by_user_name_or_email(
        &self,
        user_name: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(lock(&self.users)?
            .iter()
            .find(|u| u.user_name == user_name || u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(lock(&self.users)?.clone())
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), AppError> {
        let mut users = lock(&self.users)?;
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password(
        &self,
        email: &str,
        answer: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut users = lock(&self.users)?;
        match users
            .iter_mut()
            .find(|u| u.email == email && u.answer == answer)
        {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut users = lock(&self.users)?;
        let before = users.len();
        users.retain(|u| u.id != id);
        let deleted = users.len() != before;
        drop(users);

        if deleted {
            lock(&self.addresses)?.retain(|a| a.user_id != id);
        }
        Ok(deleted)
    }

    async fn insert_address(&self, new: NewAddress) -> Result<Address, AppError> {
        if !lock(&self.users)?.iter().any(|u| u.id == new.user_id) {
            return Err(AppError::not_found("User not found"));
        }

        let address = Address {
            id: Uuid::new_v4(),
            street: new.street,
            phone: new.phone,
            city: new.city,
            state: new.state,
            postal_code: new.postal_code,
            country: new.country,
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        lock(&self.addresses)?.push(address.clone());
        Ok(address)
    }

    async fn addresses_for(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        Ok(lock(&self.addresses)?
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Default)]
pub struct InMemoryCatalogStore {
    categories: Mutex<Vec<Category>>,
    featured: Mutex<Vec<FeaturedCategory>>,
    products: Mutex<Vec<Product>>,
    reads: AtomicUsize,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of list/detail queries served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn views(&self, products: Vec<Product>) -> Result<Vec<ProductView>, AppError> {
        let categories = lock(&self.categories)?;
        let featured = lock(&self.featured)?;
        Ok(populate_products(products, &categories, &featured))
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_category(&self, input: CategoryInput) -> Result<Category, AppError> {
        let mut categories = lock(&self.categories)?;
        if categories
            .iter()
            .any(|c| c.category_name == input.category_name)
        {
            return Err(AppError::conflict("Category already exists"));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            category_name: input.category_name,
            slug: input.slug,
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<Option<Category>, AppError> {
        let mut categories = lock(&self.categories)?;
        if categories
            .iter()
            .any(|c| c.id != id && c.category_name == input.category_name)
        {
            return Err(AppError::conflict("Category already exists"));
        }

        Ok(categories.iter_mut().find(|c| c.id == id).map(|category| {
            category.category_name = input.category_name;
            category.slug = input.slug;
            category.updated_at = Utc::now();
            category.clone()
        }))
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        self.record_read();
        Ok(lock(&self.categories)?.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(lock(&self.categories)?
            .iter()
            .find(|c| c.category_name == name)
            .cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.record_read();
        Ok(lock(&self.categories)?.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut categories = lock(&self.categories)?;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() != before)
    }

    async fn insert_featured_category(
        &self,
        input: FeaturedCategoryInput,
    ) -> Result<FeaturedCategory, AppError> {
        let now = Utc::now();
        let featured = FeaturedCategory {
            id: Uuid::new_v4(),
            name: input.name,
            slug: input.slug,
            featured_gender: input.featured_gender,
            is_featured: input.is_featured,
            created_at: now,
            updated_at: now,
        };
        lock(&self.featured)?.push(featured.clone());
        Ok(featured)
    }

    async fn update_featured_category(
        &self,
        id: Uuid,
        input: FeaturedCategoryInput,
    ) -> Result<Option<FeaturedCategory>, AppError> {
        Ok(lock(&self.featured)?
            .iter_mut()
            .find(|f| f.id == id)
            .map(|featured| {
                featured.name = input.name;
                featured.slug = input.slug;
                featured.featured_gender = input.featured_gender;
                featured.is_featured = input.is_featured;
                featured.updated_at = Utc::now();
                featured.clone()
            }))
    }

    async fn find_featured_category(
        &self,
        id: Uuid,
    ) -> Result<Option<FeaturedCategory>, AppError> {
        self.record_read();
        Ok(lock(&self.featured)?.iter().find(|f| f.id == id).cloned())
    }

    async fn list_featured_categories(&self) -> Result<Vec<FeaturedCategory>, AppError> {
        self.record_read();
        Ok(lock(&self.featured)?.clone())
    }

    async fn delete_featured_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut featured = lock(&self.featured)?;
        let before = featured.len();
        featured.retain(|f| f.id != id);
        Ok(featured.len() != before)
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            cloth_category_id: new.cloth_category_id,
            featured_category_id: new.featured_category_id,
            gender: new.gender,
            price: new.price,
            is_featured: new.is_featured,
            quantity: new.quantity,
            image: new.image,
            related_images: new.related_images,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        lock(&self.products)?.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError> {
        Ok(lock(&self.products)?
            .iter_mut()
            .find(|p| p.id == product.id)
            .map(|stored| {
                *stored = Product {
                    created_at: stored.created_at,
                    updated_at: Utc::now(),
                    ..product.clone()
                };
                stored.clone()
            }))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(lock(&self.products)?.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_view(&self, id: Uuid) -> Result<Option<ProductView>, AppError> {
        self.record_read();
        let product = lock(&self.products)?.iter().find(|p| p.id == id).cloned();
        match product {
            Some(product) => Ok(self.views(vec![product])?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list_product_views(&self) -> Result<Vec<ProductView>, AppError> {
        self.record_read();
        let products = lock(&self.products)?.clone();
        self.views(products)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let mut products = lock(&self.products)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}
