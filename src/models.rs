/// Domain records and their public projections.
///
/// Stored records (`User`, `Address`, `Category`, ...) map one-to-one onto
/// database rows. Anything that leaves the service goes through a
/// projection that drops secrets (`UserProfile`) or populates references
/// (`ProductView`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of related images a product may carry
pub const MAX_RELATED_IMAGES: usize = 5;

// ============================================================================
// USERS
// ============================================================================

/// Persisted user record, including credentials
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub answer: String,
    pub is_admin: bool,
    /// The single currently valid refresh token; last issued wins
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration input with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub answer: String,
}

/// A user as returned to clients: no password hash, no refresh token
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub is_admin: bool,
    pub address: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: User, address: Vec<Address>) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            full_name: user.full_name,
            email: user.email,
            is_admin: user.is_admin,
            address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "userOwn")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub user_id: Uuid,
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub category_name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub category_name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub featured_gender: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FeaturedCategoryInput {
    pub name: String,
    pub slug: String,
    pub featured_gender: String,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedImage {
    pub id: Uuid,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub cloth_category_id: Uuid,
    pub featured_category_id: Option<Uuid>,
    pub gender: String,
    pub price: f64,
    pub is_featured: bool,
    pub quantity: i32,
    pub image: String,
    pub related_images: Vec<RelatedImage>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to insert a product; the store assigns id and timestamps
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub cloth_category_id: Uuid,
    pub featured_category_id: Option<Uuid>,
    pub gender: String,
    pub price: f64,
    pub is_featured: bool,
    pub quantity: i32,
    pub image: String,
    pub related_images: Vec<RelatedImage>,
    pub description: String,
}

/// A product with its category references resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub cloth_category: Option<Category>,
    pub featured_category: Option<FeaturedCategory>,
}

/// Build the related-image list for a set of URLs, reusing the id of any
/// URL the product already had so clients can keep referencing it.
pub fn merge_related_images(existing: &[RelatedImage], urls: Vec<String>) -> Vec<RelatedImage> {
    urls.into_iter()
        .map(|url| {
            let id = existing
                .iter()
                .find(|img| img.url == url)
                .map(|img| img.id)
                .unwrap_or_else(Uuid::new_v4);
            RelatedImage { id, url }
        })
        .collect()
}

/// Resolve category references for a batch of products
pub fn populate_products(
    products: Vec<Product>,
    categories: &[Category],
    featured: &[FeaturedCategory],
) -> Vec<ProductView> {
    products
        .into_iter()
        .map(|product| {
            let cloth_category = categories
                .iter()
                .find(|c| c.id == product.cloth_category_id)
                .cloned();
            let featured_category = product
                .featured_category_id
                .and_then(|id| featured.iter().find(|f| f.id == id).cloned());
            ProductView {
                product,
                cloth_category,
                featured_category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            user_name: "alice".to_string(),
            full_name: "alice liddell".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            answer: "blue".to_string(),
            is_admin: false,
            refresh_token: Some("token".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_hides_secrets() {
        let profile = UserProfile::new(user(), Vec::new());
        let json = serde_json::to_value(&profile).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshToken").is_none());
        assert!(json.get("answer").is_none());
        assert_eq!(json["userName"], "alice");
    }

    #[test]
    fn test_merge_related_images_keeps_known_ids() {
        let kept = RelatedImage {
            id: Uuid::new_v4(),
            url: "https://img/a.png".to_string(),
        };
        let merged = merge_related_images(
            &[kept.clone()],
            vec!["https://img/a.png".to_string(), "https://img/b.png".to_string()],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], kept);
        assert_ne!(merged[1].id, kept.id);
    }

    #[test]
    fn test_populate_products_resolves_references() {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            category_name: "Shirts".to_string(),
            slug: "shirts".to_string(),
            created_at: now,
            updated_at: now,
        };
        let product = Product {
            id: Uuid::new_v4(),
            name: "tee".to_string(),
            cloth_category_id: category.id,
            featured_category_id: Some(Uuid::new_v4()),
            gender: "men".to_string(),
            price: 19.5,
            is_featured: false,
            quantity: 3,
            image: "https://img/tee.png".to_string(),
            related_images: Vec::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        };

        let views = populate_products(vec![product], &[category.clone()], &[]);

        assert_eq!(views[0].cloth_category, Some(category));
        assert!(views[0].featured_category.is_none());
    }
}
