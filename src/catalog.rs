//! Shared state of the catalog controllers: the store and one read-through
//! cache per collection.

use crate::cache::CollectionCache;
use crate::configuration::CacheSettings;
use crate::models::{Category, FeaturedCategory, ProductView};
use crate::store::DynCatalogStore;

pub const CATEGORY_COLLECTION: &str = "category";
pub const FEATURED_CATEGORY_COLLECTION: &str = "featuredCategory";
pub const PRODUCT_COLLECTION: &str = "product";

#[derive(Clone)]
pub struct Catalog {
    pub store: DynCatalogStore,
    pub categories: CollectionCache<Category>,
    pub featured_categories: CollectionCache<FeaturedCategory>,
    pub products: CollectionCache<ProductView>,
}

impl Catalog {
    pub fn new(store: DynCatalogStore, settings: &CacheSettings) -> Self {
        let ttl = settings.ttl();
        let detail = settings.invalidate_detail_on_write;
        Self {
            store,
            categories: CollectionCache::new(CATEGORY_COLLECTION, ttl)
                .with_detail_invalidation(detail),
            featured_categories: CollectionCache::new(FEATURED_CATEGORY_COLLECTION, ttl)
                .with_detail_invalidation(detail),
            products: CollectionCache::new(PRODUCT_COLLECTION, ttl)
                .with_detail_invalidation(detail),
        }
    }
}
