use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{SessionManager, TokenIssuer};
use crate::catalog::Catalog;
use crate::configuration::{DatabaseSettings, Settings, StorageBackend};
use crate::error::{AppError, ValidationError};
use crate::middleware::RequestLogger;
use crate::routes::{
    address_routes, category_routes, featured_category_routes, health_check, product_routes,
    user_routes,
};
use crate::store::{
    DynCatalogStore, DynUserStore, InMemoryCatalogStore, InMemoryUserStore, PgCatalogStore,
    PgUserStore,
};

/// Storage handles shared by every worker
#[derive(Clone)]
pub struct Stores {
    pub users: DynUserStore,
    pub catalog: DynCatalogStore,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            catalog: Arc::new(InMemoryCatalogStore::new()),
        }
    }
}

/// Open the configured backend. For PostgreSQL this connects the pool and
/// applies pending migrations.
pub async fn build_stores(config: &DatabaseSettings) -> Result<Stores, AppError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Stores::in_memory())
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.connection_string())
                .await?;
            tracing::info!("Database connection pool created successfully");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

            Ok(Stores {
                users: Arc::new(PgUserStore::new(pool.clone())),
                catalog: Arc::new(PgCatalogStore::new(pool)),
            })
        }
    }
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
        None => Cors::permissive(),
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        AppError::Validation(ValidationError::InvalidFormat("request body".to_string())).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected query string");
        AppError::Validation(ValidationError::InvalidFormat("query string".to_string())).into()
    })
}

/// Unparseable path ids name nothing that exists
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected path segment");
        AppError::not_found("Resource not found").into()
    })
}

pub fn run(listener: TcpListener, stores: Stores, settings: &Settings) -> Result<Server, std::io::Error> {
    let sessions = SessionManager::new(
        stores.users.clone(),
        TokenIssuer::new(settings.jwt.clone()),
        settings.application.password_hash_cost,
    );
    let catalog = web::Data::new(Catalog::new(stores.catalog, &settings.cache));
    let sessions_data = web::Data::new(sessions.clone());
    let users_data = web::Data::new(stores.users);
    let cors_origin = settings.application.cors_origin.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(RequestLogger)
            .wrap(cors(cors_origin.as_deref()))

            // Shared state
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(catalog.clone())
            .app_data(sessions_data.clone())
            .app_data(users_data.clone())

            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api/v1")
                    .service(web::scope("/user").configure(user_routes(sessions.clone())))
                    .service(web::scope("/category").configure(category_routes))
                    .service(web::scope("/featuredCategory").configure(featured_category_routes))
                    .service(web::scope("/product").configure(product_routes))
                    .service(web::scope("/userAddress").configure(address_routes(sessions.clone()))),
            )
    });

    if let Some(workers) = settings.application.workers {
        server = server.workers(workers);
    }

    Ok(server.listen(listener)?.run())
}
