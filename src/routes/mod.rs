//! HTTP controllers, mounted under `/api/v1` by [`crate::startup`].

mod addresses;
mod categories;
mod featured_categories;
mod health_check;
mod products;
mod users;

use actix_web::web;

use crate::auth::SessionManager;
use crate::middleware::AuthMiddleware;

pub use health_check::health_check;
pub use users::REFRESH_TOKEN_COOKIE;

/// `/user` routes
pub fn user_routes(sessions: SessionManager) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let auth = || AuthMiddleware::new(sessions.clone());
        cfg.route("/register", web::post().to(users::register))
            .route("/login", web::post().to(users::login))
            .route("/forgotPassword", web::post().to(users::forgot_password))
            .route("/refresh-token", web::post().to(users::refresh_token))
            .service(
                web::resource("/logout")
                    .wrap(auth())
                    .route(web::post().to(users::logout)),
            )
            .service(
                web::resource("/user-auth")
                    .wrap(auth())
                    .route(web::get().to(users::user_auth)),
            )
            .service(
                web::resource("/admin-auth")
                    .wrap(auth())
                    .route(web::get().to(users::admin_auth)),
            )
            .service(
                web::resource("/deleteUser/{id}")
                    .wrap(auth())
                    .route(web::delete().to(users::delete_user)),
            )
            .service(
                web::resource("/allUser")
                    .wrap(auth())
                    .route(web::get().to(users::all_users)),
            );
    }
}

/// `/category` routes
pub fn category_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/new-category", web::post().to(categories::create_category))
        .route("/update-category/{id}", web::put().to(categories::update_category))
        .route("/all-categories", web::get().to(categories::all_categories))
        .route("/single-category/{id}", web::get().to(categories::single_category))
        .route("/delete-category/{id}", web::delete().to(categories::delete_category));
}

/// `/featuredCategory` routes
pub fn featured_category_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/newfeaturedcategory",
        web::post().to(featured_categories::create_featured_category),
    )
    .route(
        "/updatefeaturedcategory/{id}",
        web::put().to(featured_categories::update_featured_category),
    )
    .route(
        "/allfeaturedcategories",
        web::get().to(featured_categories::all_featured_categories),
    )
    .route(
        "/singlefeaturedcategory/{id}",
        web::get().to(featured_categories::single_featured_category),
    )
    .route(
        "/deletefeaturedcategory/{id}",
        web::delete().to(featured_categories::delete_featured_category),
    );
}

/// `/product` routes
pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create-product", web::post().to(products::create_product))
        .route("/update-product/{prodId}", web::put().to(products::update_product))
        .route("/allproducts", web::get().to(products::all_products))
        .route("/deleteproduct/{prodId}", web::delete().to(products::delete_product));
}

/// `/userAddress` routes
pub fn address_routes(sessions: SessionManager) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(
            web::resource("/createAddress")
                .wrap(AuthMiddleware::new(sessions))
                .route(web::post().to(addresses::create_address)),
        );
    }
}
