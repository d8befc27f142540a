mod common;

use common::{spawn_app, spawn_app_with, TestApp};
use gym_shop::configuration::CacheSettings;
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_category(app: &TestApp, name: &str) -> String {
    let response = app
        .post_json("/category/new-category", &json!({ "categoryName": name }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    body["category"]["id"].as_str().unwrap().to_string()
}

async fn create_featured(app: &TestApp, name: &str) -> String {
    let response = app
        .post_json(
            "/featuredCategory/newfeaturedcategory",
            &json!({ "name": name, "featuredGender": "Women" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    body["featuredCategory"]["id"].as_str().unwrap().to_string()
}

fn product_body(category_id: &str) -> Value {
    json!({
        "name": "Lifting Tee",
        "clothCategory": category_id,
        "gender": "men",
        "price": 19.99,
        "quantity": 10,
        "image": "https://img.example.com/tee.png",
        "relatedImages": ["https://img.example.com/a.png", "https://img.example.com/b.png"],
        "description": "Soft Cotton",
    })
}

async fn create_product(app: &TestApp, category_id: &str) -> Value {
    let response = app
        .post_json("/product/create-product", &product_body(category_id))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    body["product"].clone()
}

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

// --- Category Tests ---

#[tokio::test]
async fn all_categories_hits_store_once() {
    let app = spawn_app();
    create_category(&app, "Shirts").await;

    let before = app.catalog.reads();
    let first = json_body(app.get("/category/all-categories").await).await;
    let second = json_body(app.get("/category/all-categories").await).await;

    assert_eq!(app.catalog.reads() - before, 1);
    assert_eq!(first, second);
    assert_eq!(first["totalCategory"], 1);
    assert_eq!(first["allCategory"][0]["categoryName"], "Shirts");
    assert_eq!(first["allCategory"][0]["slug"], "shirts");
}

#[tokio::test]
async fn category_writes_invalidate_listing() {
    let app = spawn_app();
    let id = create_category(&app, "Shirts").await;
    assert_eq!(json_body(app.get("/category/all-categories").await).await["totalCategory"], 1);

    create_category(&app, "Shorts").await;
    assert_eq!(json_body(app.get("/category/all-categories").await).await["totalCategory"], 2);

    let updated = app
        .put_json(
            &format!("/category/update-category/{}", id),
            &json!({ "categoryName": "Tank Tops" }),
        )
        .await;
    assert_eq!(updated.status().as_u16(), 200);
    let listing = json_body(app.get("/category/all-categories").await).await;
    let names: Vec<&str> = listing["allCategory"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["categoryName"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Tank Tops"));

    let deleted = app.delete(&format!("/category/delete-category/{}", id)).await;
    assert_eq!(deleted.status().as_u16(), 200);
    assert_eq!(json_body(app.get("/category/all-categories").await).await["totalCategory"], 1);
}

#[tokio::test]
async fn category_validation_and_conflicts() {
    let app = spawn_app();
    create_category(&app, "Shirts").await;

    let duplicate = app
        .post_json("/category/new-category", &json!({ "categoryName": "Shirts" }))
        .await;
    assert_eq!(duplicate.status().as_u16(), 409);

    let blank = app
        .post_json("/category/new-category", &json!({ "categoryName": "  " }))
        .await;
    assert_eq!(blank.status().as_u16(), 400);
}

#[tokio::test]
async fn category_unknown_ids_return_404() {
    let app = spawn_app();
    let missing = Uuid::new_v4();

    let single = app.get(&format!("/category/single-category/{}", missing)).await;
    assert_eq!(single.status().as_u16(), 404);

    let update = app
        .put_json(
            &format!("/category/update-category/{}", missing),
            &json!({ "categoryName": "Hats" }),
        )
        .await;
    assert_eq!(update.status().as_u16(), 404);

    let delete = app.delete(&format!("/category/delete-category/{}", missing)).await;
    assert_eq!(delete.status().as_u16(), 404);

    let malformed = app.get("/category/single-category/not-a-uuid").await;
    assert_eq!(malformed.status().as_u16(), 404);
    let body = json_body(malformed).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");

    let malformed = app.delete("/product/deleteproduct/12345").await;
    assert_eq!(malformed.status().as_u16(), 404);
    assert_eq!(json_body(malformed).await["success"], false);
}

#[tokio::test]
async fn single_category_stays_cached_after_update_by_default() {
    let app = spawn_app();
    let id = create_category(&app, "Shirts").await;
    let path = format!("/category/single-category/{}", id);

    let before = json_body(app.get(&path).await).await;
    assert_eq!(before["singleCategory"]["categoryName"], "Shirts");

    app.put_json(
        &format!("/category/update-category/{}", id),
        &json!({ "categoryName": "Tank Tops" }),
    )
    .await;

    let after = json_body(app.get(&path).await).await;
    assert_eq!(after["singleCategory"]["categoryName"], "Shirts");
}

#[tokio::test]
async fn single_category_refreshed_when_detail_invalidation_enabled() {
    let app = spawn_app_with(CacheSettings {
        ttl_seconds: None,
        invalidate_detail_on_write: true,
    });
    let id = create_category(&app, "Shirts").await;
    let path = format!("/category/single-category/{}", id);

    json_body(app.get(&path).await).await;
    app.put_json(
        &format!("/category/update-category/{}", id),
        &json!({ "categoryName": "Tank Tops" }),
    )
    .await;

    let after = json_body(app.get(&path).await).await;
    assert_eq!(after["singleCategory"]["categoryName"], "Tank Tops");
}

// --- Featured Category Tests ---

#[tokio::test]
async fn featured_category_lifecycle() {
    let app = spawn_app();

    let missing_gender = app
        .post_json("/featuredCategory/newfeaturedcategory", &json!({ "name": "Summer" }))
        .await;
    assert_eq!(missing_gender.status().as_u16(), 400);

    let id = create_featured(&app, "Summer Sale").await;

    let all = json_body(app.get("/featuredCategory/allfeaturedcategories").await).await;
    assert_eq!(all["totalCategory"], 1);
    let featured = &all["allFeaturedCategory"][0];
    assert_eq!(featured["name"], "summer sale");
    assert_eq!(featured["slug"], "summer-sale");
    assert_eq!(featured["featuredGender"], "women");
    assert_eq!(featured["isFeatured"], true);

    let single = json_body(
        app.get(&format!("/featuredCategory/singlefeaturedcategory/{}", id))
            .await,
    )
    .await;
    assert_eq!(single["singleFeatured"]["id"], id.as_str());

    let updated = app
        .put_json(
            &format!("/featuredCategory/updatefeaturedcategory/{}", id),
            &json!({ "name": "Winter", "featuredGender": "men", "isFeatured": false }),
        )
        .await;
    assert_eq!(updated.status().as_u16(), 200);
    let all = json_body(app.get("/featuredCategory/allfeaturedcategories").await).await;
    assert_eq!(all["allFeaturedCategory"][0]["name"], "winter");
    assert_eq!(all["allFeaturedCategory"][0]["isFeatured"], false);

    let delete_path = format!("/featuredCategory/deletefeaturedcategory/{}", id);
    assert_eq!(app.delete(&delete_path).await.status().as_u16(), 200);
    assert_eq!(app.delete(&delete_path).await.status().as_u16(), 404);
    let all = json_body(app.get("/featuredCategory/allfeaturedcategories").await).await;
    assert_eq!(all["totalCategory"], 0);
}

// --- Product Tests ---

#[tokio::test]
async fn create_product_validates_input() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;

    let mut no_image = product_body(&category_id);
    no_image.as_object_mut().unwrap().remove("image");
    let response = app.post_json("/product/create-product", &no_image).await;
    assert_eq!(response.status().as_u16(), 400);

    let mut no_price = product_body(&category_id);
    no_price.as_object_mut().unwrap().remove("price");
    let response = app.post_json("/product/create-product", &no_price).await;
    assert_eq!(response.status().as_u16(), 400);

    let mut too_many = product_body(&category_id);
    too_many["relatedImages"] = json!((0..6)
        .map(|i| format!("https://img.example.com/{}.png", i))
        .collect::<Vec<_>>());
    let response = app.post_json("/product/create-product", &too_many).await;
    assert_eq!(response.status().as_u16(), 400);

    let unknown_category = product_body(&Uuid::new_v4().to_string());
    let response = app.post_json("/product/create-product", &unknown_category).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn products_are_populated_and_cached() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let featured_id = create_featured(&app, "Summer").await;

    let mut body = product_body(&category_id);
    body["featuredCategory"] = json!(featured_id);
    let response = app.post_json("/product/create-product", &body).await;
    assert_eq!(response.status().as_u16(), 201);
    let product = json_body(response).await["product"].clone();
    assert_eq!(product["name"], "lifting tee");
    assert_eq!(product["description"], "soft cotton");
    assert_eq!(product["relatedImages"].as_array().unwrap().len(), 2);

    let before = app.catalog.reads();
    let all = json_body(app.get("/product/allproducts").await).await;
    json_body(app.get("/product/allproducts").await).await;
    assert_eq!(app.catalog.reads() - before, 1);

    assert_eq!(all["totalProducts"], 1);
    assert_eq!(all["allProducts"][0]["clothCategory"]["categoryName"], "Shirts");
    assert_eq!(all["allProducts"][0]["featuredCategory"]["name"], "summer");

    let id = product["id"].as_str().unwrap();
    let single = json_body(app.get(&format!("/product/allproducts?prodId={}", id)).await).await;
    assert_eq!(single["message"], "Product - lifting tee");
    assert_eq!(single["product"]["clothCategory"]["id"], category_id.as_str());
}

#[tokio::test]
async fn missing_product_detail_is_not_cached() {
    let app = spawn_app();
    let path = format!("/product/allproducts?prodId={}", Uuid::new_v4());

    let before = app.catalog.reads();
    assert_eq!(app.get(&path).await.status().as_u16(), 404);
    assert_eq!(app.get(&path).await.status().as_u16(), 404);

    assert_eq!(app.catalog.reads() - before, 2);
}

#[tokio::test]
async fn update_product_replaces_images_and_keeps_known_ids() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let product = create_product(&app, &category_id).await;
    let id = product["id"].as_str().unwrap();
    let kept_id = product["relatedImages"][0]["id"].clone();

    let mut body = product_body(&category_id);
    body["name"] = json!("Lifting Tee V2");
    body["image"] = json!("https://img.example.com/tee-v2.png");
    body["relatedImages"] = json!(["https://img.example.com/a.png", "https://img.example.com/c.png"]);

    let response = app
        .put_json(&format!("/product/update-product/{}", id), &body)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let updated = json_body(response).await["updatedProduct"].clone();

    assert_eq!(updated["name"], "lifting tee v2");
    assert_eq!(updated["image"], "https://img.example.com/tee-v2.png");
    let images = updated["relatedImages"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["id"], kept_id);
    assert_ne!(images[1]["id"], product["relatedImages"][1]["id"]);

    let all = json_body(app.get("/product/allproducts").await).await;
    assert_eq!(all["allProducts"][0]["name"], "lifting tee v2");
}

#[tokio::test]
async fn update_product_without_images_keeps_them() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let product = create_product(&app, &category_id).await;
    let id = product["id"].as_str().unwrap();

    let mut body = product_body(&category_id);
    let fields = body.as_object_mut().unwrap();
    fields.remove("image");
    fields.remove("relatedImages");
    fields.insert("price".to_string(), json!(24.5));

    let response = app
        .put_json(&format!("/product/update-product/{}", id), &body)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let updated = json_body(response).await["updatedProduct"].clone();

    assert_eq!(updated["price"], 24.5);
    assert_eq!(updated["image"], product["image"]);
    assert_eq!(updated["relatedImages"], product["relatedImages"]);
}

#[tokio::test]
async fn delete_product_invalidates_listing() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let product = create_product(&app, &category_id).await;
    let id = product["id"].as_str().unwrap();

    assert_eq!(json_body(app.get("/product/allproducts").await).await["totalProducts"], 1);

    let path = format!("/product/deleteproduct/{}", id);
    assert_eq!(app.delete(&path).await.status().as_u16(), 200);
    assert_eq!(app.delete(&path).await.status().as_u16(), 404);

    assert_eq!(json_body(app.get("/product/allproducts").await).await["totalProducts"], 0);
    let single = app.get(&format!("/product/allproducts?prodId={}", id)).await;
    assert_eq!(single.status().as_u16(), 404);
}

#[tokio::test]
async fn update_product_without_featured_category_keeps_it() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let featured_id = create_featured(&app, "Summer").await;

    let mut body = product_body(&category_id);
    body["featuredCategory"] = json!(featured_id);
    let response = app.post_json("/product/create-product", &body).await;
    assert_eq!(response.status().as_u16(), 201);
    let product = json_body(response).await["product"].clone();
    let id = product["id"].as_str().unwrap();

    let response = app
        .put_json(
            &format!("/product/update-product/{}", id),
            &json!({
                "name": "Lifting Tee",
                "clothCategory": category_id,
                "gender": "men",
                "price": 21.0,
                "quantity": 8,
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let updated = json_body(response).await["updatedProduct"].clone();
    assert_eq!(updated["featuredCategoryId"], featured_id.as_str());
    assert_eq!(updated["price"], 21.0);

    let all = json_body(app.get("/product/allproducts").await).await;
    assert_eq!(all["allProducts"][0]["featuredCategory"]["name"], "summer");
}

#[tokio::test]
async fn create_product_accepts_long_image_urls() {
    let app = spawn_app();
    let category_id = create_category(&app, "Shirts").await;
    let long_url = format!("https://img.example.com/{}.png", "a".repeat(300));

    let mut body = product_body(&category_id);
    body["image"] = json!(long_url);
    body["relatedImages"] = json!([long_url]);
    let response = app.post_json("/product/create-product", &body).await;

    assert_eq!(response.status().as_u16(), 201);
    let product = json_body(response).await["product"].clone();
    assert_eq!(product["image"], long_url.as_str());
    assert_eq!(product["relatedImages"][0]["url"], long_url.as_str());
}
