#![allow(dead_code)]

use reqwest::{Client, Response};
use serde_json::Value;
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;

use gym_shop::configuration::{
    ApplicationSettings, CacheSettings, DatabaseSettings, JwtSettings, Settings, StorageBackend,
};
use gym_shop::startup::{run, Stores};
use gym_shop::store::{InMemoryCatalogStore, InMemoryUserStore};

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub users: Arc<InMemoryUserStore>,
    pub catalog: Arc<InMemoryCatalogStore>,
}

pub fn test_settings(cache: CacheSettings) -> Settings {
    Settings {
        database: DatabaseSettings {
            backend: StorageBackend::Memory,
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "gym_shop".to_string(),
            max_connections: 1,
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: Some(1),
            cors_origin: None,
            password_hash_cost: 4,
        },
        jwt: JwtSettings {
            access_token_secret: "test-access-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_secret: "test-refresh-secret".to_string(),
            refresh_token_expiry: 3600,
            issuer: "gym_shop".to_string(),
        },
        cache,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(CacheSettings::default())
}

pub fn spawn_app_with(cache: CacheSettings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let users = Arc::new(InMemoryUserStore::new());
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let stores = Stores {
        users: users.clone(),
        catalog: catalog.clone(),
    };

    let server = run(listener, stores, &test_settings(cache)).expect("Failed to create server");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: Client::new(),
        users,
        catalog,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_authed(&self, path: &str, access_token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn register(&self, user_name: &str, email: &str, password: &str) -> Response {
        self.post_json(
            "/user/register",
            &serde_json::json!({
                "userName": user_name,
                "fullName": "Test User",
                "email": email,
                "password": password,
                "answer": "blue",
            }),
        )
        .await
    }

    pub async fn login(&self, user_name: &str, password: &str) -> Response {
        self.post_json(
            "/user/login",
            &serde_json::json!({ "userName": user_name, "password": password }),
        )
        .await
    }

    /// Register and log in; returns (user id, access token, refresh token)
    pub async fn logged_in_user(&self, user_name: &str) -> (Uuid, String, String) {
        let email = format!("{}@example.com", user_name);
        assert_eq!(self.register(user_name, &email, "hunter22").await.status().as_u16(), 200);

        let response = self.login(user_name, "hunter22").await;
        assert_eq!(response.status().as_u16(), 200);
        let access = cookie_value(&response, "accessToken").expect("accessToken cookie");
        let refresh = cookie_value(&response, "refreshToken").expect("refreshToken cookie");
        let body: Value = response.json().await.unwrap();
        let id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();

        (id, access, refresh)
    }
}

/// Value of a `Set-Cookie` header by cookie name
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter_map(|h| h.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.to_string())
}

/// Full `Set-Cookie` header by cookie name
pub fn set_cookie_header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|h| h.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}
