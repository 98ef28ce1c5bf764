#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use laundry_service::{
    build_router,
    config::{
        Environment, JwtConfig, LaundryConfig, MongoConfig, ObservabilityConfig, SecurityConfig,
        DEFAULT_ALLOWED_ORIGINS,
    },
    models::{Entity, Role, User},
    services::{DocumentStore, InMemoryStore, Repository},
    utils::{hash_password, Password},
    AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub fn test_config() -> LaundryConfig {
    LaundryConfig {
        common: service_core::config::Config { port: 0 },
        environment: Environment::Dev,
        mongodb: MongoConfig {
            uri: "mongodb://unused".to_string(),
            database: "apkclaundry_test".to_string(),
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_hours: 24,
        },
        security: SecurityConfig {
            allowed_origins: laundry_service::config::parse_origins(DEFAULT_ALLOWED_ORIGINS),
        },
        observability: ObservabilityConfig {
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Router over an empty in-memory store with the `username` unique index in place.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        store
            .ensure_unique_index(User::COLLECTION, "username")
            .await
            .expect("Failed to create index");

        let state = AppState::new(test_config(), store.clone());
        let router = build_router(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    /// Insert a user directly, bypassing `/register`.
    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> String {
        let hash = hash_password(&Password::new(password.to_string()))
            .expect("Failed to hash password");
        self.seed_user_with_hash(username, hash.into_string(), role)
            .await
    }

    /// Insert a user whose stored password hash is given as-is.
    pub async fn seed_user_with_hash(&self, username: &str, hash: String, role: Role) -> String {
        let mut user = User {
            id: None,
            username: username.to_string(),
            password: hash,
            role,
            phone: "08123456789".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            salary: 2_500_000.0,
            salary_date: None,
            hired_date: mongodb::bson::DateTime::now(),
        };

        Repository::<User>::new(self.store.clone())
            .insert(&mut user)
            .await
            .expect("Failed to seed user")
            .to_hex()
    }

    /// A token for a user that need not exist in the store.
    pub fn token(&self, role: Role) -> String {
        let username = match role {
            Role::Admin => "admin-token",
            Role::Staff => "staff-token",
        };
        self.state
            .jwt
            .generate_token("000000000000000000000000", username, role)
            .expect("Failed to generate token")
    }

    pub fn admin_token(&self) -> String {
        self.token(Role::Admin)
    }

    pub fn staff_token(&self) -> String {
        self.token(Role::Staff)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
