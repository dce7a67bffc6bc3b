/// Common test utilities for API integration tests
///
/// Each [`TestContext`] owns a fresh file-mode store in a temporary directory,
/// bootstrapped with an admin account per country, and the router built on it.
/// Requests are driven in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use buildledger_api::app::{build_router, AppState};
use buildledger_api::config::{ApiConfig, Config, JwtConfig, SeedSettings, StorageConfig};
use buildledger_shared::auth::jwt::{create_token, Claims};
use buildledger_shared::models::{Country, CreateUser, UserRole};
use buildledger_shared::store::{bootstrap, StorageModePreference, Store, StoreConfig};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<Store>,
    pub config: Config,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: "*".to_string(),
            },
            storage: StorageConfig {
                mode: StorageModePreference::File,
                data_dir: dir.path().to_path_buf(),
                database_url: None,
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "api-test-secret-key-at-least-32-bytes".to_string(),
            },
            seed: SeedSettings {
                admin_username: ADMIN_USERNAME.to_string(),
                admin_password: ADMIN_PASSWORD.to_string(),
                admin_full_name: None,
            },
        };

        let store = Store::connect(StoreConfig::file(dir.path())).await?;
        bootstrap(&store, &config.seed_config()).await?;

        let state = AppState::new(store, config.clone());
        let store = state.store.clone();
        let app = build_router(state);

        Ok(Self {
            app,
            store,
            config,
            _dir: dir,
        })
    }

    /// Token of the bootstrapped admin of `country`
    pub async fn admin_token(&self, country: Country) -> String {
        let admin = self
            .store
            .find_user_by_username(country, ADMIN_USERNAME)
            .await
            .expect("admin seeded");
        self.sign(&Claims::for_user(&admin))
    }

    /// Creates an account with `role` and returns its token
    pub async fn token_for(&self, country: Country, username: &str, role: UserRole) -> String {
        let user = self
            .store
            .create_user(CreateUser {
                country: Some(country),
                username: username.to_string(),
                password: "member-password".to_string(),
                role,
                ..Default::default()
            })
            .await
            .expect("user created");
        self.sign(&Claims::for_user(&user))
    }

    pub fn sign(&self, claims: &Claims) -> String {
        create_token(claims, &self.config.jwt.secret).expect("token signed")
    }

    /// Sends a request and returns the status with the parsed JSON body
    pub async fn send(
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
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}
