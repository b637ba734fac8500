use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use remotrack::config::{Config, ImageRelayConfig};
use remotrack::db::{MemoryStore, PgStore};
use remotrack::state::{AppState, SharedState};

/// Upper bound the relay accepts in tests.
pub const TEST_IMAGE_MAX_BYTES: usize = 1024;

/// HTTP helpers shared by every kind of test server.
pub struct ApiClient {
    pub addr: SocketAddr,
    pub client: Client,
}

/// A running test server backed by an in-process store.
#[allow(dead_code)]
pub struct TestApp {
    pub api: ApiClient,
    #[allow(dead_code)]
    pub store: Arc<MemoryStore>,
    #[allow(dead_code)]
    pub state: SharedState,
}

impl Deref for TestApp {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.api
    }
}

/// A running test server backed by its own temporary Postgres database.
#[allow(dead_code)]
pub struct PgTestApp {
    pub api: ApiClient,
    pub pool: PgPool,
    pub db_name: String,
}

impl Deref for PgTestApp {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.api
    }
}

impl ApiClient {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body, return (body, status).
    #[allow(dead_code)]
    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET a JSON endpoint, return (body, status).
    pub async fn get_json(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    #[allow(dead_code)]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> (Value, StatusCode) {
        self.post_json(
            "/api/auth/register",
            &json!({
                "email": email,
                "password": password,
                "firstName": first_name,
                "lastName": last_name,
            }),
        )
        .await
    }

    #[allow(dead_code)]
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        self.post_json(
            "/api/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register a default user and return its JSON.
    #[allow(dead_code)]
    pub async fn seed_user(&self) -> Value {
        let (body, status) = self
            .register("anna@remotrack.pl", "Remont2024!", "Anna", "Nowak")
            .await;
        assert_eq!(status, StatusCode::OK, "seed register failed: {body}");
        body["user"].clone()
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 1_048_576,
        db_max_connections: 1,
        // bcrypt's minimum keeps the suite fast.
        password_cost: 4,
        image: ImageRelayConfig {
            timeout: Duration::from_millis(500),
            max_bytes: TEST_IMAGE_MAX_BYTES,
        },
        log_level: "warn".to_string(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    addr
}

/// Spawn the API on a random port with a fresh in-memory store.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), test_config()).expect("Failed to build state");
    let addr = serve(remotrack::build_app(state.clone())).await;

    TestApp {
        api: ApiClient {
            addr,
            client: Client::new(),
        },
        store,
        state,
    }
}

fn database_url_with_name(base_url: &str, db_name: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn the API over a fresh, migrated Postgres database.
///
/// Returns `None` when DATABASE_URL is not set so the suite still runs
/// without a server.
#[allow(dead_code)]
pub async fn spawn_pg_app() -> Option<PgTestApp> {
    let _ = dotenvy::dotenv();

    let Ok(base_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let db_name = format!("remotrack_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_with_name(&base_url, "postgres"))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = database_url_with_name(&base_url, &db_name);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        ..test_config()
    };
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config)
        .expect("Failed to build state");
    let addr = serve(remotrack::build_app(state)).await;

    Some(PgTestApp {
        api: ApiClient {
            addr,
            client: Client::new(),
        },
        pool,
        db_name,
    })
}

/// Drop the temporary database behind a Postgres test app.
#[allow(dead_code)]
pub async fn cleanup_pg(app: PgTestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let Ok(base_url) = std::env::var("DATABASE_URL") else {
        return;
    };

    if let Ok(admin_pool) = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_with_name(&base_url, "postgres"))
        .await
    {
        let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
            .execute(&admin_pool)
            .await;
        admin_pool.close().await;
    }
}

/// Spawn an arbitrary router (used as a fake image host).
#[allow(dead_code)]
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    serve(router).await
}
