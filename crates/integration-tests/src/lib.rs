//! Integration tests for the cafe API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cafe-api-integration-tests
//! ```
//!
//! Each test boots the real router on an ephemeral local port, backed by a
//! private in-memory SQLite database, and talks to it over HTTP.

use std::net::SocketAddr;
use std::path::Path;

use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;

use cafe_api_server::config::ServerConfig;
use cafe_api_server::db;
use cafe_api_server::state::AppState;

/// API key the test server is configured with.
pub const TEST_API_KEY: &str = "TopSecretAPIKey";

/// A running server plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0` with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the database, config or listener cannot be set up.
    pub async fn spawn() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to open in-memory database");
        Self::spawn_with_pool(pool).await
    }

    /// Start a server over a database file in `dir`, with a pool of
    /// `max_connections` connections.
    ///
    /// # Panics
    ///
    /// Panics if the database, config or listener cannot be set up.
    pub async fn spawn_on_disk(dir: &Path, max_connections: u32) -> Self {
        let url = format!("sqlite://{}", dir.join("cafes.db").display());
        let pool = db::create_pool(&SecretString::from(url), max_connections)
            .await
            .expect("Failed to open database file");
        Self::spawn_with_pool(pool).await
    }

    async fn spawn_with_pool(pool: SqlitePool) -> Self {
        db::init_schema(&pool)
            .await
            .expect("Failed to create cafe table");

        let config = ServerConfig::from_lookup(|key| {
            (key == "CAFE_API_KEY").then(|| TEST_API_KEY.to_string())
        })
        .expect("Failed to build test configuration");

        let app = cafe_api_server::build_router(AppState::new(config, pool));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    /// POST a cafe to `/add` with every field filled in.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn add_cafe(&self, name: &str, location: &str) -> Response {
        let map_url = format!("https://maps.example.com/{name}");
        let img_url = format!("https://img.example.com/{name}.jpg");
        self.add_form(&[
            ("name", name),
            ("map_url", &map_url),
            ("img_url", &img_url),
            ("loc", location),
            ("seats", "20-30"),
            ("toilet", "1"),
            ("wifi", "1"),
            ("sockets", "1"),
            ("calls", ""),
            ("coffee_price", "£2.50"),
        ])
        .await
    }

    /// POST arbitrary form fields to `/add`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn add_form(&self, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url("/add"))
            .form(fields)
            .send()
            .await
            .expect("Failed to send POST /add")
    }

    /// POST text fields to `/add` as `multipart/form-data`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn add_multipart(&self, fields: &[(&str, &str)]) -> Response {
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text((*name).to_string(), (*value).to_string())
            });

        self.client
            .post(self.url("/add"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart POST /add")
    }

    /// Fetch `/all` and return the `cafes` array.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not the expected shape.
    pub async fn all_cafes(&self) -> Vec<Value> {
        let body: Value = self
            .get("/all")
            .await
            .json()
            .await
            .expect("Failed to parse /all body");
        body["cafes"]
            .as_array()
            .cloned()
            .expect("/all body has no cafes array")
    }

    /// Find a cafe's id by name via `/all`.
    ///
    /// # Panics
    ///
    /// Panics if no cafe has that name.
    pub async fn cafe_id(&self, name: &str) -> i64 {
        self.all_cafes()
            .await
            .iter()
            .find(|cafe| cafe["name"] == name)
            .and_then(|cafe| cafe["id"].as_i64())
            .expect("cafe not found by name")
    }
}
