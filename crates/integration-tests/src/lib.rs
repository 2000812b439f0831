//! Integration test harness for the Fashion Store storefront.
//!
//! Each test spawns the storefront router in-process against an in-process
//! mock of the REST backend, then drives it over HTTP with a cookie-holding
//! [`reqwest`] client the way a browser would.
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let resp = app.client.get(app.url("/")).send().await.unwrap();
//! assert_eq!(resp.status(), StatusCode::OK);
//! ```

mod backend;

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect;
use secrecy::SecretString;
use url::Url;

use fashion_store_storefront::app;
use fashion_store_storefront::config::{BackendApiConfig, StorefrontConfig};
use fashion_store_storefront::state::AppState;

pub use backend::{BackendState, MockBackend};

/// A storefront instance wired to its own mock backend.
pub struct TestApp {
    /// Base address of the storefront, e.g. `http://127.0.0.1:43817`.
    pub address: String,
    /// Cookie-holding client that follows redirects, like a browser.
    pub client: reqwest::Client,
    /// Same cookie jar, but redirects are not followed. Use this to
    /// assert on `Location` headers.
    pub bare_client: reqwest::Client,
    /// Handle to the mock backend for seeding and inspection.
    pub backend: MockBackend,
}

impl TestApp {
    /// Start a mock backend and a storefront pointed at it.
    pub async fn spawn() -> Self {
        let backend = MockBackend::spawn().await;

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind storefront listener");
        let port = listener
            .local_addr()
            .expect("Failed to read storefront address")
            .port();
        let address = format!("http://127.0.0.1:{port}");

        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port,
            base_url: address.clone(),
            session_secret: SecretString::from("integration-test-session-secret-0123456789"),
            api: BackendApiConfig {
                base_url: Url::parse(&backend.base_url).expect("Mock backend URL invalid"),
                timeout: Duration::from_secs(5),
            },
            environment: "test".to_string(),
            sentry_dsn: None,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("Failed to build storefront state");
        let router = app(state);

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Storefront server error");
        });

        // One jar shared by both clients so a login done through either
        // is visible to the other.
        let jar = Arc::new(reqwest::cookie::Jar::default());

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .expect("Failed to build HTTP client");

        let bare_client = reqwest::Client::builder()
            .cookie_provider(jar)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build bare HTTP client");

        Self {
            address,
            client,
            bare_client,
            backend,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Log in as the seeded user and return the landing page body.
    pub async fn login(&self) -> String {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("email", "joao@email.com"), ("password", "admin")])
            .send()
            .await
            .expect("Failed to execute login request");
        assert!(
            resp.status().is_success(),
            "Login did not land on a page: {}",
            resp.status()
        );
        resp.text().await.expect("Failed to read login response")
    }
}
