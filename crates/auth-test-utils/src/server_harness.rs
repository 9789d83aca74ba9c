//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real auth service instances in tests.

use crate::crypto_fixtures::test_config;
use auth_service::config::Config;
use auth_service::observability::metrics;
use auth_service::routes::{self, AppState};
use auth_service::services::policy::PolicyEngine;
use auth_service::services::secret_store::SecretStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the auth service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_validate_flow_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/api/v1/auth/validate-token", server.url()))
///         .json(&serde_json::json!({ "access_token": token }))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    config: Config,
    handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server with [`test_config`] and the fail-closed collaborators.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_config(test_config()).await
    }

    /// Spawn a server with a custom configuration.
    pub async fn spawn_with_config(config: Config) -> Result<Self, anyhow::Error> {
        let state = AppState::from_config(config)
            .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?;
        Self::serve(state).await
    }

    /// Spawn a server whose validation facade uses the given TOTP secret
    /// store and policy engine.
    pub async fn spawn_with_collaborators(
        secrets: Arc<dyn SecretStore>,
        policy: Arc<dyn PolicyEngine>,
    ) -> Result<Self, anyhow::Error> {
        let mut state = AppState::from_config(test_config())
            .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?;
        state.validation = state
            .validation
            .clone()
            .with_secret_store(secrets)
            .with_policy_engine(policy);
        Self::serve(state).await
    }

    async fn serve(state: AppState) -> Result<Self, anyhow::Error> {
        let config = state.config.clone();

        // The global recorder can only be installed once per process; later
        // servers get a standalone recorder.
        let metrics_handle = match metrics::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => metrics::build_recorder()
                .map_err(|e| anyhow::anyhow!("Failed to build metrics recorder: {}", e))?
                .build_recorder()
                .handle(),
        };

        let app = routes::build_routes(Arc::new(state), metrics_handle);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
