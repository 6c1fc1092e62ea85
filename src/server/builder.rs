//! ServerBuilder for fluent API to build HTTP servers

use super::host::ServerHost;
use crate::config::ServerConfig;
use crate::core::error::{RestioError, RestioResult};
use crate::core::module::Module;
use crate::core::url::{ConstantServiceUrlProvider, ServiceUrlProvider};
use crate::registry::ResourceRegistry;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating JSON:API servers with registry-driven routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_service_url("https://api.example.com")
///     .register_module(TaskModule)
///     .build()?;
/// ```
pub struct ServerBuilder {
    url_provider: Option<Arc<dyn ServiceUrlProvider>>,
    modules: Vec<Arc<dyn Module>>,
    custom_routes: Vec<Router>,
    config: Option<ServerConfig>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            url_provider: None,
            modules: Vec::new(),
            custom_routes: Vec::new(),
            config: None,
        }
    }

    /// Take the bind address and service URL from a loaded configuration.
    ///
    /// An explicit `with_service_url`/`with_service_url_provider` call wins
    /// over the configured `service_url`.
    pub fn from_config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a fixed base URL for resource links (required unless a provider
    /// or a configuration is supplied).
    pub fn with_service_url(mut self, base_url: impl Into<String>) -> Self {
        self.url_provider = Some(Arc::new(ConstantServiceUrlProvider::new(base_url)));
        self
    }

    /// Use a custom base URL source, e.g.
    /// [`RequestUrlProvider`](crate::core::url::RequestUrlProvider) to echo
    /// whatever host the client reached.
    pub fn with_service_url_provider(mut self, provider: impl ServiceUrlProvider + 'static) -> Self {
        self.url_provider = Some(Arc::new(provider));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for routes outside the JSON:API resource pattern, such as
    /// authentication endpoints or webhooks.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a module; its resources are added to the registry during
    /// `build_host`.
    pub fn register_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Run every module's registration and freeze the result.
    ///
    /// Fails fast on the first module whose registration errors, naming the
    /// module; a registry missing entries must not serve requests.
    pub fn build_host(self) -> RestioResult<ServerHost> {
        let url_provider = match self.url_provider {
            Some(provider) => provider,
            None => {
                let config = self.config.as_ref().ok_or_else(|| RestioError::Config {
                    message: "Service URL is required. Call .with_service_url() or .from_config()"
                        .to_string(),
                })?;
                Arc::new(ConstantServiceUrlProvider::new(config.service_url.clone()))
            }
        };

        let mut registry = ResourceRegistry::new(url_provider);
        for module in &self.modules {
            module
                .register(&mut registry)
                .map_err(|err| RestioError::Config {
                    message: format!("module '{}' failed to register: {}", module.name(), err),
                })?;
            tracing::info!(module = module.name(), "registered module");
        }
        tracing::info!(resources = registry.len(), "resource registry built");

        Ok(ServerHost::from_builder_components(
            registry,
            self.custom_routes,
        ))
    }

    /// Build the final router: resource routes for every registered type,
    /// relationship routes, introspection and health routes.
    pub fn build(self) -> RestioResult<Router> {
        Ok(self.build_host()?.router())
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds `addr` (falling back to the configured bind address when `addr`
    /// is empty), serves requests and handles SIGTERM and Ctrl+C.
    pub async fn serve(self, addr: &str) -> RestioResult<()> {
        let addr = if addr.is_empty() {
            self.config
                .as_ref()
                .map(ServerConfig::bind_addr)
                .ok_or_else(|| RestioError::Config {
                    message: "No bind address: pass one to serve() or call .from_config()"
                        .to_string(),
                })?
        } else {
            addr.to_string()
        };

        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await.map_err(|err| {
            RestioError::internal_with_cause(format!("failed to bind {}", addr), err)
        })?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| RestioError::internal_with_cause("server error", err))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
