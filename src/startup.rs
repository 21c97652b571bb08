//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::application::{HostHandle, HostSynchronizer};
use crate::config::Settings;
use crate::infrastructure::device::HeadlessDevice;
use crate::presentation::http::handlers::health::init_server_start;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub host: HostHandle,
    pub settings: Arc<Settings>,
}

/// Router with tracing and CORS layers applied
pub fn build_router(state: AppState) -> Router {
    let cors_layer = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors_layer)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    host: HostHandle,
    host_task: JoinHandle<()>,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        init_server_start();

        // Start the host event loop
        let device = Arc::new(HeadlessDevice::new());
        let (host, host_task) = HostSynchronizer::from_settings(&settings, device).spawn();
        tracing::info!(
            pairing_code = %host.pairing_code(),
            peer_id = %host.peer_id(),
            "Host ready for pairing"
        );

        let state = AppState {
            host: host.clone(),
            settings: Arc::new(settings.clone()),
        };
        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(settings.server_addr()).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router,
            host,
            host_task,
        })
    }

    /// Run the server until Ctrl+C, then stop the host
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Shutting down host");
        self.host.shutdown();
        self.host_task.await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
