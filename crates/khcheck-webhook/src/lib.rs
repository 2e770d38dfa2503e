pub mod api;
pub mod cli;
pub mod config;
pub mod khcheck;
pub mod tracing;
pub mod validation;

use ::tracing::{info, warn};
use anyhow::{anyhow, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;

use config::{Config, TlsConfig};
use khcheck::KuberhealthyCheck;
use validation::Validator;

/// How long in-flight reviews get to finish once a shutdown signal arrives.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WebhookServer {
    router: Router,
    addr: SocketAddr,
    tls_config: Option<RustlsConfig>,
}

impl WebhookServer {
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let validator = Validator::<KuberhealthyCheck>::new(config.validator_settings());
        info!(
            resource = %validator.settings().expected_resource,
            max_body_size = validator.settings().max_body_size,
            "validator ready"
        );
        let router = api::router(validator);

        let tls_config = match config.tls_config {
            Some(tls_config) => Some(load_tls_config(tls_config).await?),
            None => None,
        };

        Ok(Self {
            router,
            addr: config.addr,
            tls_config,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until SIGINT or SIGTERM is received.
    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();
        tokio::spawn(shutdown_on_signal(handle.clone()));

        match self.tls_config {
            None => {
                info!(address = self.addr.to_string().as_str(), "started HTTP server");
                axum_server::bind(self.addr)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            Some(tls_config) => {
                info!(address = self.addr.to_string().as_str(), "started HTTPS server");
                axum_server::bind_rustls(self.addr, tls_config)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        info!("server stopped");
        Ok(())
    }
}

async fn load_tls_config(tls_config: TlsConfig) -> Result<RustlsConfig> {
    // Both ring and aws-lc-rs end up in the dependency tree, rustls needs to
    // be told which one to use.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    RustlsConfig::from_pem_file(&tls_config.cert_file, &tls_config.key_file)
        .await
        .map_err(|e| {
            anyhow!(
                "cannot load TLS certificate {:?} and key {:?}: {}",
                tls_config.cert_file,
                tls_config.key_file,
                e
            )
        })
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
}
