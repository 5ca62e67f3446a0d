pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::sync::{Arc, Mutex};

use crate::infrastructure::config::ServerConfig;

/// Initialize logging, load configuration, and run the HTTP server
/// until it is shut down.
pub async fn run() -> std::io::Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = ServerConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_upload_bytes = config.max_upload_bytes,
        "starting plotserve"
    );

    let logs = Arc::new(Mutex::new(Vec::new()));
    interfaces::http::start_server(config, logs)?.await
}
