use std::io::Write;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use complexapp_client::auth;
use complexapp_client::config::Config;
use complexapp_client::App;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        api_base_url = %config.api_base_url,
        storage = %config.storage_path.display(),
        "Configuration loaded"
    );

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let app = App::new(config).context("Failed to initialize client")?;

    // A token the server no longer accepts logs the user out before rendering
    if let Err(e) = auth::verify_session(app.api(), app.store()).await {
        warn!("Could not verify stored session: {e}");
    }

    let document = tokio::time::timeout(app.config().render_timeout, app.render_path(&path))
        .await
        .with_context(|| format!("Timed out rendering {path}"))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(document.into_string().as_bytes())
        .context("Failed to write document")?;
    stdout.write_all(b"\n").context("Failed to write document")?;

    info!(path = %path, "Page rendered");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,complexapp_client=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so the rendered document can be piped
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
