//! Retainer Gateway - retained pub/sub resources over HTTP

use clap::Parser;
use retainer_gateway::{run_server, AppState, GatewayConfig};
use retainer_store::BroadcastEventSink;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "retainer-gateway")]
#[command(about = "HTTP gateway for retained pub/sub resources")]
#[command(version)]
struct Args {
    /// Configuration file (TOML, YAML, JSON, ...)
    #[arg(short, long, env = "RETAINER_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// JWT secret for access token validation
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Require access tokens and scopes
    #[arg(long)]
    auth: bool,

    /// Enable debug logging
    #[arg(short, long, env = "RETAINER_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("retainer_gateway={log_level},retainer_store={log_level},tower_http={log_level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = GatewayConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.jwt_secret.is_some() {
        config.jwt_secret = args.jwt_secret;
    }
    if args.auth {
        config.auth_enabled = true;
    }

    tracing::info!("Starting Retainer gateway on {}", config.bind_addr());

    let events = BroadcastEventSink::new(config.event_capacity);
    spawn_event_logger(&events);

    let state = AppState::new(config).with_events(Arc::new(events));
    run_server(Arc::new(state)).await
}

/// Log every retained update
fn spawn_event_logger(events: &BroadcastEventSink) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::info!(
                        topic = %event.topic,
                        payload = %String::from_utf8_lossy(&event.payload),
                        "Retained topic updated"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagging, updates skipped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
