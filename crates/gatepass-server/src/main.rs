use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use gatepass_api::review::ReviewGuard;
use gatepass_api::router::build_router;
use gatepass_api::state::{AdminCredentials, AppState, AppStateInner, ChannelConfig};
use gatepass_bot::BotClient;
use gatepass_gateway::dispatcher::Dispatcher;
use gatepass_store::{ProofStorage, RecordStore};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatepass=debug,tower_http=debug".into()),
        )
        .init();

    // Config — the bot token and both channel ids have no workable default.
    let bot_token = require_env("BOT_TOKEN");
    let premium_channel = require_env("CHANNEL_PREMIUM_ID");
    let lifetime_channel = require_env("CHANNEL_LIFETIME_ID");
    let admin_username = require_env("ADMIN_USERNAME");
    let admin_password = require_env("ADMIN_PASSWORD");

    let jwt_secret = std::env::var("GATEPASS_JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
        eprintln!("FATAL: GATEPASS_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let host = std::env::var("GATEPASS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GATEPASS_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let data_file: PathBuf = std::env::var("GATEPASS_DATA_FILE")
        .unwrap_or_else(|_| "./submissions.json".into())
        .into();
    let uploads_dir: PathBuf = std::env::var("GATEPASS_UPLOADS_DIR")
        .unwrap_or_else(|_| "./uploads".into())
        .into();
    let public_dir: PathBuf = std::env::var("GATEPASS_PUBLIC_DIR")
        .unwrap_or_else(|_| "./public".into())
        .into();
    let contact_handle = std::env::var("CONTACT_HANDLE").unwrap_or_else(|_| "@admin".into());

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        store: RecordStore::open(data_file),
        proofs: ProofStorage::new(uploads_dir.clone()).await?,
        bot: BotClient::new(&bot_token),
        dispatcher: Dispatcher::new(),
        jwt_secret,
        admin: AdminCredentials {
            username: admin_username,
            password: admin_password,
        },
        channels: ChannelConfig {
            premium: premium_channel,
            lifetime: lifetime_channel,
        },
        contact_handle,
        review_guard: ReviewGuard::new(),
    });

    // API routes plus the static collaborators: stored proofs and the
    // dashboard assets.
    let app = build_router(state)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gatepass listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn require_env(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            eprintln!("FATAL: {name} is not set in the environment or .env file.");
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
