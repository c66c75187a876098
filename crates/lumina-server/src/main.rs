#![forbid(unsafe_code)]

use lumina_payments::{FakeGateway, PaymentGateway, StripeGateway};
use lumina_server::{build_router, AppState, Config, INSECURE_JWT_SECRET, PLACEHOLDER_STRIPE_KEY};
use lumina_store::Store;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn config_from_env() -> Result<Config, String> {
    let baseline = Config::default();
    let bootstrap_admin_email = match env::var("LUMINA_BOOTSTRAP_ADMIN_EMAIL") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(
            lumina_model::Email::parse(&raw)
                .map_err(|e| format!("LUMINA_BOOTSTRAP_ADMIN_EMAIL: {e}"))?,
        ),
        Err(_) => baseline.bootstrap_admin_email.clone(),
    };
    let port = env_string("LUMINA_PORT", "4000");
    Ok(Config {
        listen_addr: env_string("LUMINA_LISTEN_ADDR", &format!("0.0.0.0:{port}")),
        db_path: env_string("LUMINA_DB_PATH", "lumina.sqlite").into(),
        jwt_secret: env_string("LUMINA_JWT_SECRET", &baseline.jwt_secret),
        stripe_secret_key: env_string("LUMINA_STRIPE_SECRET_KEY", &baseline.stripe_secret_key),
        stripe_base_url: env_string("LUMINA_STRIPE_BASE_URL", &baseline.stripe_base_url),
        bootstrap_admin_email,
        currency: env_string("LUMINA_CURRENCY", &baseline.currency),
        max_body_bytes: env_usize("LUMINA_MAX_BODY_BYTES", baseline.max_body_bytes),
    })
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env()?;
    if config.jwt_secret == INSECURE_JWT_SECRET {
        warn!("LUMINA_JWT_SECRET is the insecure default; do not ship this");
    }

    let store =
        Store::open(&config.db_path).map_err(|e| format!("failed to open store: {e}"))?;
    info!(path = %config.db_path.display(), "store opened");

    let payments: Arc<dyn PaymentGateway> =
        if config.stripe_secret_key == PLACEHOLDER_STRIPE_KEY {
            warn!("LUMINA_STRIPE_SECRET_KEY unset; using the in-memory fake gateway");
            Arc::new(FakeGateway::new())
        } else {
            Arc::new(StripeGateway::new(
                config.stripe_secret_key.clone(),
                config.stripe_base_url.clone(),
            ))
        };

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(store, payments, config);
    let app = build_router(state);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| format!("bind {listen_addr} failed: {e}"))?;
    info!("lumina-server listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
