use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod credential;
mod customers;
mod error;
mod machinery;
mod products;
mod routes;
mod token;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    init_tracing(&config.tracing);
    let signer = token::Signer::from_base64_secret(&config.token_secret)
        .context("configuring token signer")?;
    let store = equiptrack_db::create(&config.database)
        .await
        .context("creating database store")?;
    let app_state = AppState { store, signer };
    let app = routes::setup(app_state);
    let listener = tokio::net::TcpListener::bind((config.bind_address.as_str(), config.bind_port))
        .await
        .context("binding listener")?;
    tracing::info!(
        "listening on {}:{}",
        config.bind_address,
        config.bind_port
    );
    Ok(axum::serve(listener, app)
        .await
        .context("serving application")?)
}

fn init_tracing(config: &config::TracingConfig) {
    if config.console {
        console_subscriber::init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[derive(Clone)]
struct AppState {
    store: equiptrack_db::Store,
    signer: token::Signer,
}
