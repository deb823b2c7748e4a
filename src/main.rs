// Plaktaki planner API server
// Entry point: logging, configuration, state wiring, serve.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plaktaki::{app, auth, config::Config, http};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plaktaki=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // `plaktaki hash-password <password>` prints a hash for
    // PLAKTAKI_ADMIN_PASSWORD_HASH and exits.
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("hash-password") {
        let password = args
            .next()
            .context("Usage: plaktaki hash-password <password>")?;
        println!("{}", auth::hash_password(&password)?);
        return Ok(());
    }

    tracing::info!("Starting plaktaki server");

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = app::init(&config).await.context("Failed to initialize")?;
    let router = http::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
