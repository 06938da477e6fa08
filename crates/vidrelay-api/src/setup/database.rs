//! Database setup and initialization

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use vidrelay_core::Config;

const MIGRATION_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Build the connection pool without touching the network.
///
/// An unreachable store must not stop the server from binding, so the first
/// connection and the migrations happen in a background task. That task keeps
/// retrying until the schema is in place.
pub fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(&config.store_connection_uri)
        .context("Invalid DATABASE_URL")?;

    let background_pool = pool.clone();
    tokio::spawn(async move {
        tracing::info!("Connecting to database...");
        let attempts = retry_until_ok(
            || vidrelay_db::run_migrations(&background_pool),
            MIGRATION_RETRY_DELAY,
        )
        .await;
        tracing::info!(attempts, "Connected to database");
    });

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database pool configured"
    );

    Ok(pool)
}

/// Run `attempt` until it succeeds, sleeping `delay` between failures.
/// Returns the number of attempts made.
async fn retry_until_ok<F, Fut, E>(mut attempt: F, delay: Duration) -> u32
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt().await {
            Ok(()) => return attempts,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    attempt = attempts,
                    retry_in_secs = delay.as_secs(),
                    "Database connection error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
