use vidrelay_core::Config;

// Use mimalloc as the global allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (telemetry, database, media sink, routes)
    let (_state, router) = vidrelay_api::setup::initialize_app(config.clone()).await?;

    vidrelay_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
