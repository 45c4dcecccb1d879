use post_service::api::{normalize_base_path, router};
use post_service::config::{ServiceConfig, flag_args, help_requested, program_name, usage};
use post_service::store::store::PostStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = program_name(&args);

    if help_requested(flag_args(&args)) {
        println!("{}", usage(program));
        return Ok(());
    }

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!("{}", usage(program));
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // 1. Record store:
    let store = Arc::new(PostStore::open(&config.data_file).await?);

    // 2. HTTP Router:
    let app = router(store, &config.base_path);

    // 3. Start HTTP server:
    tracing::info!(
        "HTTP server listening on {} (posts at {}/post)",
        config.bind_addr,
        normalize_base_path(&config.base_path)
    );
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
