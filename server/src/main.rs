//! FILENAME: server/src/main.rs
use std::sync::Arc;

use analyse_server::config::Config;
use analyse_server::http::{router, AppState};
use analyse_server::source::FallbackSource;
use analyse_server::{dataset, logging};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    logging::init(config.log_level);

    let store = dataset::build_store(config.dataset_size, config.seed);
    log::info!(
        "fact store built: {} records, {} orders (seed {})",
        store.len(),
        store.total_orders(),
        config.seed
    );

    let state = Arc::new(AppState {
        source: FallbackSource::memory_only(store),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, router(state)).await
}
