pub mod api;
pub mod domain;
pub mod projections;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::sync::Arc;

use projections::p950_tender_registry::store;
use shared::remote::{HttpFileSource, YandexDiskClient};
use system::tasks::RefreshWorker;
use usecases::u601_refresh_tenders::RefreshExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    tracing::info!(
        "Tender folder: {}, mapping: {}",
        config.yandex_disk.public_link,
        config.mapping.url
    );

    let folder = Arc::new(YandexDiskClient::new(&config.yandex_disk)?);
    let mapping_source = Arc::new(HttpFileSource::new(&config.mapping)?);
    let executor = Arc::new(RefreshExecutor::new(
        folder,
        mapping_source,
        store::global(),
    ));

    // Первое обновление сразу, затем раз в interval_hours
    let worker = RefreshWorker::new(executor, config.refresh.interval());
    tokio::spawn(async move { worker.run_loop().await });

    let app = routes::configure_routes();

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
