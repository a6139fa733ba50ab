use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};
use tube_extractor::{Downloader, HttpDownloader, ServiceRegistry};
use tubeproxy::api::server::shutdown_signal;
use tubeproxy::api::{ApiServer, AppState};
use tubeproxy::config::Args;
use tubeproxy::logging::init_logging;

fn main() -> anyhow::Result<()> {
    // Load .env before parsing so its values feed the env-backed options.
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = init_logging(&args.log_filter, args.log_dir.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(usize::from(args.workers))
        .thread_name("tubeproxy-worker")
        .enable_all()
        .build()
        .context("Failed to build the tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let services = args.service_urls();
    if services.is_empty() {
        return Err(tubeproxy::Error::config("at least one --service is required").into());
    }

    let downloader = HttpDownloader::new(args.proxy());
    match downloader.proxy() {
        Some(proxy) => info!(proxy = %proxy.url, kind = ?proxy.kind, "Outbound requests use a proxy"),
        None => info!("Outbound requests are not proxied"),
    }
    let downloader: Arc<dyn Downloader> = Arc::new(downloader);

    let registry = ServiceRegistry::from_peertube_instances(services, downloader);
    for service in registry.iter() {
        info!(id = service.service_id(), name = service.name(), "Registered service");
    }

    let state = AppState::new(registry);
    spawn_warm_up(&state);

    let server = ApiServer::new(args.server_config(), state);
    tokio::spawn(shutdown_signal(server.cancel_token()));

    if let Err(e) = server.run().await {
        warn!(error = %e, "API server stopped with an error");
        return Err(e.into());
    }
    info!("tubeproxy stopped");
    Ok(())
}

/// Fetches the default trending page once so the first client request does
/// not pay for connection setup. Failures only matter for the log.
fn spawn_warm_up(state: &AppState) {
    let Some(service) = state.registry.get(0).cloned() else {
        return;
    };
    tokio::spawn(async move {
        match service.trending_first_page().await {
            Ok(info) => debug!(items = info.page.items.len(), "Warm-up trending request completed"),
            Err(e) => debug!(error = %e, "Warm-up trending request failed"),
        }
    });
}
