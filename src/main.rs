//! Public Cache - an in-memory resource cache over a filesystem content store
//!
//! Reads request paths from stdin, one per line, and answers each with the
//! resolved key, where it came from, its content type and its size.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use public_cache::changes::FsNotifier;
use public_cache::source::FsContentSource;
use public_cache::{
    spawn_invalidation_watcher, spawn_reaper_task, CacheStore, Config, Resolver, Resource,
};

/// Main entry point for the cache.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the cache store, content source and resolver
/// 4. Start the invalidation watcher and the expired entry reaper
/// 5. Resolve request paths from stdin until EOF
/// 6. Stop background tasks and print statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "public_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Public Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: content_root={}, max_entry_bytes={}, entry_ttl={}s, reap_interval={}s",
        config.content_root, config.max_entry_bytes, config.entry_ttl, config.reap_interval
    );

    let store: Arc<CacheStore<Resource>> = Arc::new(CacheStore::new());
    let source = Arc::new(FsContentSource::default());
    let resolver = Resolver::from_config(&config, store.clone(), source);

    let watcher = spawn_invalidation_watcher(
        store.clone(),
        Arc::new(FsNotifier::new()),
        resolver.keys().clone(),
        config.content_root.clone(),
    );
    let reaper = spawn_reaper_task(store.clone(), Duration::from_secs(config.reap_interval));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read request path from stdin")?
    {
        let path = line.trim();
        match resolver.resolve(path).await {
            Ok(resolved) => println!(
                "{}\t{}\t{}\t{}",
                resolved.resource.key,
                resolved.origin,
                resolved.resource.content_type,
                resolved.resource.size()
            ),
            Err(e) => {
                warn!("request {:?} failed: {}", path, e);
                println!("{}\terror\t{}", path, e);
            }
        }
    }

    reaper.abort();
    if let Err(e) = watcher.shutdown().await {
        warn!("watcher was not running: {}", e);
    }

    let stats = store.stats().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("failed to encode statistics")?
    );

    info!("Shutdown complete");
    Ok(())
}
