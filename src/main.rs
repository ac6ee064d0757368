use log::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use crate::cache::{CacheStore, CachedFetcher};
use crate::config::Config;
use crate::http::HttpClient;
use crate::nps::NpsCrawl;
use crate::places::PlacesClient;
use crate::repl::Repl;

mod cache;
mod config;
mod http;
mod nps;
mod places;
mod repl;
mod utils;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// log to stderr, `RUST_LOG` overrides the default `info` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

async fn run() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::from_env()?;

    let fetcher = CachedFetcher::new(CacheStore::new(&config.cache_file));
    let client = HttpClient::new()?;
    let crawl = NpsCrawl::new(client.clone(), fetcher.clone(), &config.nps_base_url);
    let places = PlacesClient::new(client, fetcher, &config.api_key, &config.radius_url);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    Repl::new(&crawl, &places, stdin, std::io::stdout()).run().await
}
