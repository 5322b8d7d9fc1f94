use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod hn_client;
mod models;
mod server;
mod stories;

use crate::cache::StoryCache;
use crate::config::Config;
use crate::hn_client::{HackerNewsClient, ItemSource};
use crate::server::{index, AppState};

const CACHE_TTL: Duration = Duration::from_secs(10);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    info!(
        port = config.port,
        num_stories = config.num_stories,
        "starting hn-top-links"
    );

    let source: Arc<dyn ItemSource> = Arc::new(HackerNewsClient::new());
    let state = web::Data::new(AppState {
        source,
        cache: StoryCache::new(CACHE_TTL),
        num_stories: config.num_stories,
    });

    HttpServer::new(move || App::new().app_data(state.clone()).service(index))
        .bind(("0.0.0.0", config.port))?
        .run()
        .await?;

    Ok(())
}
