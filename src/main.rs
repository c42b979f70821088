mod config;
mod domain;
mod middleware;
mod state;
mod store;
mod web;

use crate::config::AppConfig;
use crate::state::{AppState, SharedState};
use crate::store::{InMemoryStore, SessionStore};
use axum::{routing::get_service, Router};
use std::path::Path;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Store capacity {} slots, idle eviction after {}h",
        config.store_max_slots,
        config.slot_idle.as_secs() / 3600
    );

    let store: Arc<dyn SessionStore> = Arc::new(InMemoryStore::new(config.store_max_slots));
    let shared: SharedState = AppState::new(config, store);

    let scheduler = JobScheduler::new().await?;

    // Slot cleanup - drop idle slots, drafts and limiter history every hour
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 0 * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let max_idle = state.config.slot_idle;
                let slots = state.store.evict_idle(max_idle).await;
                let drafts = state.evict_idle_drafts(max_idle).await;
                let limited = state.feedback_limiter.prune().await;
                if slots + drafts + limited > 0 {
                    tracing::info!(
                        "Cleaned up {} idle slots, {} drafts, {} limiter entries",
                        slots,
                        drafts,
                        limited
                    );
                }
            })
        })?)
        .await?;

    scheduler.start().await?;
    tracing::info!("Scheduler started: slot cleanup hourly");

    let static_dir = Path::new(&shared.config.static_dir);
    let static_handler =
        ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    let app = Router::new()
        .merge(web::routes(shared.clone()))
        .fallback_service(get_service(static_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = shared.config.bind_addr.clone();
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
