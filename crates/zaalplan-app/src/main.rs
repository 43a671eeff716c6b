use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use zaalplan_app::app::api::routes;
use zaalplan_app::config::{ConfigHandler, Settings, StorageBackend};
use zaalplan_app::service_handler::BookingServiceHandler;
use zaalplan_core::config::load_config;
use zaalplan_db::db::connection::create_pool;
use zaalplan_db::migrations::run_pending;
use zaalplan_service::booking::BookingService;
use zaalplan_service::store::memory::{MemoryBookingStore, MemoryDirectory, MemoryInquiryStore};
use zaalplan_service::store::pg::PgStore;
use zaalplan_service::sync::NoopPublisher;
use zaalplan_service::sync::outbox::OutboxPublisher;
use zaalplan_service::sync::relay::{RelaySettings, SyncRelay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Zaalplan venue scheduler");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let service = build_service(&config).await?;

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::new(config),
        })
        .hoop(BookingServiceHandler {
            service: Arc::new(service),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}

/// ## Summary
/// Wires the booking service to the configured storage backend.
///
/// ## Side Effects
/// With PostgreSQL: applies pending migrations, opens the pool and starts the
/// sync relay when a webhook is configured.
///
/// ## Errors
/// Returns an error for an invalid venue, a failed migration or an
/// unreachable database.
async fn build_service(config: &Settings) -> anyhow::Result<BookingService> {
    let venue = config.venue.venue()?;
    tracing::info!(
        rooms = venue.rooms().len(),
        backend = ?config.storage.backend,
        "Building booking service"
    );

    match config.storage.backend {
        StorageBackend::Postgres => {
            run_pending(&config.database.url).await?;
            let pool = create_pool(
                &config.database.url,
                u32::from(config.database.max_connections),
            )
            .await?;
            tracing::info!("Database connection pool created.");

            match RelaySettings::from_config(&config.sync) {
                Some(settings) => {
                    // Detached; the relay runs for the life of the process.
                    let _relay = SyncRelay::new(pool.clone(), settings)?.spawn();
                }
                None => tracing::info!("Calendar sync relay disabled; events stay in the outbox"),
            }

            let store = Arc::new(PgStore::new(pool.clone()));
            Ok(BookingService::new(
                venue,
                store.clone(),
                store.clone(),
                store,
                Arc::new(OutboxPublisher::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; bookings are lost on restart");
            Ok(BookingService::new(
                venue,
                Arc::new(MemoryBookingStore::new()),
                Arc::new(MemoryInquiryStore::new()),
                Arc::new(MemoryDirectory::new()),
                Arc::new(NoopPublisher),
            ))
        }
    }
}
