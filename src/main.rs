//! Timer Deck - A state-managed HTTP server running countdown timers
//!
//! This is the main entry point for the timer-deck application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use timer_deck::{
    api::create_router,
    config::Config,
    state::{AppState, TimerStore},
    tasks::{autosave_task, restore_timers, save_timers, CountdownScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_deck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-deck server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, storage={}",
          config.host, config.port, config.storage_label());

    // Restore persisted timers before anything else can dispatch
    let blobs = config.blob_store();
    let store = Arc::new(TimerStore::new());
    restore_timers(&store, blobs.as_ref());

    // Start the countdown scheduler and the autosave task
    let scheduler = tokio::spawn(CountdownScheduler::new(Arc::clone(&store)).run());
    let autosave = tokio::spawn(autosave_task(Arc::clone(&store), Arc::clone(&blobs)));

    // Create HTTP router with all endpoints
    let state = Arc::new(AppState::new(
        Arc::clone(&store),
        config.port,
        config.host.clone(),
        config.storage_label(),
    ));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                - List timers");
    info!("  POST   /timers                - Add a timer");
    info!("  GET    /timers/:id            - Show a timer");
    info!("  PATCH  /timers/:id            - Edit a timer");
    info!("  DELETE /timers/:id            - Delete a timer");
    info!("  POST   /timers/:id/start      - Start a timer");
    info!("  POST   /timers/:id/pause      - Pause a timer");
    info!("  POST   /timers/:id/reset      - Reset a timer");
    info!("  PUT    /timers/:id/remaining  - Set remaining time");
    info!("  POST   /actions               - Dispatch a raw action");
    info!("  GET    /status                - Server status");
    info!("  GET    /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stop ticking before the final save so nothing changes after it
    scheduler.abort();
    autosave.abort();
    let _ = scheduler.await;
    let _ = autosave.await;

    match save_timers(blobs.as_ref(), &store.snapshot()) {
        Ok(()) => info!("Saved {} timers", store.snapshot().len()),
        Err(e) => error!("Failed to save timers on shutdown: {:#}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
