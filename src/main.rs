// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::commands::UnlockSecret;
use crate::application::coordinator::spawn_coordinator;
use crate::application::session::Session;
use crate::application::timers::{spawn_clock, spawn_weather_poller};
use crate::infrastructure::config::load_gateway_config;
use crate::infrastructure::mqtt_bus::{connect, run_event_loop};
use crate::infrastructure::weather_client::OpenWeatherClient;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_gateway_config()?;
    if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured, the weather widget will show the fallback");
    }

    // Broker transport (infrastructure layer)
    let (bus, event_loop) = connect(&config.broker);

    // Session coordinator (application layer)
    let session = Session::new(
        config.controls.clone(),
        UnlockSecret::new(&config.door.unlock_secret),
        config.energy.tariff_per_kwh,
    )?;
    let coordinator = spawn_coordinator(session, Arc::new(bus.clone()));

    tokio::spawn(run_event_loop(
        event_loop,
        bus,
        coordinator.clone(),
        config.broker.label(),
    ));
    spawn_weather_poller(
        Arc::new(OpenWeatherClient::new(&config.weather)),
        coordinator.clone(),
        Duration::from_secs(config.weather.interval_secs),
    );
    spawn_clock(coordinator.clone());

    // Build router (presentation layer)
    let state = Arc::new(AppState {
        coordinator,
        controls: config.controls.clone(),
    });
    let router = presentation::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.http.bind).await?;
    tracing::info!("Starting home-telemetry-gateway on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
