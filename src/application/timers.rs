// Periodic jobs: weather refresh and the dashboard clock
use crate::application::coordinator::CoordinatorHandle;
use crate::application::session::SessionEvent;
use crate::application::weather_provider::WeatherProvider;
use crate::domain::weather::WeatherDisplay;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Fetch weather now and then once per period. Every tick spawns its own
/// fetch: a slow request is neither cancelled nor waited for, so two can be
/// in flight at once.
pub fn spawn_weather_poller(
    provider: Arc<dyn WeatherProvider>,
    coordinator: CoordinatorHandle,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if coordinator.is_closed() {
                tracing::info!("Coordinator stopped, weather poller exiting");
                break;
            }

            let provider = provider.clone();
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                let display = fetch_display(provider.as_ref()).await;
                if let Err(e) = coordinator.notify(SessionEvent::Weather(display)).await {
                    tracing::debug!("Dropping weather result: {}", e);
                }
            });
        }
    })
}

async fn fetch_display(provider: &dyn WeatherProvider) -> WeatherDisplay {
    match provider.current().await {
        Ok(observation) => WeatherDisplay::from_observation(&observation),
        Err(e) => {
            tracing::error!("Weather error: {:#}", e);
            WeatherDisplay::fallback()
        }
    }
}

pub fn spawn_clock(coordinator: CoordinatorHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(CLOCK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if coordinator.notify(SessionEvent::ClockTick).await.is_err() {
                break;
            }
        }
    })
}
