// Weather source trait
use crate::domain::weather::WeatherObservation;
use async_trait::async_trait;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for the configured city
    async fn current(&self) -> anyhow::Result<WeatherObservation>;
}
