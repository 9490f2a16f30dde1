// Error types shared by the domain and application layers
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid {metric} reading: {raw:?}")]
    InvalidReading { metric: String, raw: String },

    #[error("power must be a finite, non-negative number of watts, got {0}")]
    InvalidPower(f64),

    #[error("tariff must be a finite, non-negative amount per kWh, got {0}")]
    InvalidTariff(f64),

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown power metric: {0}")]
    UnknownMetric(String),

    #[error("unknown control: {0}")]
    UnknownControl(String),

    #[error("failed to publish to {topic}: {reason}")]
    Publish { topic: String, reason: String },

    #[error("session coordinator is not running")]
    CoordinatorUnavailable,
}

pub type Result<T> = std::result::Result<T, GatewayError>;
