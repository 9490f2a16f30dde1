// Domain layer - Session state and value types
pub mod activity_log;
pub mod dashboard;
pub mod energy;
pub mod error;
pub mod mode;
pub mod series;
pub mod telemetry;
pub mod weather;
