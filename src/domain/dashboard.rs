// Dashboard domain model
use serde::Serialize;

use super::activity_log::LogEntry;
use super::mode::{ChipStyle, Mode};
use super::series::SeriesPoint;
use super::telemetry::{DoorStatus, PowerReadouts};
use super::weather::WeatherDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyPanel {
    pub kwh: String,
    pub bill: String,
    pub tariff_per_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModePanel {
    pub active: Option<Mode>,
    pub hint: Option<String>,
    pub chips: Vec<ChipStyle>,
}

/// Everything a client needs to draw the page from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub clock: String,
    pub connection: ConnectionStatus,
    pub broker: Option<String>,
    pub door: Option<DoorStatus>,
    pub rfid: Option<String>,
    pub temperature: Option<String>,
    pub readouts: PowerReadouts,
    pub energy: EnergyPanel,
    pub chart: Vec<SeriesPoint>,
    pub mode: ModePanel,
    pub password_message: Option<String>,
    pub weather: WeatherDisplay,
    pub log: Vec<LogEntry>,
}
