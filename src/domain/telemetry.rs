// Telemetry data domain models
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::GatewayError;

/// Metrics published under `home/power/<metric>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerMetric {
    Voltage,
    Current,
    Power,
}

impl PowerMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerMetric::Voltage => "voltage",
            PowerMetric::Current => "current",
            PowerMetric::Power => "power",
        }
    }
}

impl fmt::Display for PowerMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerMetric {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voltage" => Ok(PowerMetric::Voltage),
            "current" => Ok(PowerMetric::Current),
            "power" => Ok(PowerMetric::Power),
            other => Err(GatewayError::UnknownMetric(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub metric: PowerMetric,
    pub value: f64,
    pub timestamp: DateTime<Local>,
}

impl TelemetrySample {
    /// Parse a numeric payload. NaN and infinities are rejected along with
    /// anything that is not a number.
    pub fn parse(
        metric: PowerMetric,
        payload: &str,
        timestamp: DateTime<Local>,
    ) -> Result<Self, GatewayError> {
        let value = payload
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GatewayError::InvalidReading {
                metric: metric.to_string(),
                raw: payload.to_string(),
            })?;

        Ok(Self {
            metric,
            value,
            timestamp,
        })
    }
}

/// Last door status reported by the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorStatus {
    pub text: String,
    pub locked: bool,
}

impl DoorStatus {
    /// Only the exact text `Locked` counts as locked.
    pub fn from_payload(payload: &str) -> Self {
        Self {
            text: payload.to_string(),
            locked: payload == "Locked",
        }
    }
}

/// Raw readouts shown next to the chart, kept verbatim from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PowerReadouts {
    pub voltage: Option<String>,
    pub current: Option<String>,
    pub power: Option<String>,
}

impl PowerReadouts {
    pub fn set(&mut self, metric: PowerMetric, text: &str) {
        let slot = match metric {
            PowerMetric::Voltage => &mut self.voltage,
            PowerMetric::Current => &mut self.current,
            PowerMetric::Power => &mut self.power,
        };
        *slot = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_payload() {
        let sample = TelemetrySample::parse(PowerMetric::Power, " 230.5 ", Local::now()).unwrap();
        assert_eq!(sample.value, 230.5);
        assert_eq!(sample.metric, PowerMetric::Power);
    }

    #[test]
    fn test_parse_rejects_garbage_and_non_finite() {
        for raw in ["abc", "", "NaN", "inf", "12W"] {
            assert!(
                TelemetrySample::parse(PowerMetric::Power, raw, Local::now()).is_err(),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("current".parse::<PowerMetric>().unwrap(), PowerMetric::Current);
        assert!("frequency".parse::<PowerMetric>().is_err());
    }

    #[test]
    fn test_door_status() {
        let door = DoorStatus::from_payload("Locked");
        assert!(door.locked);

        let door = DoorStatus::from_payload("Open (manual)");
        assert!(!door.locked);
        assert_eq!(door.text, "Open (manual)");

        assert!(!DoorStatus::from_payload("locked").locked);
    }
}
