// UI actions and the messages they publish
use crate::application::message_bus::OutboundMessage;
use crate::domain::mode::Mode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const DOOR_COMMAND_TOPIC: &str = "door/command";
pub const UNLOCK_PAYLOAD: &str = "UNLOCK";
pub const MODE_TOPIC: &str = "home/mode";
pub const SCHEDULE_TOPIC: &str = "home/schedule";

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    PressButton { id: String },
    ToggleRoom { id: String, on: bool },
    Unlock { password: String },
    SelectMode(Mode),
    SaveSchedule(SchedulePayload),
    SetTariff(f64),
    ClearLog,
}

/// Published as-is: neither field is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub time: String,
    pub temp: String,
}

impl SchedulePayload {
    pub fn to_message(&self) -> OutboundMessage {
        let payload = serde_json::json!({ "time": self.time, "temp": self.temp });
        OutboundMessage::new(SCHEDULE_TOPIC, payload.to_string())
    }

    pub fn summary(&self) -> String {
        format!("Time: {}, Temp: {}", self.time, self.temp)
    }
}

pub fn toggle_payload(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

pub fn unlock_message() -> OutboundMessage {
    OutboundMessage::new(DOOR_COMMAND_TOPIC, UNLOCK_PAYLOAD)
}

pub fn mode_message(mode: Mode) -> OutboundMessage {
    OutboundMessage::new(MODE_TOPIC, mode.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordOutcome {
    Missing,
    Granted,
    Denied,
}

impl PasswordOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordOutcome::Missing => "❌ Password required",
            PasswordOutcome::Granted => "✅ Access Granted",
            PasswordOutcome::Denied => "❌ Wrong Password",
        }
    }
}

/// The door secret, kept only as a SHA-256 digest. Surrounding whitespace is
/// trimmed on both sides of the comparison.
#[derive(Clone)]
pub struct UnlockSecret {
    digest: [u8; 32],
}

impl UnlockSecret {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.trim().as_bytes()).into(),
        }
    }

    /// Input is trimmed before checking; blank input never reaches the digest.
    pub fn check(&self, input: &str) -> PasswordOutcome {
        let candidate = input.trim();
        if candidate.is_empty() {
            return PasswordOutcome::Missing;
        }

        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        let diff = candidate
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff == 0 {
            PasswordOutcome::Granted
        } else {
            PasswordOutcome::Denied
        }
    }
}

impl std::fmt::Debug for UnlockSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UnlockSecret(..)")
    }
}
