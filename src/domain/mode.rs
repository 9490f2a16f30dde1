// House mode selection
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::GatewayError;

pub const IDLE_BACKGROUND: &str = "#eee";
pub const IDLE_TEXT: &str = "#222";
pub const ACTIVE_TEXT: &str = "#fff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Day,
    Away,
    Night,
    Panic,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Day, Mode::Away, Mode::Night, Mode::Panic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Day => "day",
            Mode::Away => "away",
            Mode::Night => "night",
            Mode::Panic => "panic",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            Mode::Day => "#222",
            Mode::Away => "#00bfff",
            Mode::Night => "#4b0082",
            Mode::Panic => "#ff1744",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| GatewayError::UnknownMode(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipStyle {
    pub mode: Mode,
    pub active: bool,
    pub background: &'static str,
    pub color: &'static str,
}

/// At most one mode is highlighted; every other chip uses the idle style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSelector {
    active: Option<Mode>,
}

impl ModeSelector {
    pub fn select(&mut self, mode: Mode) {
        self.active = Some(mode);
    }

    pub fn active(&self) -> Option<Mode> {
        self.active
    }

    pub fn hint(&self) -> Option<String> {
        self.active
            .map(|mode| format!("Current: {}", mode.as_str().to_uppercase()))
    }

    pub fn chips(&self) -> Vec<ChipStyle> {
        Mode::ALL
            .into_iter()
            .map(|mode| {
                if self.active == Some(mode) {
                    ChipStyle {
                        mode,
                        active: true,
                        background: mode.accent(),
                        color: ACTIVE_TEXT,
                    }
                } else {
                    ChipStyle {
                        mode,
                        active: false,
                        background: IDLE_BACKGROUND,
                        color: IDLE_TEXT,
                    }
                }
            })
            .collect()
    }
}
