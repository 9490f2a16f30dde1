// Activity log domain model
use chrono::{DateTime, Local};
use serde::Serialize;

pub const CSV_HEADER: &str = "Time,Event,Detail";
pub const EXPORT_FILE_NAME: &str = "logs.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogCategory {
    System,
    Door,
    #[serde(rename = "RFID")]
    Rfid,
    Command,
    Room,
    Password,
    Mode,
    Schedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub time: String,
    pub category: LogCategory,
    pub event: String,
    pub detail: String,
}

impl LogEntry {
    pub fn new(
        at: DateTime<Local>,
        category: LogCategory,
        event: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            time: clock_label(at),
            category,
            event: event.into(),
            detail: detail.into(),
        }
    }

    // Fields go out unquoted, so a comma inside a detail shifts the columns.
    fn csv_row(&self) -> String {
        [self.time.as_str(), self.event.as_str(), self.detail.as_str()].join(",")
    }
}

/// Wall-clock label used for log rows and chart points.
pub fn clock_label(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Stored oldest-first, presented newest-first.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    pub fn export_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for entry in self.newest_first() {
            csv.push_str(&entry.csv_row());
            csv.push('\n');
        }
        csv
    }
}
