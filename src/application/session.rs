// Session state and event handlers
//
// Every handler takes the current session plus one event and returns the
// effects it produced. Nothing here touches the network or the browser: the
// coordinator executes `Publish` effects and fans the rest out to clients.
use crate::application::commands::{
    mode_message, toggle_payload, unlock_message, PasswordOutcome, SchedulePayload, UiAction,
    UnlockSecret,
};
use crate::application::message_bus::OutboundMessage;
use crate::application::topic_router::{route, Route};
use crate::domain::activity_log::{clock_label, ActivityLog, LogCategory, LogEntry};
use crate::domain::dashboard::{ConnectionStatus, DashboardSnapshot, EnergyPanel, ModePanel};
use crate::domain::energy::EnergyState;
use crate::domain::error::GatewayError;
use crate::domain::mode::{ChipStyle, Mode, ModeSelector};
use crate::domain::series::SeriesBuffer;
use crate::domain::telemetry::{DoorStatus, PowerMetric, PowerReadouts, TelemetrySample};
use crate::domain::weather::WeatherDisplay;
use crate::infrastructure::config::ControlsConfig;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Connected { broker: String },
    ConnectionLost { reason: String },
    Message { topic: String, payload: String },
    Action(UiAction),
    Weather(WeatherDisplay),
    ClockTick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Effect {
    Publish(OutboundMessage),
    Log(LogEntry),
    Render(RenderUpdate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum RenderUpdate {
    Connection {
        status: ConnectionStatus,
        broker: Option<String>,
    },
    Door {
        text: String,
        locked: bool,
    },
    Rfid {
        text: String,
    },
    Temperature {
        text: String,
    },
    Readout {
        metric: PowerMetric,
        text: String,
    },
    Energy {
        kwh: String,
        bill: String,
    },
    ChartPoint {
        label: String,
        value: f64,
    },
    Mode {
        hint: String,
        chips: Vec<ChipStyle>,
    },
    Password {
        outcome: PasswordOutcome,
        message: String,
    },
    Weather {
        weather: WeatherDisplay,
    },
    Clock {
        time: String,
    },
    LogCleared,
}

pub struct Session {
    connection: ConnectionStatus,
    broker: Option<String>,
    door: Option<DoorStatus>,
    rfid: Option<String>,
    temperature: Option<String>,
    readouts: PowerReadouts,
    energy: EnergyState,
    chart: SeriesBuffer,
    log: ActivityLog,
    mode: ModeSelector,
    password_message: Option<String>,
    weather: WeatherDisplay,
    controls: ControlsConfig,
    unlock_secret: UnlockSecret,
}

impl Session {
    pub fn new(
        controls: ControlsConfig,
        unlock_secret: UnlockSecret,
        tariff_per_kwh: f64,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            connection: ConnectionStatus::Connecting,
            broker: None,
            door: None,
            rfid: None,
            temperature: None,
            readouts: PowerReadouts::default(),
            energy: EnergyState::new(tariff_per_kwh)?,
            chart: SeriesBuffer::default(),
            log: ActivityLog::new(),
            mode: ModeSelector::default(),
            password_message: None,
            weather: WeatherDisplay::Pending,
            controls,
            unlock_secret,
        })
    }

    /// Apply one event. Log effects are committed to the activity log before
    /// returning; the caller is responsible for everything else.
    pub fn handle(
        &mut self,
        event: SessionEvent,
        now: DateTime<Local>,
    ) -> Result<Vec<Effect>, GatewayError> {
        let effects = match event {
            SessionEvent::Connected { broker } => self.on_connected(broker, now),
            SessionEvent::ConnectionLost { reason } => self.on_connection_lost(&reason),
            SessionEvent::Message { topic, payload } => self.on_message(&topic, &payload, now),
            SessionEvent::Action(action) => self.on_action(action, now)?,
            SessionEvent::Weather(weather) => {
                self.weather = weather.clone();
                vec![Effect::Render(RenderUpdate::Weather { weather })]
            }
            SessionEvent::ClockTick => vec![Effect::Render(RenderUpdate::Clock {
                time: clock_label(now),
            })],
        };

        for effect in &effects {
            if let Effect::Log(entry) = effect {
                self.log.append(entry.clone());
            }
        }
        Ok(effects)
    }

    fn on_connected(&mut self, broker: String, now: DateTime<Local>) -> Vec<Effect> {
        self.connection = ConnectionStatus::Connected;
        self.broker = Some(broker.clone());
        vec![
            Effect::Render(RenderUpdate::Connection {
                status: ConnectionStatus::Connected,
                broker: Some(broker),
            }),
            Effect::Log(LogEntry::new(now, LogCategory::System, "MQTT Connected", "")),
        ]
    }

    fn on_connection_lost(&mut self, reason: &str) -> Vec<Effect> {
        tracing::debug!("Connection indicator set to error: {}", reason);
        self.connection = ConnectionStatus::Error;
        vec![Effect::Render(RenderUpdate::Connection {
            status: ConnectionStatus::Error,
            broker: self.broker.clone(),
        })]
    }

    fn on_message(&mut self, topic: &str, payload: &str, now: DateTime<Local>) -> Vec<Effect> {
        let Some(matched) = route(topic) else {
            tracing::trace!("Ignoring message on unrouted topic {}", topic);
            return Vec::new();
        };

        match matched {
            Route::DoorStatus => {
                let door = DoorStatus::from_payload(payload);
                self.door = Some(door.clone());
                vec![
                    Effect::Render(RenderUpdate::Door {
                        text: door.text,
                        locked: door.locked,
                    }),
                    Effect::Log(LogEntry::new(now, LogCategory::Door, "Status Update", payload)),
                ]
            }
            Route::RfidStatus => {
                self.rfid = Some(payload.to_string());
                vec![
                    Effect::Render(RenderUpdate::Rfid {
                        text: payload.to_string(),
                    }),
                    Effect::Log(LogEntry::new(now, LogCategory::Rfid, "Access", payload)),
                ]
            }
            Route::Temperature => {
                self.temperature = Some(payload.to_string());
                vec![Effect::Render(RenderUpdate::Temperature {
                    text: payload.to_string(),
                })]
            }
            Route::Power(metric) => self.on_power(metric, payload, now),
        }
    }

    fn on_power(&mut self, metric: PowerMetric, payload: &str, now: DateTime<Local>) -> Vec<Effect> {
        tracing::debug!("Power data received: {}={}", metric, payload);
        self.readouts.set(metric, payload);
        let mut effects = vec![Effect::Render(RenderUpdate::Readout {
            metric,
            text: payload.to_string(),
        })];

        if metric != PowerMetric::Power {
            return effects;
        }

        let accumulated = TelemetrySample::parse(metric, payload, now)
            .and_then(|sample| self.energy.accumulate(sample.value).map(|r| (sample, r)));

        match accumulated {
            Ok((sample, reading)) => {
                let label = clock_label(sample.timestamp);
                self.chart.push(label.clone(), sample.value);
                effects.push(Effect::Render(RenderUpdate::Energy {
                    kwh: reading.kwh_display(),
                    bill: reading.bill_display(),
                }));
                effects.push(Effect::Render(RenderUpdate::ChartPoint {
                    label,
                    value: sample.value,
                }));
            }
            Err(e) => {
                tracing::warn!("Dropping power sample: {}", e);
            }
        }
        effects
    }

    fn on_action(&mut self, action: UiAction, now: DateTime<Local>) -> Result<Vec<Effect>, GatewayError> {
        let effects = match action {
            UiAction::PressButton { id } => {
                let button = self
                    .controls
                    .button(&id)
                    .ok_or_else(|| GatewayError::UnknownControl(id.clone()))?;
                vec![
                    Effect::Publish(OutboundMessage::new(&button.topic, &button.value)),
                    Effect::Log(LogEntry::new(
                        now,
                        LogCategory::Command,
                        &button.topic,
                        &button.value,
                    )),
                ]
            }
            UiAction::ToggleRoom { id, on } => {
                let room = self
                    .controls
                    .room(&id)
                    .ok_or_else(|| GatewayError::UnknownControl(id.clone()))?;
                let state = toggle_payload(on);
                vec![
                    Effect::Publish(OutboundMessage::new(&room.topic, state)),
                    Effect::Log(LogEntry::new(now, LogCategory::Room, &room.topic, state)),
                ]
            }
            UiAction::Unlock { password } => self.on_unlock(&password, now),
            UiAction::SelectMode(mode) => self.on_mode(mode, now),
            UiAction::SaveSchedule(schedule) => on_schedule(&schedule, now),
            UiAction::SetTariff(tariff) => {
                let reading = self.energy.set_tariff(tariff)?;
                vec![Effect::Render(RenderUpdate::Energy {
                    kwh: reading.kwh_display(),
                    bill: reading.bill_display(),
                })]
            }
            UiAction::ClearLog => {
                self.log.clear();
                vec![Effect::Render(RenderUpdate::LogCleared)]
            }
        };
        Ok(effects)
    }

    fn on_unlock(&mut self, password: &str, now: DateTime<Local>) -> Vec<Effect> {
        let outcome = self.unlock_secret.check(password);
        self.password_message = Some(outcome.message().to_string());

        let render = Effect::Render(RenderUpdate::Password {
            outcome,
            message: outcome.message().to_string(),
        });

        match outcome {
            PasswordOutcome::Missing => vec![render],
            PasswordOutcome::Granted => vec![
                Effect::Publish(unlock_message()),
                render,
                Effect::Log(LogEntry::new(now, LogCategory::Password, "Access", "Correct Password")),
            ],
            PasswordOutcome::Denied => {
                tracing::warn!("Rejected door unlock attempt");
                vec![
                    render,
                    Effect::Log(LogEntry::new(now, LogCategory::Password, "Access", "Failed Attempt")),
                ]
            }
        }
    }

    fn on_mode(&mut self, mode: Mode, now: DateTime<Local>) -> Vec<Effect> {
        self.mode.select(mode);
        vec![
            Effect::Publish(mode_message(mode)),
            Effect::Render(RenderUpdate::Mode {
                hint: self.mode.hint().unwrap_or_default(),
                chips: self.mode.chips(),
            }),
            Effect::Log(LogEntry::new(now, LogCategory::Mode, "Changed", mode.as_str())),
        ]
    }

    pub fn snapshot(&self, now: DateTime<Local>) -> DashboardSnapshot {
        let reading = self.energy.reading();
        DashboardSnapshot {
            clock: clock_label(now),
            connection: self.connection,
            broker: self.broker.clone(),
            door: self.door.clone(),
            rfid: self.rfid.clone(),
            temperature: self.temperature.clone(),
            readouts: self.readouts.clone(),
            energy: EnergyPanel {
                kwh: reading.kwh_display(),
                bill: reading.bill_display(),
                tariff_per_kwh: self.energy.tariff_per_kwh(),
            },
            chart: self.chart.to_vec(),
            mode: ModePanel {
                active: self.mode.active(),
                hint: self.mode.hint(),
                chips: self.mode.chips(),
            },
            password_message: self.password_message.clone(),
            weather: self.weather.clone(),
            log: self.log_entries(),
        }
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.newest_first().cloned().collect()
    }

    pub fn export_log_csv(&self) -> String {
        self.log.export_csv()
    }
}

fn on_schedule(schedule: &SchedulePayload, now: DateTime<Local>) -> Vec<Effect> {
    vec![
        Effect::Publish(schedule.to_message()),
        Effect::Log(LogEntry::new(now, LogCategory::Schedule, "Saved", schedule.summary())),
    ]
}
