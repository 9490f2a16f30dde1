// HTTP request handlers
use crate::application::commands::{SchedulePayload, UiAction};
use crate::application::session::{Effect, SessionEvent};
use crate::domain::activity_log::{LogEntry, EXPORT_FILE_NAME};
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::error::GatewayError;
use crate::domain::mode::Mode;
use crate::infrastructure::config::ControlsConfig;
use crate::infrastructure::http_response::csv_attachment_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

type Effects = Result<Json<Vec<Effect>>, GatewayError>;

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub on: bool,
}

#[derive(Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

#[derive(Deserialize)]
pub struct TariffRequest {
    pub tariff: f64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSnapshot>, GatewayError> {
    Ok(Json(state.coordinator.snapshot().await?))
}

pub async fn list_controls(State(state): State<Arc<AppState>>) -> Json<ControlsConfig> {
    Json(state.controls.clone())
}

async fn act(state: &AppState, action: UiAction) -> Effects {
    let effects = state.coordinator.dispatch(SessionEvent::Action(action)).await?;
    Ok(Json(effects))
}

pub async fn press_button(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Effects {
    act(&state, UiAction::PressButton { id }).await
}

pub async fn toggle_room(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Effects {
    act(&state, UiAction::ToggleRoom { id, on: request.on }).await
}

pub async fn unlock_door(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UnlockRequest>,
) -> Effects {
    act(
        &state,
        UiAction::Unlock {
            password: request.password,
        },
    )
    .await
}

pub async fn select_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Effects {
    let mode: Mode = request.mode.parse()?;
    act(&state, UiAction::SelectMode(mode)).await
}

pub async fn save_schedule(
    State(state): State<Arc<AppState>>,
    Json(schedule): Json<SchedulePayload>,
) -> Effects {
    act(&state, UiAction::SaveSchedule(schedule)).await
}

pub async fn set_tariff(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TariffRequest>,
) -> Effects {
    act(&state, UiAction::SetTariff(request.tariff)).await
}

pub async fn list_logs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LogEntry>>, GatewayError> {
    Ok(Json(state.coordinator.logs().await?))
}

pub async fn clear_logs(State(state): State<Arc<AppState>>) -> Effects {
    act(&state, UiAction::ClearLog).await
}

pub async fn export_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let csv = match state.coordinator.export_csv().await {
        Ok(csv) => csv,
        Err(e) => return e.into_response(),
    };

    match csv_attachment_response(csv, EXPORT_FILE_NAME) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Server-sent events: one event per effect, named after its kind
pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let mut rx = state.coordinator.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(effect) => {
                    let name = match &effect {
                        Effect::Publish(_) => "publish",
                        Effect::Log(_) => "log",
                        Effect::Render(_) => "render",
                    };
                    match SseEvent::default().event(name).json_data(&effect) {
                        Ok(event) => yield Ok(event),
                        Err(e) => tracing::warn!("Failed to encode effect: {}", e),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event stream lagged, skipped {} effects", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
