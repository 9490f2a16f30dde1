// Presentation layer - HTTP routes
pub mod app_state;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_logs, export_logs, get_dashboard, health_check, list_controls, list_logs, press_button,
    save_schedule, select_mode, set_tariff, stream_events, toggle_room, unlock_door,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/events", get(stream_events))
        .route("/controls", get(list_controls))
        .route("/controls/:id", post(press_button))
        .route("/rooms/:id", post(toggle_room))
        .route("/door/unlock", post(unlock_door))
        .route("/mode", post(select_mode))
        .route("/schedule", post(save_schedule))
        .route("/tariff", put(set_tariff))
        .route("/logs", get(list_logs).delete(clear_logs))
        .route("/logs/export", get(export_logs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
