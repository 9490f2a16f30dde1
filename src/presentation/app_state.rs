// Application state for HTTP handlers
use crate::application::coordinator::CoordinatorHandle;
use crate::infrastructure::config::ControlsConfig;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: CoordinatorHandle,
    pub controls: ControlsConfig,
}
