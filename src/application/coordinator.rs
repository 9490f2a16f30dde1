// Session coordinator - single task that owns the session
//
// Broker traffic, HTTP commands, weather results and clock ticks all arrive
// here as requests and are handled one at a time, in arrival order.
use crate::application::message_bus::MessageBus;
use crate::application::session::{Effect, Session, SessionEvent};
use crate::domain::activity_log::LogEntry;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::error::GatewayError;
use chrono::Local;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};

const REQUEST_BUFFER: usize = 256;
const EFFECT_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<T>;

enum Request {
    Dispatch {
        event: SessionEvent,
        reply: Option<Reply<Result<Vec<Effect>, GatewayError>>>,
    },
    Snapshot(Reply<DashboardSnapshot>),
    Logs(Reply<Vec<LogEntry>>),
    ExportCsv(Reply<String>),
}

#[derive(Clone)]
pub struct CoordinatorHandle {
    requests: mpsc::Sender<Request>,
    effects: broadcast::Sender<Effect>,
}

impl CoordinatorHandle {
    /// Dispatch an event and wait for the effects it produced.
    pub async fn dispatch(&self, event: SessionEvent) -> Result<Vec<Effect>, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Dispatch {
            event,
            reply: Some(tx),
        })
        .await?;
        rx.await.map_err(|_| GatewayError::CoordinatorUnavailable)?
    }

    /// Dispatch an event without waiting for it to be handled.
    pub async fn notify(&self, event: SessionEvent) -> Result<(), GatewayError> {
        self.send(Request::Dispatch { event, reply: None }).await
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Snapshot(tx)).await?;
        rx.await.map_err(|_| GatewayError::CoordinatorUnavailable)
    }

    pub async fn logs(&self) -> Result<Vec<LogEntry>, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Logs(tx)).await?;
        rx.await.map_err(|_| GatewayError::CoordinatorUnavailable)
    }

    pub async fn export_csv(&self) -> Result<String, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::ExportCsv(tx)).await?;
        rx.await.map_err(|_| GatewayError::CoordinatorUnavailable)
    }

    /// True once the coordinator task has stopped taking requests.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    /// A handle whose coordinator has already stopped.
    #[cfg(test)]
    pub fn stopped() -> Self {
        let (requests, _) = mpsc::channel(1);
        let (effects, _) = broadcast::channel(1);
        Self { requests, effects }
    }

    /// Live feed of every effect, for server-sent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Effect> {
        self.effects.subscribe()
    }

    async fn send(&self, request: Request) -> Result<(), GatewayError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| GatewayError::CoordinatorUnavailable)
    }
}

pub fn spawn_coordinator(session: Session, bus: Arc<dyn MessageBus>) -> CoordinatorHandle {
    let (requests, rx) = mpsc::channel(REQUEST_BUFFER);
    let (effects, _) = broadcast::channel(EFFECT_BUFFER);

    tokio::spawn(run(session, bus, rx, effects.clone()));

    CoordinatorHandle { requests, effects }
}

async fn run(
    mut session: Session,
    bus: Arc<dyn MessageBus>,
    mut requests: mpsc::Receiver<Request>,
    effects: broadcast::Sender<Effect>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            Request::Dispatch { event, reply } => {
                let result = session.handle(event, Local::now());
                if let Ok(produced) = &result {
                    for effect in produced {
                        if let Effect::Publish(message) = effect {
                            if let Err(e) = bus.publish(message).await {
                                tracing::error!("{}", e);
                            }
                        }
                        // no subscribers is fine
                        let _ = effects.send(effect.clone());
                    }
                }
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                } else if let Err(e) = result {
                    tracing::warn!("Unanswered event failed: {}", e);
                }
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(session.snapshot(Local::now()));
            }
            Request::Logs(reply) => {
                let _ = reply.send(session.log_entries());
            }
            Request::ExportCsv(reply) => {
                let _ = reply.send(session.export_log_csv());
            }
        }
    }
    tracing::info!("Session coordinator stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{UiAction, UnlockSecret};
    use crate::application::message_bus::testing::RecordingBus;
    use crate::application::message_bus::OutboundMessage;
    use crate::infrastructure::config::ControlsConfig;

    fn start() -> (CoordinatorHandle, Arc<RecordingBus>) {
        let session = Session::new(ControlsConfig::default(), UnlockSecret::new("1234"), 8.0).unwrap();
        let bus = Arc::new(RecordingBus::default());
        (spawn_coordinator(session, bus.clone()), bus)
    }

    #[tokio::test]
    async fn test_unlock_publishes_through_bus() {
        let (handle, bus) = start();

        handle
            .dispatch(SessionEvent::Action(UiAction::Unlock {
                password: "1234".to_string(),
            }))
            .await
            .unwrap();
        handle
            .dispatch(SessionEvent::Action(UiAction::Unlock {
                password: "4321".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(bus.sent(), vec![OutboundMessage::new("door/command", "UNLOCK")]);
        let logs = handle.logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].detail, "Failed Attempt");
    }

    #[tokio::test]
    async fn test_effects_are_broadcast() {
        let (handle, _bus) = start();
        let mut feed = handle.subscribe();

        handle
            .notify(SessionEvent::Message {
                topic: "home/rfid/status".to_string(),
                payload: "Card 9 granted".to_string(),
            })
            .await
            .unwrap();

        let first = feed.recv().await.unwrap();
        assert!(matches!(first, Effect::Render(_)));
        let second = feed.recv().await.unwrap();
        assert!(matches!(second, Effect::Log(entry) if entry.detail == "Card 9 granted"));
    }

    #[tokio::test]
    async fn test_errors_reach_the_caller() {
        let (handle, bus) = start();
        let result = handle
            .dispatch(SessionEvent::Action(UiAction::ToggleRoom {
                id: "attic".to_string(),
                on: true,
            }))
            .await;

        assert!(matches!(result, Err(GatewayError::UnknownControl(_))));
        assert!(bus.sent().is_empty());
        assert!(handle.snapshot().await.unwrap().log.is_empty());
    }

    #[tokio::test]
    async fn test_export_after_clear() {
        let (handle, _bus) = start();
        handle
            .notify(SessionEvent::Message {
                topic: "home/door/status".to_string(),
                payload: "Locked".to_string(),
            })
            .await
            .unwrap();
        handle.dispatch(SessionEvent::Action(UiAction::ClearLog)).await.unwrap();

        assert_eq!(handle.export_csv().await.unwrap(), "Time,Event,Detail\n");
    }
}
