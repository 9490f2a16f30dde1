// MQTT transport over rumqttc
use crate::application::coordinator::CoordinatorHandle;
use crate::application::message_bus::{MessageBus, OutboundMessage};
use crate::application::session::SessionEvent;
use crate::application::topic_router::SUBSCRIPTIONS;
use crate::domain::error::GatewayError;
use crate::infrastructure::config::BrokerSettings;
use async_trait::async_trait;
use rand::Rng;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;

const REQUEST_CAPACITY: usize = 64;

// rumqttc reconnects on the next poll; this only keeps a dead broker from
// turning the loop into a busy spin.
const ERROR_PAUSE: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

#[async_trait]
impl MessageBus for MqttBus {
    async fn publish(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        self.client
            .try_publish(
                message.topic.clone(),
                QoS::AtMostOnce,
                false,
                message.payload.clone().into_bytes(),
            )
            .map_err(|e| GatewayError::Publish {
                topic: message.topic.clone(),
                reason: e.to_string(),
            })
    }
}

/// `<prefix>-<8 hex digits>`
pub fn client_id(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("{}-{:08x}", prefix, suffix)
}

pub fn connect(settings: &BrokerSettings) -> (MqttBus, EventLoop) {
    let id = client_id(&settings.client_id_prefix);
    tracing::info!("Connecting to {} as {}", settings.label(), id);

    let mut options = MqttOptions::new(id, settings.host.clone(), settings.port);
    options.set_keep_alive(Duration::from_secs(settings.keep_alive_secs));

    let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
    (MqttBus { client }, event_loop)
}

/// Drive the connection until the coordinator goes away.
pub async fn run_event_loop(
    mut event_loop: EventLoop,
    bus: MqttBus,
    coordinator: CoordinatorHandle,
    broker_label: String,
) {
    loop {
        let event = match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                for filter in SUBSCRIPTIONS {
                    if let Err(e) = bus.client.try_subscribe(filter, QoS::AtMostOnce) {
                        tracing::error!("Failed to subscribe to {}: {}", filter, e);
                    }
                }
                SessionEvent::Connected {
                    broker: broker_label.clone(),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => SessionEvent::Message {
                payload: String::from_utf8_lossy(&publish.payload).into_owned(),
                topic: publish.topic,
            },
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("MQTT connection error: {}", e);
                if coordinator
                    .notify(SessionEvent::ConnectionLost {
                        reason: e.to_string(),
                    })
                    .await
                    .is_err()
                {
                    break;
                }
                tokio::time::sleep(ERROR_PAUSE).await;
                continue;
            }
        };

        if coordinator.notify(event).await.is_err() {
            break;
        }
    }
    tracing::info!("MQTT event loop stopped");
}
