// Outbound broker traffic
use crate::domain::error::GatewayError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: String,
}

impl OutboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Hand a message to the transport. Must not wait on the network.
    async fn publish(&self, message: &OutboundMessage) -> Result<(), GatewayError>;
}
