// Application layer - Session handling and use cases
pub mod commands;
pub mod coordinator;
pub mod message_bus;
pub mod session;
pub mod timers;
pub mod topic_router;
pub mod weather_provider;
