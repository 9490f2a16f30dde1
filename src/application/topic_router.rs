// Inbound topic dispatch table
use crate::domain::telemetry::PowerMetric;

pub const DOOR_STATUS_TOPIC: &str = "home/door/status";
pub const RFID_STATUS_TOPIC: &str = "home/rfid/status";
pub const TEMPERATURE_TOPIC: &str = "home/temp";
pub const POWER_TOPIC_PREFIX: &str = "home/power/";

/// Filters subscribed on every (re)connect.
pub const SUBSCRIPTIONS: [&str; 4] = [
    DOOR_STATUS_TOPIC,
    RFID_STATUS_TOPIC,
    "home/power/+",
    TEMPERATURE_TOPIC,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DoorStatus,
    RfidStatus,
    Temperature,
    Power(PowerMetric),
}

const EXACT_ROUTES: &[(&str, Route)] = &[
    (DOOR_STATUS_TOPIC, Route::DoorStatus),
    (RFID_STATUS_TOPIC, Route::RfidStatus),
    (TEMPERATURE_TOPIC, Route::Temperature),
];

/// Exact matches first, then `home/power/<metric>`. Anything else has no route.
pub fn route(topic: &str) -> Option<Route> {
    if let Some((_, route)) = EXACT_ROUTES.iter().find(|(t, _)| *t == topic) {
        return Some(*route);
    }

    topic
        .strip_prefix(POWER_TOPIC_PREFIX)
        .and_then(|metric| metric.parse::<PowerMetric>().ok())
        .map(Route::Power)
}
