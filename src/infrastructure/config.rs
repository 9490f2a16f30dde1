use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GatewayConfig {
    pub http: HttpSettings,
    pub broker: BrokerSettings,
    pub energy: EnergySettings,
    pub door: DoorSettings,
    pub weather: WeatherSettings,
    pub controls: ControlsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpSettings {
    pub bind: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub client_id_prefix: String,
    pub keep_alive_secs: u64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            host: "broker.hivemq.com".to_string(),
            port: 1883,
            client_id_prefix: "loki-home".to_string(),
            keep_alive_secs: 30,
        }
    }
}

impl BrokerSettings {
    pub fn label(&self) -> String {
        format!("mqtt://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnergySettings {
    pub tariff_per_kwh: f64,
}

impl Default for EnergySettings {
    fn default() -> Self {
        Self { tariff_per_kwh: 8.0 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DoorSettings {
    pub unlock_secret: String,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            unlock_secret: "1234".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherSettings {
    pub api_key: String,
    pub city: String,
    pub url_template: String,
    pub interval_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            city: "Hyderabad".to_string(),
            url_template: "https://api.openweathermap.org/data/2.5/weather?q=${city}&appid=${api_key}&units=metric"
                .to_string(),
            interval_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ControlsConfig {
    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl ControlsConfig {
    pub fn button(&self, id: &str) -> Option<&ButtonConfig> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&RoomConfig> {
        self.rooms.iter().find(|r| r.id == id)
    }
}

/// A command button: pressing it publishes `value` to `topic` as configured.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ButtonConfig {
    pub id: String,
    pub label: String,
    pub topic: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RoomConfig {
    pub id: String,
    pub label: String,
    pub topic: String,
}

/// Load `config/gateway.*` (optional) overlaid with `GATEWAY__SECTION__KEY`
/// environment variables.
pub fn load_gateway_config() -> anyhow::Result<GatewayConfig> {
    build_gateway_config(gateway_env())
}

// Values stay strings until deserialization so PINs like "0042" keep their
// leading zeros; numeric fields are still parsed from the string.
fn gateway_env() -> config::Environment {
    config::Environment::with_prefix("GATEWAY").separator("__")
}

fn build_gateway_config(env: config::Environment) -> anyhow::Result<GatewayConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/gateway").required(false))
        .add_source(env)
        .build()?;

    let config: GatewayConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl GatewayConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let tariff = self.energy.tariff_per_kwh;
        ensure!(
            tariff.is_finite() && tariff >= 0.0,
            "energy.tariff_per_kwh must be a non-negative number, got {}",
            tariff
        );
        ensure!(self.weather.interval_secs > 0, "weather.interval_secs must be positive");
        ensure!(self.broker.keep_alive_secs > 0, "broker.keep_alive_secs must be positive");

        let mut seen = HashSet::new();
        for id in self.controls.buttons.iter().map(|b| &b.id) {
            if !seen.insert(id) {
                bail!("duplicate button id: {}", id);
            }
        }
        let mut seen = HashSet::new();
        for id in self.controls.rooms.iter().map(|r| &r.id) {
            if !seen.insert(id) {
                bail!("duplicate room id: {}", id);
            }
        }
        Ok(())
    }
}

/// Replace `${name}` placeholders, URL-encoding each value
pub fn render_url_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_url_template() {
        let mut vars = HashMap::new();
        vars.insert("city".to_string(), "New Delhi".to_string());
        vars.insert("api_key".to_string(), "k&y".to_string());

        let result = render_url_template(&WeatherSettings::default().url_template, &vars);

        assert_eq!(
            result,
            "https://api.openweathermap.org/data/2.5/weather?q=New%20Delhi&appid=k%26y&units=metric"
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        config.validate().unwrap();
        assert_eq!(config.broker.label(), "mqtt://broker.hivemq.com:1883");
        assert_eq!(config.energy.tariff_per_kwh, 8.0);
    }

    #[test]
    fn test_rejects_negative_tariff() {
        let mut config = GatewayConfig::default();
        config.energy.tariff_per_kwh = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_control_ids() {
        let mut config = GatewayConfig::default();
        let room = RoomConfig {
            id: "kitchen".to_string(),
            label: "Kitchen".to_string(),
            topic: "home/room/kitchen".to_string(),
        };
        config.controls.rooms = vec![room.clone(), room];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [energy]
                tariff_per_kwh = 6.5

                [[controls.buttons]]
                id = "lock"
                label = "Lock door"
                topic = "door/command"
                value = "LOCK"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: GatewayConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.energy.tariff_per_kwh, 6.5);
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.controls.button("lock").unwrap().value, "LOCK");
        assert!(config.controls.room("lock").is_none());
    }

    #[test]
    fn test_env_overrides_keep_string_values() {
        let vars: config::Map<String, String> = [
            ("GATEWAY__DOOR__UNLOCK_SECRET", "0042"),
            ("GATEWAY__WEATHER__API_KEY", "000123"),
            ("GATEWAY__BROKER__PORT", "1884"),
            ("GATEWAY__ENERGY__TARIFF_PER_KWH", "6.5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = build_gateway_config(gateway_env().source(Some(vars))).unwrap();

        assert_eq!(config.door.unlock_secret, "0042");
        assert_eq!(config.weather.api_key, "000123");
        assert_eq!(config.broker.port, 1884);
        assert_eq!(config.energy.tariff_per_kwh, 6.5);
    }
}
