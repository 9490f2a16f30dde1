// OpenWeatherMap client
use crate::application::weather_provider::WeatherProvider;
use crate::domain::weather::WeatherObservation;
use crate::infrastructure::config::{render_url_template, WeatherSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    icon: String,
}

impl OpenWeatherClient {
    pub fn new(settings: &WeatherSettings) -> Self {
        let mut vars = HashMap::new();
        vars.insert("city".to_string(), settings.city.clone());
        vars.insert("api_key".to_string(), settings.api_key.clone());

        Self {
            http: reqwest::Client::new(),
            url: render_url_template(&settings.url_template, &vars),
        }
    }
}

fn observation_from_response(response: CurrentWeatherResponse) -> Result<WeatherObservation> {
    let condition = response
        .weather
        .into_iter()
        .next()
        .context("Weather response has no conditions")?;

    Ok(WeatherObservation {
        temp_c: response.main.temp,
        icon_code: condition.icon,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self) -> Result<WeatherObservation> {
        let response = self
            .http
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to send weather request")?;

        // The body can echo the request URL, which carries the API key
        if !response.status().is_success() {
            anyhow::bail!("Weather fetch failed with status {}", response.status());
        }

        let data = response
            .json::<CurrentWeatherResponse>()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse weather response")?;

        observation_from_response(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_weather() {
        let body = r#"{
            "weather": [{"id": 802, "main": "Clouds", "icon": "03d"}],
            "main": {"temp": 29.64, "humidity": 62},
            "name": "Hyderabad"
        }"#;
        let response: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        let observation = observation_from_response(response).unwrap();

        assert_eq!(observation.temp_c, 29.64);
        assert_eq!(observation.icon_code, "03d");
    }

    #[test]
    fn test_missing_conditions_is_an_error() {
        let body = r#"{"main": {"temp": 20.0}}"#;
        let response: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        assert!(observation_from_response(response).is_err());
    }

    #[test]
    fn test_url_built_from_settings() {
        let settings = WeatherSettings {
            api_key: "abc123".to_string(),
            city: "Hyderabad".to_string(),
            ..WeatherSettings::default()
        };
        let client = OpenWeatherClient::new(&settings);
        assert_eq!(
            client.url,
            "https://api.openweathermap.org/data/2.5/weather?q=Hyderabad&appid=abc123&units=metric"
        );
    }

    #[tokio::test]
    async fn test_send_error_does_not_expose_api_key() {
        let settings = WeatherSettings {
            api_key: "SECRETKEY123".to_string(),
            url_template: "http://127.0.0.1:1/weather?q=${city}&appid=${api_key}".to_string(),
            ..WeatherSettings::default()
        };
        let client = OpenWeatherClient::new(&settings);

        let err = client.current().await.unwrap_err();
        let logged = format!("{:#}", err);

        assert!(logged.starts_with("Failed to send weather request"));
        assert!(!logged.contains("SECRETKEY123"), "{}", logged);
    }
}
