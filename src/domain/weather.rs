// Weather widget model
use serde::Serialize;

pub const FALLBACK_GLYPH: &str = "☀️";
pub const FALLBACK_VALUE: &str = "—";

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temp_c: f64,
    pub icon_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherDisplay {
    Pending,
    Current { temp_c: i64, icon_url: String },
    Fallback { glyph: String, value: String },
}

impl WeatherDisplay {
    pub fn fallback() -> Self {
        WeatherDisplay::Fallback {
            glyph: FALLBACK_GLYPH.to_string(),
            value: FALLBACK_VALUE.to_string(),
        }
    }

    pub fn from_observation(observation: &WeatherObservation) -> Self {
        WeatherDisplay::Current {
            // halves round up, -2.5 becomes -2
            temp_c: (observation.temp_c + 0.5).floor() as i64,
            icon_url: icon_url(&observation.icon_code),
        }
    }
}

pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{}.png", icon_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_observation() {
        let display = WeatherDisplay::from_observation(&WeatherObservation {
            temp_c: 31.5,
            icon_code: "02d".to_string(),
        });
        assert_eq!(
            display,
            WeatherDisplay::Current {
                temp_c: 32,
                icon_url: "https://openweathermap.org/img/wn/02d.png".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_half_rounds_up() {
        let display = WeatherDisplay::from_observation(&WeatherObservation {
            temp_c: -2.5,
            icon_code: "13n".to_string(),
        });
        assert!(matches!(display, WeatherDisplay::Current { temp_c: -2, .. }));
    }

    #[test]
    fn test_fallback_serializes_with_status() {
        let json = serde_json::to_value(WeatherDisplay::fallback()).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["glyph"], FALLBACK_GLYPH);
        assert_eq!(json["value"], FALLBACK_VALUE);
    }
}
