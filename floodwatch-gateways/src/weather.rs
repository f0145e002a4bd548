use crate::http;
use floodwatch_core::{
    entities::*,
    gateways::{weather::WeatherGateway, Result},
};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    pub api_base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    sys: Option<Sys>,
    main: Main,
    wind: Option<Wind>,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

impl From<WeatherResponse> for CurrentWeather {
    fn from(from: WeatherResponse) -> Self {
        let WeatherResponse {
            name,
            sys,
            main,
            wind,
            weather,
        } = from;
        let wind = wind.unwrap_or_default();
        Self {
            city: name,
            country: sys.and_then(|s| s.country),
            temperature_k: main.temp,
            feels_like_k: main.feels_like,
            temp_min_k: main.temp_min,
            temp_max_k: main.temp_max,
            humidity: main.humidity,
            pressure: main.pressure,
            wind_speed: wind.speed,
            wind_deg: wind.deg,
            description: weather.into_iter().next().map(|c| c.description),
        }
    }
}

impl WeatherGateway for OpenWeatherMap {
    fn current_weather(&self, city: &str) -> Result<CurrentWeather> {
        let base = self.api_base_url.trim_end_matches('/');
        let request = http::client()
            .get(format!("{base}/data/2.5/weather"))
            .query(&[("q", city), ("appid", self.api_key.as_str())]);
        let response: WeatherResponse = http::send_json(request)?;
        Ok(response.into())
    }
}
