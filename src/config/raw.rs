use duration_str::deserialize_duration;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("floodwatch.default.toml");

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub map: Option<Map>,
    pub store: Option<Store>,
    pub notifications: Option<Notifications>,
    pub prediction: Option<Prediction>,
    pub gateway: Option<Gateway>,
    pub shelters: Option<Vec<Shelter>>,
}

impl Config {
    pub fn load_default() -> Result<Self, toml::de::Error> {
        toml::from_str(DEFAULT_CONFIG_FILE)
    }

    /// Fill missing sections with the defaults.
    pub fn with_defaults(self) -> Result<Self, toml::de::Error> {
        let default = Self::load_default()?;
        let gateway = match (self.gateway, default.gateway) {
            (Some(gateway), Some(default)) => Some(gateway.with_defaults(default)),
            (gateway, default) => gateway.or(default),
        };
        Ok(Self {
            map: self.map.or(default.map),
            store: self.store.or(default.store),
            notifications: self.notifications.or(default.notifications),
            prediction: self.prediction.or(default.prediction),
            gateway,
            shelters: self.shelters.or(default.shelters),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub refetch_threshold_km: f64,
    pub zone_radius_km: f64,
    pub min_shape_area: f64,
    pub zone_limit: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Store {
    pub backend: StoreBackend,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    Memory,
    JsonFile,
    RealtimeDb,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Notifications {
    pub gateway: NotificationGateway,
    #[serde(deserialize_with = "deserialize_duration")]
    pub delay: Duration,
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationGateway {
    Log,
    Expo,
    JsonFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Prediction {
    pub city: String,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub flood_zones: Option<FloodZones>,
    pub prediction: Option<PredictionService>,
    pub openweathermap: Option<WebApi>,
    pub google_maps: Option<WebApi>,
    pub realtime_db: Option<RealtimeDb>,
    pub json_file: Option<JsonFile>,
    pub notifications_to_json_file: Option<JsonFile>,
    pub expo: Option<Expo>,
}

impl Gateway {
    fn with_defaults(self, default: Self) -> Self {
        Self {
            flood_zones: self.flood_zones.or(default.flood_zones),
            prediction: self.prediction.or(default.prediction),
            openweathermap: self.openweathermap.or(default.openweathermap),
            google_maps: self.google_maps.or(default.google_maps),
            realtime_db: self.realtime_db.or(default.realtime_db),
            json_file: self.json_file.or(default.json_file),
            notifications_to_json_file: self
                .notifications_to_json_file
                .or(default.notifications_to_json_file),
            expo: self.expo.or(default.expo),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FloodZones {
    pub api_base_url: String,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PredictionService {
    pub url: String,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WebApi {
    pub api_base_url: String,
    pub api_key: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RealtimeDb {
    pub url: String,
    pub auth: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JsonFile {
    pub dir: PathBuf,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Expo {
    pub api_url: String,
    pub push_token: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Shelter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_default_config_from_file() {
        let cfg = Config::load_default().unwrap();
        assert!(cfg.map.is_some());
        assert!(cfg.store.is_some());
        assert!(cfg.shelters.is_none());
        let notifications = cfg.notifications.unwrap();
        assert_eq!(notifications.delay, Duration::from_secs(2));
    }

    #[test]
    fn missing_sections_are_taken_from_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [gateway.google-maps]
            api-base-url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        let cfg = cfg.with_defaults().unwrap();
        assert!(cfg.map.is_some());
        let gateway = cfg.gateway.unwrap();
        assert_eq!(
            gateway.google_maps.unwrap().api_base_url,
            "http://localhost:8080"
        );
        assert!(gateway.flood_zones.is_some());
    }

    #[test]
    fn parse_full_config_example_from_file() {
        let cfg_string = fs::read_to_string("src/config/floodwatch.full-example.toml").unwrap();
        let cfg: Config = toml::from_str(&cfg_string).unwrap();
        assert_eq!(cfg.shelters.unwrap().len(), 1);
    }
}
