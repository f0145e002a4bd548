use anyhow::{anyhow, Result};
use floodwatch_core::map::MapConfig;
use floodwatch_entities::{
    geo::{Coordinate, Distance},
    shelter::{default_shelters, Shelter},
};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "floodwatch.toml";

const ENV_NAME_GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
const ENV_NAME_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
const ENV_NAME_DB_URL: &str = "FLOODWATCH_DB_URL";
const ENV_NAME_DB_AUTH: &str = "FLOODWATCH_DB_AUTH";

pub struct Config {
    pub map: MapConfig,
    pub shelters: Vec<Shelter>,
    pub store: Store,
    pub notifications: Notifications,
    pub prediction: Prediction,
    pub gateways: Gateways,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config.with_defaults()?)?;
        cfg.apply_env(|name| env::var(name).ok());
        Ok(cfg)
    }

    fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = var(ENV_NAME_GOOGLE_MAPS_API_KEY) {
            self.gateways.google_maps.api_key = Some(api_key);
        }
        if let Some(api_key) = var(ENV_NAME_OPENWEATHER_API_KEY) {
            self.gateways.openweathermap.api_key = Some(api_key);
        }
        if let Some(url) = var(ENV_NAME_DB_URL) {
            log::info!("Use realtime database at {url}");
            self.store = Store::RealtimeDb {
                url,
                auth: var(ENV_NAME_DB_AUTH),
            };
        } else if let Some(auth) = var(ENV_NAME_DB_AUTH) {
            if let Store::RealtimeDb { auth: current, .. } = &mut self.store {
                *current = Some(auth);
            }
        }
    }
}

pub enum Store {
    Memory,
    /// The whole user data tree in a single JSON file.
    JsonFile {
        dir: PathBuf,
    },
    RealtimeDb {
        url: String,
        auth: Option<String>,
    },
}

pub struct Notifications {
    pub gateway: NotificationGateway,
    pub delay: Duration,
    pub image: Option<String>,
}

pub enum NotificationGateway {
    Log,
    Expo { api_url: String, push_token: String },
    /// For local testing purposes
    JsonFile { dir: PathBuf },
}

pub struct Prediction {
    /// City of the weather report.
    pub city: String,
}

pub struct Gateways {
    pub flood_zones_api_base_url: String,
    pub prediction_url: String,
    pub openweathermap: WebApi,
    pub google_maps: WebApi,
}

pub struct WebApi {
    pub api_base_url: String,
    pub api_key: Option<String>,
}

impl From<raw::WebApi> for WebApi {
    fn from(from: raw::WebApi) -> Self {
        let raw::WebApi {
            api_base_url,
            api_key,
        } = from;
        Self {
            api_base_url,
            api_key,
        }
    }
}

fn missing(section: &str) -> anyhow::Error {
    anyhow!("Missing '{section}' configuration")
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            map,
            store,
            notifications,
            prediction,
            gateway,
            shelters,
        } = from;

        let raw::Map {
            refetch_threshold_km,
            zone_radius_km,
            min_shape_area,
            zone_limit,
        } = map.ok_or_else(|| missing("map"))?;
        if refetch_threshold_km < 0.0 || zone_radius_km <= 0.0 {
            return Err(anyhow!("Invalid map distances"));
        }
        let map = MapConfig {
            refetch_threshold: Distance::from_km(refetch_threshold_km),
            zone_radius: Distance::from_km(zone_radius_km),
            min_shape_area,
            zone_limit,
        };

        let gateway = gateway.ok_or_else(|| missing("gateway"))?;

        let store = match store.ok_or_else(|| missing("store"))?.backend {
            raw::StoreBackend::Memory => Store::Memory,
            raw::StoreBackend::JsonFile => {
                let raw::JsonFile { dir } = gateway
                    .json_file
                    .clone()
                    .ok_or_else(|| missing("gateway.json-file"))?;
                log::info!("Use JSON file store ({})", dir.display());
                Store::JsonFile { dir }
            }
            raw::StoreBackend::RealtimeDb => {
                let raw::RealtimeDb { url, auth } = gateway
                    .realtime_db
                    .clone()
                    .ok_or_else(|| missing("gateway.realtime-db"))?;
                Store::RealtimeDb { url, auth }
            }
        };

        let raw::Notifications {
            gateway: notification_gateway,
            delay,
            image,
        } = notifications.ok_or_else(|| missing("notifications"))?;
        let notification_gateway = match notification_gateway {
            raw::NotificationGateway::Log => NotificationGateway::Log,
            raw::NotificationGateway::Expo => {
                let raw::Expo {
                    api_url,
                    push_token,
                } = gateway.expo.clone().ok_or_else(|| missing("gateway.expo"))?;
                let push_token = push_token.ok_or_else(|| missing("gateway.expo.push-token"))?;
                log::info!("Use Expo push notifications");
                NotificationGateway::Expo {
                    api_url,
                    push_token,
                }
            }
            raw::NotificationGateway::JsonFile => {
                let raw::JsonFile { dir } = gateway
                    .notifications_to_json_file
                    .clone()
                    .ok_or_else(|| missing("gateway.notifications-to-json-file"))?;
                log::info!("Use JSON file notification gateway ({})", dir.display());
                NotificationGateway::JsonFile { dir }
            }
        };
        let notifications = Notifications {
            gateway: notification_gateway,
            delay,
            image,
        };

        let raw::Prediction { city } = prediction.ok_or_else(|| missing("prediction"))?;
        let prediction = Prediction { city };

        let raw::Gateway {
            flood_zones,
            prediction: prediction_service,
            openweathermap,
            google_maps,
            ..
        } = gateway;
        let gateways = Gateways {
            flood_zones_api_base_url: flood_zones
                .ok_or_else(|| missing("gateway.flood-zones"))?
                .api_base_url,
            prediction_url: prediction_service
                .ok_or_else(|| missing("gateway.prediction"))?
                .url,
            openweathermap: openweathermap
                .ok_or_else(|| missing("gateway.openweathermap"))?
                .into(),
            google_maps: google_maps
                .ok_or_else(|| missing("gateway.google-maps"))?
                .into(),
        };

        let shelters = match shelters {
            Some(shelters) => shelters
                .into_iter()
                .map(|s| {
                    let coordinate = Coordinate::try_new(s.latitude, s.longitude)
                        .ok_or_else(|| anyhow!("Invalid position of shelter '{}'", s.title))?;
                    Ok(Shelter {
                        title: s.title,
                        description: s.description,
                        phone: s.phone,
                        address: s.address,
                        coordinate,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => default_shelters(),
        };

        Ok(Self {
            map,
            shelters,
            store,
            notifications,
            prediction,
            gateways,
        })
    }
}
