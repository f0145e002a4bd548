//! Wiring of the configured gateways and stores.

use crate::config::{self, Config, NotificationGateway};
use anyhow::{anyhow, Result};
use floodwatch_application::prelude::{FloodAlerts, MapGateways};
use floodwatch_core::{
    entities::*, gateways::notify::LocalNotificationGateway, session::Session,
};
use floodwatch_gateways::{
    flood_zones::OpenDataFloodZones,
    google::GoogleMaps,
    notify::{ExpoPush, LogNotifier, SendToJsonFile},
    prediction::PredictionService,
    realtime_db::RealtimeDatabase,
    user_communication::AlertFormatter,
    weather::OpenWeatherMap,
};
use floodwatch_store::{JsonBackend, MemoryBackend, UserDataStore};
use std::sync::Arc;

pub type Store = UserDataStore<Arc<dyn JsonBackend + Send + Sync>>;

pub enum Notifier {
    Log(LogNotifier),
    Expo(ExpoPush),
    JsonFile(SendToJsonFile),
}

impl LocalNotificationGateway for Notifier {
    fn schedule(&self, notification: &LocalNotification) {
        match self {
            Self::Log(gw) => gw.schedule(notification),
            Self::Expo(gw) => gw.schedule(notification),
            Self::JsonFile(gw) => gw.schedule(notification),
        }
    }

    fn flush(&self) {
        match self {
            Self::Log(gw) => gw.flush(),
            Self::Expo(gw) => gw.flush(),
            Self::JsonFile(gw) => gw.flush(),
        }
    }
}

pub struct App {
    pub cfg: Config,
    pub store: Store,
    pub notifier: Arc<Notifier>,
    pub formatter: Arc<AlertFormatter>,
    pub flood_zones: Arc<OpenDataFloodZones>,
    pub prediction: Arc<PredictionService>,
    pub google_maps: Arc<GoogleMaps>,
}

impl App {
    pub fn try_new(cfg: Config) -> Result<Self> {
        let store = UserDataStore::new(json_backend(&cfg.store)?);
        let notifier = Arc::new(notifier(&cfg.notifications.gateway)?);
        let formatter = Arc::new(AlertFormatter {
            delay: cfg.notifications.delay,
            image: cfg.notifications.image.clone(),
        });
        let flood_zones = Arc::new(OpenDataFloodZones {
            api_base_url: cfg.gateways.flood_zones_api_base_url.clone(),
        });
        let prediction = Arc::new(PredictionService {
            url: cfg.gateways.prediction_url.clone(),
        });
        let google = &cfg.gateways.google_maps;
        if google.api_key.is_none() {
            log::warn!("No Google Maps API key configured: places and routes are unavailable");
        }
        let google_maps = Arc::new(GoogleMaps {
            api_base_url: google.api_base_url.clone(),
            api_key: google.api_key.clone().unwrap_or_default(),
        });
        Ok(Self {
            cfg,
            store,
            notifier,
            formatter,
            flood_zones,
            prediction,
            google_maps,
        })
    }

    pub fn weather(&self) -> Result<OpenWeatherMap> {
        let config::WebApi {
            api_base_url,
            api_key,
        } = &self.cfg.gateways.openweathermap;
        let api_key = api_key
            .clone()
            .ok_or_else(|| anyhow!("Missing OpenWeatherMap API key"))?;
        Ok(OpenWeatherMap {
            api_base_url: api_base_url.clone(),
            api_key,
        })
    }

    pub fn map_gateways(&self) -> MapGateways {
        MapGateways {
            flood_zones: self.flood_zones.clone(),
            directions: self.google_maps.clone(),
            places: self.google_maps.clone(),
        }
    }

    pub fn flood_alerts(&self, session: &Session) -> FloodAlerts {
        FloodAlerts {
            session: session.clone(),
            rain_data: simulated_rain_series(),
            prediction: self.prediction.clone(),
            records: Arc::new(self.store.clone()),
            notifier: self.notifier.clone(),
            formatter: self.formatter.clone(),
        }
    }
}

fn json_backend(cfg: &config::Store) -> Result<Arc<dyn JsonBackend + Send + Sync>> {
    let backend: Arc<dyn JsonBackend + Send + Sync> = match cfg {
        config::Store::Memory => {
            log::info!("User data is not persisted");
            Arc::new(MemoryBackend::new())
        }
        config::Store::JsonFile { dir } => Arc::new(MemoryBackend::with_json_file(dir)?),
        config::Store::RealtimeDb { url, auth } => {
            Arc::new(RealtimeDatabase::new(url.clone(), auth.clone()))
        }
    };
    Ok(backend)
}

fn notifier(cfg: &NotificationGateway) -> Result<Notifier> {
    let notifier = match cfg {
        NotificationGateway::Log => Notifier::Log(LogNotifier),
        NotificationGateway::Expo {
            api_url,
            push_token,
        } => Notifier::Expo(ExpoPush::new(api_url.clone(), push_token.clone())),
        NotificationGateway::JsonFile { dir } => {
            Notifier::JsonFile(SendToJsonFile::try_new(dir)?)
        }
    };
    Ok(notifier)
}
