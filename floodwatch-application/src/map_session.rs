//! Event loop around the [`MapOrchestrator`].
//!
//! Gateway calls are blocking and run on the blocking thread pool,
//! their results are sent back into the loop together with the
//! sequence number of the request.
//!
//! Every flood zone fetch is accompanied by a flood prediction if
//! [`FloodAlerts`] are configured. The user is warned about predicted
//! floods as long as the preferences allow it.

use super::*;
use crate::{
    error::{AlertOnError, UserAlert},
    notifications::AlertGuard,
};
use floodwatch_core::{
    gateways::{
        self, directions::DirectionsGateway, flood_zones::FloodZoneGateway,
        notify::LocalNotificationGateway, places::PlacesGateway,
        prediction::FloodPredictionGateway,
    },
    map::{FloodZoneRequest, MapOrchestrator, RouteRequest, Seq},
    usecases::FloodAlertFormatter,
};
use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::{
    runtime,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task,
};

#[derive(Clone)]
pub struct MapGateways {
    pub flood_zones: Arc<dyn FloodZoneGateway + Send + Sync>,
    pub directions: Arc<dyn DirectionsGateway + Send + Sync>,
    pub places: Arc<dyn PlacesGateway + Send + Sync>,
}

/// Prediction and delivery of flood alerts.
#[derive(Clone)]
pub struct FloodAlerts {
    pub session: Session,
    pub rain_data: Vec<RainfallSample>,
    pub prediction: Arc<dyn FloodPredictionGateway + Send + Sync>,
    pub records: Arc<dyn NotificationRepo + Send + Sync>,
    pub notifier: Arc<dyn LocalNotificationGateway + Send + Sync>,
    pub formatter: Arc<dyn FloodAlertFormatter + Send + Sync>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    MoveViewport(Coordinate),
    /// `None` if the location is no longer available.
    DeviceLocation(Option<Coordinate>),
    SelectMarker(MapMarker),
    SelectPlace(PlaceSuggestion),
    DismissPopup,
    StartRoute,
    ExitRoute,
    /// Stop as soon as all pending requests are answered.
    Shutdown,
}

#[derive(Debug)]
enum Event {
    Command(MapCommand),
    UserData(UserSnapshot),
    FloodZones {
        seq: Seq,
        result: gateways::Result<Vec<FloodZone>>,
    },
    Route {
        seq: Seq,
        result: gateways::Result<RoutePlan>,
    },
    Place(Result<MapMarker>),
    Prediction(Result<Vec<FloodPrediction>>),
    AlertsSent(Result<Vec<NotificationRecord>>),
}

/// Sends commands into a running [`MapSession`].
#[derive(Debug, Clone)]
pub struct MapHandle {
    tx: UnboundedSender<Event>,
}

impl MapHandle {
    /// `false` if the session has already been dropped.
    pub fn send(&self, cmd: MapCommand) -> bool {
        self.tx.send(Event::Command(cmd)).is_ok()
    }

    /// A listener that forwards changes of the user data.
    pub fn user_data_listener(&self) -> UserDataListener {
        let tx = self.tx.clone();
        Box::new(move |snapshot: &UserSnapshot| {
            if tx.send(Event::UserData(snapshot.clone())).is_err() {
                debug!("Map session is gone: drop user data update");
            }
        })
    }
}

pub struct MapSession {
    orchestrator: MapOrchestrator,
    gateways: MapGateways,
    flood_alerts: Option<FloodAlerts>,
    alert_guard: Arc<Mutex<AlertGuard>>,
    issued_alerts: Vec<NotificationRecord>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    pending: usize,
    shutting_down: bool,
    alerts: Vec<UserAlert>,
}

impl MapSession {
    pub fn new(orchestrator: MapOrchestrator, gateways: MapGateways) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            orchestrator,
            gateways,
            flood_alerts: None,
            alert_guard: Default::default(),
            issued_alerts: vec![],
            tx,
            rx,
            pending: 0,
            shutting_down: false,
            alerts: vec![],
        }
    }

    /// Warn the user about predicted floods.
    pub fn with_flood_alerts(mut self, flood_alerts: FloodAlerts) -> Self {
        self.flood_alerts = Some(flood_alerts);
        self
    }

    pub fn handle(&self) -> MapHandle {
        MapHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn orchestrator(&self) -> &MapOrchestrator {
        &self.orchestrator
    }

    /// Flood alerts that have been issued during this session.
    pub fn issued_alerts(&self) -> &[NotificationRecord] {
        &self.issued_alerts
    }

    /// Alerts that should be shown to the user.
    pub fn take_alerts(&mut self) -> Vec<UserAlert> {
        std::mem::take(&mut self.alerts)
    }

    /// Process events until [`MapCommand::Shutdown`] has
    /// been received and no more requests are pending.
    pub async fn run(&mut self) {
        self.shutting_down = false;
        while !(self.shutting_down && self.pending == 0) {
            let Some(event) = self.rx.recv().await else {
                break;
            };
            self.dispatch(event);
        }
        debug!("Map session finished");
    }

    /// Run the session on a new single threaded runtime.
    pub fn run_blocking(&mut self) -> io::Result<()> {
        let rt = runtime::Builder::new_current_thread().enable_all().build()?;
        rt.block_on(self.run());
        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::Command(cmd) => self.command(cmd),
            Event::UserData(snapshot) => self.orchestrator.user_data_changed(snapshot),
            Event::FloodZones { seq, result } => {
                self.pending -= 1;
                match result {
                    Ok(zones) => {
                        self.orchestrator.flood_zones_fetched(seq, zones);
                    }
                    Err(err) => self.orchestrator.flood_zones_failed(seq, &err),
                }
            }
            Event::Route { seq, result } => {
                self.pending -= 1;
                match result {
                    Ok(plan) => {
                        self.orchestrator.route_planned(seq, plan);
                    }
                    Err(err) => self.orchestrator.route_failed(seq, &err),
                }
            }
            Event::Place(result) => {
                self.pending -= 1;
                match result {
                    Ok(marker) => {
                        let request = self.orchestrator.show_search_result(marker);
                        self.fetch_flood_zones(request);
                    }
                    Err(_) => self
                        .alerts
                        .push(UserAlert::error("Failed to retrieve address details")),
                }
            }
            Event::Prediction(result) => {
                self.pending -= 1;
                match result {
                    Ok(predictions) => self.send_flood_alerts(predictions),
                    Err(err) => debug!("No flood prediction available: {err}"),
                }
            }
            Event::AlertsSent(result) => {
                self.pending -= 1;
                match result.or_alert("Failed to schedule notification and save to database.") {
                    Ok(records) => self.issued_alerts.extend(records),
                    Err(alert) => self.alerts.push(alert),
                }
            }
        }
    }

    fn command(&mut self, cmd: MapCommand) {
        match cmd {
            MapCommand::MoveViewport(center) => {
                let request = self.orchestrator.viewport_changed(center);
                self.fetch_flood_zones(request);
            }
            MapCommand::DeviceLocation(Some(location)) => {
                let request = self.orchestrator.device_location_changed(location);
                self.fetch_flood_zones(request);
            }
            MapCommand::DeviceLocation(None) => self.orchestrator.device_location_lost(),
            MapCommand::SelectMarker(marker) => {
                let request = self.orchestrator.select_marker(marker);
                self.fetch_flood_zones(request);
            }
            MapCommand::SelectPlace(suggestion) => self.resolve_place(suggestion),
            MapCommand::DismissPopup => self.orchestrator.dismiss_popup(),
            MapCommand::StartRoute => match self.orchestrator.start_route() {
                Ok(request) => self.plan_route(request),
                Err(err) => {
                    warn!("Unable to start route: {err}");
                    self.alerts.push(UserAlert::error(err.to_string()));
                }
            },
            MapCommand::ExitRoute => self.orchestrator.exit_route(),
            MapCommand::Shutdown => self.shutting_down = true,
        }
    }

    fn fetch_flood_zones(&mut self, request: Option<FloodZoneRequest>) {
        let Some(FloodZoneRequest { seq, query }) = request else {
            return;
        };
        let gateway = self.gateways.flood_zones.clone();
        let tx = self.tx.clone();
        self.pending += 1;
        task::spawn_blocking(move || {
            let result = gateway.fetch_flood_zones(&query);
            let _ = tx.send(Event::FloodZones { seq, result });
        });
        self.predict_floods();
    }

    fn predict_floods(&mut self) {
        let Some(FloodAlerts {
            prediction,
            rain_data,
            ..
        }) = self.flood_alerts.clone()
        else {
            return;
        };
        let tx = self.tx.clone();
        self.pending += 1;
        task::spawn_blocking(move || {
            let result = crate::notifications::predict_floods(&*prediction, &rain_data);
            let _ = tx.send(Event::Prediction(result));
        });
    }

    fn send_flood_alerts(&mut self, predictions: Vec<FloodPrediction>) {
        let Some(alerts) = self.flood_alerts.clone() else {
            return;
        };
        if !self.orchestrator.flood_alerts_enabled() {
            debug!("Flood alerts are disabled: ignore prediction");
            return;
        }
        let preferences = self.orchestrator.preferences();
        let guard = Arc::clone(&self.alert_guard);
        let tx = self.tx.clone();
        self.pending += 1;
        task::spawn_blocking(move || {
            let mut guard = guard.lock().unwrap_or_else(PoisonError::into_inner);
            let result = crate::notifications::send_flood_alerts(
                &*alerts.records,
                &alerts.session,
                &preferences,
                &*alerts.notifier,
                &*alerts.formatter,
                &mut guard,
                &predictions,
            );
            let _ = tx.send(Event::AlertsSent(result));
        });
    }

    fn plan_route(&mut self, request: RouteRequest) {
        let RouteRequest {
            seq,
            origin,
            destination,
        } = request;
        let gateway = self.gateways.directions.clone();
        let tx = self.tx.clone();
        self.pending += 1;
        task::spawn_blocking(move || {
            let result = gateway.plan_route(origin, destination);
            let _ = tx.send(Event::Route { seq, result });
        });
    }

    fn resolve_place(&mut self, suggestion: PlaceSuggestion) {
        let gateway = self.gateways.places.clone();
        let tx = self.tx.clone();
        self.pending += 1;
        task::spawn_blocking(move || {
            let result = crate::search::select_place(&*gateway, &suggestion)
                .map(|(_, marker)| marker);
            let _ = tx.send(Event::Place(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::prelude::*;
    use floodwatch_core::map::{MapConfig, Popup, RouteState};

    const BRISBANE: Coordinate = Coordinate {
        latitude: -27.4698,
        longitude: 153.0251,
    };

    fn gateways(flood_zones: Arc<MockFloodZones>) -> MapGateways {
        MapGateways {
            flood_zones,
            directions: Arc::new(MockDirections),
            places: Arc::new(MockPlaces::default()),
        }
    }

    fn session(flood_zones: Arc<MockFloodZones>) -> MapSession {
        let orchestrator = MapOrchestrator::new(MapConfig::default(), default_shelters());
        MapSession::new(orchestrator, gateways(flood_zones))
    }

    #[tokio::test]
    async fn first_location_fix_loads_flood_zones() {
        let zones = Arc::new(MockFloodZones::default());
        let mut session = session(zones.clone());
        let handle = session.handle();
        handle.send(MapCommand::DeviceLocation(Some(BRISBANE)));
        handle.send(MapCommand::Shutdown);
        session.run().await;

        assert_eq!(zones.queries.lock().unwrap().len(), 1);
        let map = session.orchestrator();
        assert_eq!(map.visible_flood_zones().len(), 1);
        assert_eq!(map.last_fetch_center(), BRISBANE);
        assert!(session.take_alerts().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_map_usable() {
        let zones = Arc::new(MockFloodZones {
            fail: true,
            ..Default::default()
        });
        let mut session = session(zones);
        let handle = session.handle();
        handle.send(MapCommand::MoveViewport(BRISBANE));
        handle.send(MapCommand::Shutdown);
        session.run().await;
        assert!(session.orchestrator().visible_flood_zones().is_empty());
        assert!(session.take_alerts().is_empty());
    }

    #[tokio::test]
    async fn route_to_selected_shelter() {
        let mut session = session(Arc::new(MockFloodZones::default()));
        let handle = session.handle();
        let shelter = default_shelters().remove(1);
        handle.send(MapCommand::DeviceLocation(Some(BRISBANE)));
        handle.send(MapCommand::SelectMarker(shelter.clone().into()));
        handle.send(MapCommand::StartRoute);
        handle.send(MapCommand::Shutdown);
        session.run().await;

        let map = session.orchestrator();
        let plan = map.route_plan().unwrap();
        assert_eq!(plan.destination, shelter.coordinate);
        assert!(matches!(map.popup(), Popup::RouteSummary(_)));

        handle.send(MapCommand::ExitRoute);
        handle.send(MapCommand::Shutdown);
        session.run().await;
        assert_eq!(*session.orchestrator().route_state(), RouteState::Inactive);
        assert!(session.orchestrator().selected().is_none());
    }

    #[tokio::test]
    async fn routing_without_location_alerts_the_user() {
        let mut session = session(Arc::new(MockFloodZones::default()));
        let handle = session.handle();
        handle.send(MapCommand::SelectMarker(default_shelters().remove(0).into()));
        handle.send(MapCommand::StartRoute);
        handle.send(MapCommand::Shutdown);
        session.run().await;
        let alerts = session.take_alerts();
        assert_eq!(alerts, vec![UserAlert::error("No location provided")]);
    }

    #[tokio::test]
    async fn selected_place_is_shown_as_search_result() {
        let mut session = session(Arc::new(MockFloodZones::default()));
        let handle = session.handle();
        handle.send(MapCommand::SelectPlace(PlaceSuggestion {
            place_id: "place-queen".into(),
            description: "Queen Street".into(),
        }));
        handle.send(MapCommand::SelectPlace(PlaceSuggestion {
            place_id: "unknown".into(),
            description: "Nowhere".into(),
        }));
        handle.send(MapCommand::Shutdown);
        session.run().await;
        let selected = session.orchestrator().selected().unwrap();
        assert!(matches!(selected.kind, MarkerKind::SearchResult(_)));
        assert_eq!(
            session.take_alerts(),
            vec![UserAlert::error("Failed to retrieve address details")]
        );
    }

    #[tokio::test]
    async fn user_data_updates_reach_the_map() {
        let mut session = session(Arc::new(MockFloodZones::default()));
        let handle = session.handle();
        let listener = handle.user_data_listener();
        let mut prefs = UserPreferences::default();
        prefs.set(PreferenceKey::FloodZoneWarnings, false);
        listener(&UserSnapshot {
            preferences: Some(prefs),
            addresses: AddressBook::default(),
        });
        handle.send(MapCommand::Shutdown);
        session.run().await;
        assert!(!session.orchestrator().preferences().flood_zone_warnings);
    }

    struct AlertSinks {
        prediction: Arc<MockPrediction>,
        store: Arc<UserDataStore<MemoryBackend>>,
        notifier: Arc<MockNotifier>,
    }

    fn session_with_alerts(user: Session) -> (MapSession, AlertSinks) {
        let sinks = AlertSinks {
            prediction: Arc::new(MockPrediction::default()),
            store: Arc::new(memory_store()),
            notifier: Arc::new(MockNotifier::default()),
        };
        let flood_alerts = FloodAlerts {
            session: user,
            rain_data: simulated_rain_series(),
            prediction: sinks.prediction.clone(),
            records: sinks.store.clone(),
            notifier: sinks.notifier.clone(),
            formatter: Arc::new(PlainFormatter),
        };
        let map = session(Arc::new(MockFloodZones::default())).with_flood_alerts(flood_alerts);
        (map, sinks)
    }

    #[tokio::test]
    async fn predicted_floods_are_announced_once_per_session() {
        let (mut session, sinks) = session_with_alerts(Session::signed_in("alice"));
        let handle = session.handle();
        handle.send(MapCommand::DeviceLocation(Some(BRISBANE)));
        handle.send(MapCommand::MoveViewport(Coordinate::new(-27.5598, 153.0251)));
        handle.send(MapCommand::Shutdown);
        session.run().await;

        assert_eq!(*sinks.prediction.calls.lock().unwrap(), 2);
        let scheduled = sinks.notifier.scheduled.lock().unwrap().clone();
        let bodies: Vec<_> = scheduled.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["2024-10-26", "2024-10-27"]);
        assert_eq!(session.issued_alerts().len(), 2);
        let records = sinks
            .store
            .load_notification_records(&Id::from("alice"))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(session.take_alerts().is_empty());
    }

    #[tokio::test]
    async fn disabled_push_notifications_keep_the_map_silent() {
        let (mut session, sinks) = session_with_alerts(Session::signed_in("alice"));
        let handle = session.handle();
        let mut prefs = UserPreferences::default();
        prefs.set(PreferenceKey::PushNotifications, false);
        handle.user_data_listener()(&UserSnapshot {
            preferences: Some(prefs),
            addresses: AddressBook::default(),
        });
        handle.send(MapCommand::DeviceLocation(Some(BRISBANE)));
        handle.send(MapCommand::Shutdown);
        session.run().await;

        assert_eq!(session.orchestrator().visible_flood_zones().len(), 1);
        assert!(sinks.notifier.scheduled.lock().unwrap().is_empty());
        assert!(session.issued_alerts().is_empty());
        let records = sinks
            .store
            .load_notification_records(&Id::from("alice"))
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn anonymous_users_get_no_flood_alerts() {
        let (mut session, sinks) = session_with_alerts(Session::anonymous());
        let handle = session.handle();
        handle.send(MapCommand::DeviceLocation(Some(BRISBANE)));
        handle.send(MapCommand::Shutdown);
        session.run().await;
        assert!(sinks.notifier.scheduled.lock().unwrap().is_empty());
        assert!(session.take_alerts().is_empty());
    }
}
