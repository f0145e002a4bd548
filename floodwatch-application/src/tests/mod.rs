pub mod prelude {
    use std::{sync::Mutex, time::Duration};

    pub use floodwatch_core::{entities::*, repositories::*, session::Session};
    use floodwatch_core::{
        gateways::{
            self, directions::DirectionsGateway, flood_zones::*,
            notify::LocalNotificationGateway, places::PlacesGateway,
            prediction::FloodPredictionGateway,
        },
        usecases::{FloodAlert, FloodAlertFormatter},
    };
    pub use floodwatch_store::{JsonBackend, MemoryBackend, UserDataStore};

    pub fn memory_store() -> UserDataStore<MemoryBackend> {
        UserDataStore::new(MemoryBackend::new())
    }

    #[derive(Default)]
    pub struct MockNotifier {
        pub scheduled: Mutex<Vec<LocalNotification>>,
    }

    impl LocalNotificationGateway for MockNotifier {
        fn schedule(&self, notification: &LocalNotification) {
            self.scheduled.lock().unwrap().push(notification.clone());
        }
    }

    pub struct PlainFormatter;

    impl FloodAlertFormatter for PlainFormatter {
        fn format_alert(&self, alert: &FloodAlert) -> LocalNotification {
            LocalNotification {
                title: alert.severity.to_string(),
                body: alert.date.clone(),
                image: None,
                trigger_after: Duration::ZERO,
            }
        }
    }

    #[derive(Default)]
    pub struct MockPlaces {
        pub queries: Mutex<Vec<String>>,
    }

    impl PlacesGateway for MockPlaces {
        fn autocomplete(&self, input: &str) -> gateways::Result<Vec<PlaceSuggestion>> {
            self.queries.lock().unwrap().push(input.to_owned());
            Ok(vec![PlaceSuggestion {
                place_id: format!("place-{input}"),
                description: format!("{input}, Brisbane QLD"),
            }])
        }

        fn place_details(&self, place_id: &str) -> gateways::Result<PlaceDetails> {
            if !place_id.starts_with("place-") {
                return Err(gateways::Error::NotFound);
            }
            Ok(PlaceDetails {
                place_id: place_id.to_owned(),
                formatted_address: "Queen Street, Brisbane City QLD 4000".into(),
                coordinate: Coordinate::new(-27.4689, 153.0235),
            })
        }
    }

    /// Returns a single zone per query, centred on the query.
    #[derive(Default)]
    pub struct MockFloodZones {
        pub queries: Mutex<Vec<FloodZoneQuery>>,
        pub fail: bool,
    }

    impl FloodZoneGateway for MockFloodZones {
        fn fetch_flood_zones(&self, query: &FloodZoneQuery) -> gateways::Result<Vec<FloodZone>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(gateways::Error::Status {
                    code: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(vec![FloodZone {
                polygon_rings: vec![vec![query.center; 3]],
                risk_level: RiskLevel::High,
            }])
        }
    }

    #[derive(Default)]
    pub struct MockDirections;

    impl DirectionsGateway for MockDirections {
        fn plan_route(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> gateways::Result<RoutePlan> {
            let distance_km = origin.distance_to(destination).to_km();
            Ok(RoutePlan {
                origin,
                destination,
                distance_km,
                duration_minutes: distance_km * 2.0,
            })
        }
    }

    /// Predicts minor flooding for tomorrow and major
    /// flooding for the day after.
    #[derive(Default)]
    pub struct MockPrediction {
        pub calls: Mutex<usize>,
    }

    impl FloodPredictionGateway for MockPrediction {
        fn predict_floods(
            &self,
            _: &[RainfallSample],
        ) -> gateways::Result<Vec<FloodPrediction>> {
            *self.calls.lock().unwrap() += 1;
            Ok(vec![
                FloodPrediction {
                    date: "2024-10-25".into(),
                    risk_level: 0,
                },
                FloodPrediction {
                    date: "2024-10-26".into(),
                    risk_level: 1,
                },
                FloodPrediction {
                    date: "2024-10-27".into(),
                    risk_level: 3,
                },
            ])
        }
    }
}
