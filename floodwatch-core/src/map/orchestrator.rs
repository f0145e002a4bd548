use super::*;
use crate::{repositories::UserSnapshot, usecases};

#[derive(Debug)]
pub struct MapOrchestrator {
    config: MapConfig,
    last_seq: u64,
    viewport_center: Coordinate,
    last_fetch_center: Coordinate,
    fetch_state: FetchState,
    flood_zones: Vec<FloodZone>,
    device_location: Option<Coordinate>,
    shelters: Vec<Shelter>,
    user_data: UserSnapshot,
    search_result: Option<MapMarker>,
    selected: Option<MapMarker>,
    route: RouteState,
}

impl MapOrchestrator {
    pub fn new(config: MapConfig, shelters: Vec<Shelter>) -> Self {
        Self {
            config,
            last_seq: 0,
            viewport_center: Coordinate::default(),
            // Nothing has been fetched yet
            last_fetch_center: Coordinate::default(),
            fetch_state: FetchState::Idle,
            flood_zones: vec![],
            device_location: None,
            shelters,
            user_data: UserSnapshot::default(),
            search_result: None,
            selected: None,
            route: RouteState::Inactive,
        }
    }

    fn next_seq(&mut self) -> Seq {
        self.last_seq += 1;
        Seq(self.last_seq)
    }

    pub fn viewport_changed(&mut self, center: Coordinate) -> Option<FloodZoneRequest> {
        self.viewport_center = center;
        let moved = self.last_fetch_center.distance_to(center);
        if moved <= self.config.refetch_threshold {
            return None;
        }
        let seq = self.next_seq();
        log::debug!(
            "Viewport moved {moved} from the last fetch: fetch flood zones around {center} (#{})",
            seq.value()
        );
        self.last_fetch_center = center;
        self.fetch_state = FetchState::Fetching { seq };
        let query = FloodZoneQuery {
            center,
            radius: self.config.zone_radius,
            min_shape_area: self.config.min_shape_area,
            limit: self.config.zone_limit,
        };
        Some(FloodZoneRequest { seq, query })
    }

    fn is_latest_fetch(&self, seq: Seq) -> bool {
        matches!(self.fetch_state, FetchState::Fetching { seq: latest } if latest == seq)
    }

    /// Replace all flood zones.
    ///
    /// Returns `false` if the result was outdated and has been discarded.
    pub fn flood_zones_fetched(&mut self, seq: Seq, zones: Vec<FloodZone>) -> bool {
        if !self.is_latest_fetch(seq) {
            log::info!("Discard outdated flood zones of request #{}", seq.value());
            return false;
        }
        log::debug!("Received {} flood zones", zones.len());
        self.fetch_state = FetchState::Idle;
        self.flood_zones = zones;
        true
    }

    /// The previous flood zones stay in place.
    pub fn flood_zones_failed(&mut self, seq: Seq, err: &dyn std::fmt::Display) {
        if !self.is_latest_fetch(seq) {
            log::debug!("Ignore failure of outdated request #{}: {err}", seq.value());
            return;
        }
        log::warn!("Unable to fetch flood zones: {err}");
        self.fetch_state = FetchState::Idle;
    }

    /// The first location fix centers the map on the device.
    pub fn device_location_changed(&mut self, location: Coordinate) -> Option<FloodZoneRequest> {
        let first_fix = self.device_location.is_none();
        self.device_location = Some(location);
        if !first_fix {
            return None;
        }
        if let Ok(Some((shelter, distance))) = self.closest_shelter() {
            log::info!("Closest shelter is {} ({distance})", shelter.title);
        }
        self.viewport_changed(location)
    }

    /// The location is unknown, e.g. because the permission was denied.
    pub fn device_location_lost(&mut self) {
        if self.device_location.take().is_some() {
            log::info!("Device location is no longer available");
        }
        if matches!(self.route, RouteState::Pending(_)) {
            self.route = RouteState::Inactive;
        }
    }

    pub fn closest_shelter(&self) -> Result<Option<(&Shelter, Distance)>, Error> {
        usecases::closest_shelter(&self.shelters, self.device_location)
            .map_err(|_| Error::NoLocation)
    }

    pub fn user_data_changed(&mut self, snapshot: UserSnapshot) {
        if snapshot == self.user_data {
            return;
        }
        self.user_data = snapshot;
        if !self.preferences().show_routes() && self.route != RouteState::Inactive {
            log::debug!("Routes have been disabled");
            self.route = RouteState::Inactive;
        }
        let selected_address_deleted = matches!(
            self.selected.as_ref().map(|m| &m.kind),
            Some(MarkerKind::Saved(id)) if self.user_data.addresses.find(id.as_str()).is_none()
        );
        if selected_address_deleted {
            self.selected = None;
            self.route = RouteState::Inactive;
        }
    }

    /// Select a single marker and center the map on it.
    pub fn select_marker(&mut self, marker: MapMarker) -> Option<FloodZoneRequest> {
        let center = marker.coordinate;
        if self.route != RouteState::Inactive {
            log::debug!("Cancel route");
            self.route = RouteState::Inactive;
        }
        self.selected = Some(marker);
        self.viewport_changed(center)
    }

    pub fn show_search_result(&mut self, marker: MapMarker) -> Option<FloodZoneRequest> {
        self.search_result = Some(marker.clone());
        self.select_marker(marker)
    }

    /// Close the popup of the selected marker.
    pub fn dismiss_popup(&mut self) {
        self.selected = None;
        self.search_result = None;
    }

    pub fn start_route(&mut self) -> Result<RouteRequest, Error> {
        if !self.preferences().show_routes() {
            return Err(Error::RoutesDisabled);
        }
        let destination = self
            .selected
            .as_ref()
            .ok_or(Error::NothingSelected)?
            .coordinate;
        let origin = self.device_location.ok_or(Error::NoLocation)?;
        let seq = self.next_seq();
        let request = RouteRequest {
            seq,
            origin,
            destination,
        };
        self.route = RouteState::Pending(request.clone());
        Ok(request)
    }

    fn is_pending_route(&self, seq: Seq) -> bool {
        matches!(&self.route, RouteState::Pending(request) if request.seq == seq)
    }

    /// Returns `false` if the route is no longer requested.
    pub fn route_planned(&mut self, seq: Seq, plan: RoutePlan) -> bool {
        if !self.is_pending_route(seq) {
            log::info!("Discard outdated route #{}", seq.value());
            return false;
        }
        log::debug!("Route planned: {plan}");
        self.route = RouteState::Active(plan);
        true
    }

    pub fn route_failed(&mut self, seq: Seq, err: &dyn std::fmt::Display) {
        if !self.is_pending_route(seq) {
            return;
        }
        log::warn!("Unable to plan route: {err}");
        self.route = RouteState::Inactive;
    }

    /// Leave the route view without restoring the selection.
    pub fn exit_route(&mut self) {
        self.route = RouteState::Inactive;
        self.selected = None;
    }

    pub fn preferences(&self) -> UserPreferences {
        self.user_data.preferences.unwrap_or_default()
    }

    pub fn flood_alerts_enabled(&self) -> bool {
        self.preferences().flood_alerts_enabled()
    }

    pub fn viewport_center(&self) -> Coordinate {
        self.viewport_center
    }

    pub fn last_fetch_center(&self) -> Coordinate {
        self.last_fetch_center
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    pub fn device_location(&self) -> Option<Coordinate> {
        self.device_location
    }

    pub fn shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    pub fn selected(&self) -> Option<&MapMarker> {
        self.selected.as_ref()
    }

    pub fn route_state(&self) -> &RouteState {
        &self.route
    }

    /// The zones that should be drawn.
    pub fn visible_flood_zones(&self) -> &[FloodZone] {
        if self.preferences().show_flood_zones() {
            &self.flood_zones
        } else {
            &[]
        }
    }

    pub fn route_plan(&self) -> Option<&RoutePlan> {
        match &self.route {
            RouteState::Active(plan) if self.preferences().show_routes() => Some(plan),
            _ => None,
        }
    }

    pub fn popup(&self) -> Popup<'_> {
        match &self.route {
            RouteState::Pending(_) => Popup::RoutePending,
            RouteState::Active(plan) => Popup::RouteSummary(plan),
            RouteState::Inactive => match &self.selected {
                Some(marker) => Popup::Marker {
                    marker,
                    distance: self
                        .device_location
                        .map(|pos| pos.distance_to(marker.coordinate)),
                },
                None => Popup::None,
            },
        }
    }

    /// All markers that should be drawn.
    pub fn markers(&self) -> Vec<MapMarker> {
        let mut markers = Vec::with_capacity(self.shelters.len() + 4);
        if let Some(pos) = self.device_location {
            if self.preferences().show_user_location() {
                markers.push(MapMarker::user(pos));
            }
        }
        markers.extend(self.shelters.iter().cloned().map(MapMarker::from));
        let AddressBook { home, work, saved } = &self.user_data.addresses;
        if let Some(home) = home {
            markers.push((AddressRole::Home, home.clone()).into());
        }
        if let Some(work) = work {
            markers.push((AddressRole::Work, work.clone()).into());
        }
        markers.extend(saved.iter().cloned().map(MapMarker::from));
        if let Some(search_result) = &self.search_result {
            markers.push(search_result.clone());
        }
        markers
    }
}
