//! View state of the flood map.
//!
//! The [`MapOrchestrator`] is a plain state machine: it never performs
//! any I/O but returns requests that have to be executed by the caller.
//! Results are fed back together with the sequence number of the request.
//! Results of outdated requests are ignored.

use crate::{entities::*, gateways::flood_zones::FloodZoneQuery};
use thiserror::Error;

mod orchestrator;

pub use self::orchestrator::*;

/// Monotonically increasing number of a request issued by the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seq(u64);

impl Seq {
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// The viewport has to move further than this
    /// before flood zones are fetched again.
    pub refetch_threshold: Distance,
    pub zone_radius: Distance,
    pub min_shape_area: f64,
    pub zone_limit: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            refetch_threshold: Distance::from_km(1.0),
            zone_radius: Distance::from_km(2.0),
            min_shape_area: 100.0,
            zone_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching { seq: Seq },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloodZoneRequest {
    pub seq: Seq,
    pub query: FloodZoneQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub seq: Seq,
    pub origin: Coordinate,
    pub destination: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
    Inactive,
    Pending(RouteRequest),
    Active(RoutePlan),
}

/// The transient panel that is currently shown on top of the map.
#[derive(Debug, Clone, PartialEq)]
pub enum Popup<'a> {
    None,
    /// Details of the selected marker with the distance
    /// to the user if the location is known.
    Marker {
        marker: &'a MapMarker,
        distance: Option<Distance>,
    },
    /// Waiting for a route to be calculated.
    RoutePending,
    RouteSummary(&'a RoutePlan),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("No location provided")]
    NoLocation,
    #[error("No marker selected")]
    NothingSelected,
    #[error("Routes are disabled")]
    RoutesDisabled,
}
