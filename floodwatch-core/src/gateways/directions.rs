use super::Result;
use floodwatch_entities::{geo::Coordinate, route::RoutePlan};

pub trait DirectionsGateway {
    fn plan_route(&self, origin: Coordinate, destination: Coordinate) -> Result<RoutePlan>;
}
