use super::Result;
use floodwatch_entities::{
    flood::FloodZone,
    geo::{Coordinate, Distance},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FloodZoneQuery {
    pub center: Coordinate,
    pub radius: Distance,
    /// Polygons with a smaller area are skipped.
    pub min_shape_area: f64,
    pub limit: u32,
}

pub trait FloodZoneGateway {
    fn fetch_flood_zones(&self, query: &FloodZoneQuery) -> Result<Vec<FloodZone>>;
}
