use crate::http;
use floodwatch_core::{
    entities::*,
    gateways::{
        flood_zones::{FloodZoneGateway, FloodZoneQuery},
        Result,
    },
};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://data.brisbane.qld.gov.au";

const DATASET: &str = "flood-awareness-flood-risk-overall";

/// Flood risk polygons of the Brisbane open data portal.
#[derive(Debug, Clone)]
pub struct OpenDataFloodZones {
    pub api_base_url: String,
}

impl Default for OpenDataFloodZones {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

impl OpenDataFloodZones {
    fn records_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        format!("{base}/api/explore/v2.1/catalog/datasets/{DATASET}/records")
    }
}

fn where_clause(query: &FloodZoneQuery) -> String {
    let FloodZoneQuery {
        center,
        radius,
        min_shape_area,
        ..
    } = query;
    format!(
        "within_distance(geo_point_2d, geom'POINT({} {})', {}km) AND shape_area > {min_shape_area}",
        center.longitude,
        center.latitude,
        radius.to_km()
    )
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    results: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    geo_shape: Option<GeoShape>,
    flood_risk: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoShape {
    geometry: geojson::Geometry,
}

// GeoJSON positions are [longitude, latitude].
fn ring(positions: &[geojson::Position]) -> PolygonRing {
    positions
        .iter()
        .filter_map(|p| match p.as_slice() {
            [lng, lat, ..] => Some(Coordinate::new(*lat, *lng)),
            _ => None,
        })
        .collect()
}

fn polygon_rings(value: &geojson::Value) -> Option<Vec<PolygonRing>> {
    match value {
        geojson::Value::Polygon(rings) => Some(rings.iter().map(|r| ring(r)).collect()),
        geojson::Value::MultiPolygon(polygons) => {
            Some(polygons.iter().flatten().map(|r| ring(r)).collect())
        }
        _ => None,
    }
}

fn flood_zones(response: RecordsResponse) -> Vec<FloodZone> {
    response
        .results
        .into_iter()
        .filter_map(|record| {
            let Record {
                geo_shape,
                flood_risk,
            } = record;
            let Some(rings) = geo_shape.and_then(|s| polygon_rings(&s.geometry.value)) else {
                log::debug!("Skip flood zone record without polygon");
                return None;
            };
            Some(FloodZone {
                polygon_rings: rings,
                risk_level: RiskLevel::from_label(flood_risk.as_deref()),
            })
        })
        .filter(|zone| !zone.is_empty())
        .collect()
}

impl FloodZoneGateway for OpenDataFloodZones {
    fn fetch_flood_zones(&self, query: &FloodZoneQuery) -> Result<Vec<FloodZone>> {
        let limit = query.limit.to_string();
        let request = http::client()
            .get(self.records_url())
            .query(&[("where", where_clause(query)), ("limit", limit)]);
        let response: RecordsResponse = http::send_json(request)?;
        let zones = flood_zones(response);
        log::debug!("Fetched {} flood zones around {}", zones.len(), query.center);
        Ok(zones)
    }
}
