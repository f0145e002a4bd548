//! Places and directions of the Google Maps web services.

use crate::http;
use floodwatch_core::{
    entities::*,
    gateways::{
        directions::DirectionsGateway, places::PlacesGateway, Error, Result,
    },
};
use serde::{de::DeserializeOwned, Deserialize};

pub const DEFAULT_API_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Clone)]
pub struct GoogleMaps {
    pub api_base_url: String,
    pub api_key: String,
}

impl GoogleMaps {
    fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let base = self.api_base_url.trim_end_matches('/');
        let request = http::client()
            .get(format!("{base}/maps/api/{endpoint}/json"))
            .query(params)
            .query(&[("key", &self.api_key)]);
        http::send_json(request)
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    place_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<Details>,
}

#[derive(Debug, Deserialize)]
struct Details {
    place_id: String,
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Value,
    duration: Value,
}

#[derive(Debug, Deserialize)]
struct Value {
    value: f64,
}

fn check_api_status(status: &str) -> Result<()> {
    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(Error::NotFound),
        other => Err(Error::InvalidResponse(format!("status {other}"))),
    }
}

fn suggestions(response: AutocompleteResponse) -> Result<Vec<PlaceSuggestion>> {
    if response.status == "ZERO_RESULTS" {
        return Ok(vec![]);
    }
    check_api_status(&response.status)?;
    Ok(response
        .predictions
        .into_iter()
        .map(|s| PlaceSuggestion {
            place_id: s.place_id,
            description: s.description,
        })
        .collect())
}

fn place_details(response: DetailsResponse) -> Result<PlaceDetails> {
    check_api_status(&response.status)?;
    let Details {
        place_id,
        formatted_address,
        geometry,
    } = response.result.ok_or(Error::NotFound)?;
    Ok(PlaceDetails {
        place_id,
        formatted_address,
        coordinate: Coordinate::new(geometry.location.lat, geometry.location.lng),
    })
}

fn route_plan(
    response: DirectionsResponse,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<RoutePlan> {
    check_api_status(&response.status)?;
    let leg = response
        .routes
        .into_iter()
        .next()
        .and_then(|r| r.legs.into_iter().next())
        .ok_or_else(|| Error::InvalidResponse("route without legs".into()))?;
    Ok(RoutePlan {
        origin,
        destination,
        distance_km: Distance::from_meters(leg.distance.value).to_km(),
        duration_minutes: leg.duration.value / 60.0,
    })
}

impl PlacesGateway for GoogleMaps {
    fn autocomplete(&self, input: &str) -> Result<Vec<PlaceSuggestion>> {
        suggestions(self.get("place/autocomplete", &[("input", input)])?)
    }

    fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        place_details(self.get("place/details", &[("place_id", place_id)])?)
    }
}

impl DirectionsGateway for GoogleMaps {
    fn plan_route(&self, origin: Coordinate, destination: Coordinate) -> Result<RoutePlan> {
        let response = self.get(
            "directions",
            &[
                ("origin", &origin.to_string()),
                ("destination", &destination.to_string()),
            ],
        )?;
        route_plan(response, origin, destination)
    }
}
