use super::Result;
use floodwatch_entities::place::{PlaceDetails, PlaceSuggestion};

pub trait PlacesGateway {
    fn autocomplete(&self, input: &str) -> Result<Vec<PlaceSuggestion>>;
    fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;
}
