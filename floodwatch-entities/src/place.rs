use crate::geo::Coordinate;

/// Candidate of an address autocompletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    pub place_id: String,
    pub formatted_address: String,
    pub coordinate: Coordinate,
}
