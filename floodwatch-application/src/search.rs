use super::*;
use floodwatch_core::gateways::places::PlacesGateway;

pub fn search_places<G>(gateway: &G, input: &str) -> Result<Vec<PlaceSuggestion>>
where
    G: PlacesGateway + ?Sized,
{
    Ok(usecases::search_places(gateway, input).map_err(|err| {
        warn!("Failed to search places for '{input}': {}", err);
        err
    })?)
}

pub fn select_place<G>(gateway: &G, suggestion: &PlaceSuggestion) -> Result<(PlaceDetails, MapMarker)>
where
    G: PlacesGateway + ?Sized,
{
    Ok(usecases::resolve_place(gateway, suggestion).map_err(|err| {
        warn!("Failed to load details of place {}: {}", suggestion.place_id, err);
        err
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::prelude::*;

    #[test]
    fn short_inputs_are_not_searched() {
        let places = MockPlaces::default();
        assert!(search_places(&places, "qu").unwrap().is_empty());
        assert!(places.queries.lock().unwrap().is_empty());
        let found = search_places(&places, "queen").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn selected_place_becomes_search_result_marker() {
        let places = MockPlaces::default();
        let suggestion = search_places(&places, "queen").unwrap().remove(0);
        let (details, marker) = select_place(&places, &suggestion).unwrap();
        assert_eq!(marker.coordinate, details.coordinate);
        assert!(matches!(marker.kind, MarkerKind::SearchResult(Some(_))));
    }
}
