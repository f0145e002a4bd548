use super::prelude::*;
use crate::gateways::places::PlacesGateway;

/// Inputs up to this number of characters are not looked up.
const MAX_IGNORED_INPUT_LEN: usize = 2;

pub fn is_searchable_input(input: &str) -> bool {
    input.trim().chars().count() > MAX_IGNORED_INPUT_LEN
}

/// Suggest places that match the given input.
///
/// Short inputs result in no suggestions without
/// asking the gateway.
pub fn search_places<G>(gateway: &G, input: &str) -> Result<Vec<PlaceSuggestion>>
where
    G: PlacesGateway + ?Sized,
{
    if !is_searchable_input(input) {
        return Ok(vec![]);
    }
    let suggestions = gateway.autocomplete(input.trim())?;
    log::debug!("Found {} places for '{input}'", suggestions.len());
    Ok(suggestions)
}

/// Resolve a suggestion into a marker that can be shown on the map.
pub fn resolve_place<G>(gateway: &G, suggestion: &PlaceSuggestion) -> Result<(PlaceDetails, MapMarker)>
where
    G: PlacesGateway + ?Sized,
{
    let details = gateway.place_details(&suggestion.place_id)?;
    if !details.coordinate.is_valid() {
        return Err(Error::InvalidPosition);
    }
    let marker = MapMarker::search_result(
        details.coordinate,
        details.formatted_address.clone(),
        Some(details.place_id.clone()),
    );
    Ok((details, marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::MockPlaces;

    #[test]
    fn ignore_short_input() {
        let gw = MockPlaces::default();
        assert!(search_places(&gw, "ab").unwrap().is_empty());
        assert!(search_places(&gw, "  ab ").unwrap().is_empty());
        assert_eq!(gw.queries.borrow().len(), 0);

        let suggestions = search_places(&gw, "abc").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(*gw.queries.borrow(), vec!["abc".to_string()]);
    }

    #[test]
    fn resolve_suggestion_to_marker() {
        let gw = MockPlaces::default();
        let suggestion = search_places(&gw, "Queen Street").unwrap().remove(0);
        let (details, marker) = resolve_place(&gw, &suggestion).unwrap();
        assert_eq!(details.place_id, suggestion.place_id);
        assert_eq!(marker.coordinate, details.coordinate);
        assert_eq!(
            marker.kind,
            MarkerKind::SearchResult(Some(suggestion.place_id.clone()))
        );
    }
}
