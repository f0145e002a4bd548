use crate::{
    address::{AddressRole, SavedAddress},
    geo::Coordinate,
    id::Id,
    shelter::Shelter,
};

/// What a marker on the map stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    /// The current device location.
    User,
    Shelter(Shelter),
    /// Formatted address of the home location.
    Home(String),
    /// Formatted address of the work location.
    Work(String),
    /// Id of a saved address.
    Saved(Id),
    /// Result of a place search, optionally with the id of the place.
    SearchResult(Option<String>),
}

impl MarkerKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Shelter(_) => "shelter",
            Self::Home(_) => "home",
            Self::Work(_) => "work",
            Self::Saved(_) => "saved",
            Self::SearchResult(_) => "search-result",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub coordinate: Coordinate,
    pub title: String,
    pub description: Option<String>,
    pub kind: MarkerKind,
}

impl MapMarker {
    pub fn user(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            title: "You are here".into(),
            description: None,
            kind: MarkerKind::User,
        }
    }

    pub fn search_result(
        coordinate: Coordinate,
        title: String,
        place_id: Option<String>,
    ) -> Self {
        Self {
            coordinate,
            title,
            description: None,
            kind: MarkerKind::SearchResult(place_id),
        }
    }

    /// Two markers are the same if they are produced by the same
    /// source entry, independent of a changed position or title.
    pub fn is_same(&self, other: &Self) -> bool {
        use MarkerKind as K;
        match (&self.kind, &other.kind) {
            (K::User, K::User) => true,
            (K::Home(_), K::Home(_)) => true,
            (K::Work(_), K::Work(_)) => true,
            (K::Saved(a), K::Saved(b)) => a == b,
            (K::Shelter(a), K::Shelter(b)) => a.title == b.title,
            (K::SearchResult(a), K::SearchResult(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Shelter> for MapMarker {
    fn from(shelter: Shelter) -> Self {
        Self {
            coordinate: shelter.coordinate,
            title: shelter.title.clone(),
            description: Some(shelter.description.clone()),
            kind: MarkerKind::Shelter(shelter),
        }
    }
}

impl From<(AddressRole, SavedAddress)> for MapMarker {
    fn from((role, address): (AddressRole, SavedAddress)) -> Self {
        let SavedAddress {
            coordinate,
            formatted_address,
            ..
        } = address;
        let kind = match role {
            AddressRole::Home => MarkerKind::Home(formatted_address.clone()),
            AddressRole::Work => MarkerKind::Work(formatted_address.clone()),
        };
        Self {
            coordinate,
            title: role.title().to_owned(),
            description: Some(formatted_address),
            kind,
        }
    }
}

impl From<SavedAddress> for MapMarker {
    fn from(address: SavedAddress) -> Self {
        let SavedAddress {
            id,
            title,
            coordinate,
            formatted_address,
        } = address;
        Self {
            coordinate,
            title,
            description: Some(formatted_address),
            kind: MarkerKind::Saved(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelter::default_shelters;

    #[test]
    fn markers_from_sources() {
        let shelter = default_shelters().remove(0);
        let marker = MapMarker::from(shelter.clone());
        assert_eq!(marker.title, shelter.title);
        assert_eq!(marker.coordinate, shelter.coordinate);
        assert_eq!(marker.kind.name(), "shelter");

        let home = SavedAddress {
            id: "home".into(),
            title: "Home".into(),
            coordinate: Coordinate::new(-27.5, 153.0),
            formatted_address: "1 Main St".into(),
        };
        let marker = MapMarker::from((AddressRole::Home, home));
        assert_eq!(marker.kind, MarkerKind::Home("1 Main St".into()));
        assert_eq!(marker.title, "Home");
    }

    #[test]
    fn same_source_entry() {
        let a = MapMarker::user(Coordinate::new(1.0, 1.0));
        let b = MapMarker::user(Coordinate::new(2.0, 2.0));
        assert!(a.is_same(&b));

        let shelters = default_shelters();
        let s1 = MapMarker::from(shelters[0].clone());
        let s2 = MapMarker::from(shelters[1].clone());
        assert!(!s1.is_same(&s2));
        assert!(!s1.is_same(&a));
    }
}
