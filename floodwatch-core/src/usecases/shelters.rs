use super::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct ShelterDistance<'a> {
    pub shelter: &'a Shelter,
    /// `None` if the location of the user is unknown.
    pub distance: Option<Distance>,
}

fn cmp_distance(a: Distance, b: Distance) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Order shelters relative to the location of the user.
///
/// Ties keep the order of `shelters`.
pub fn sort_shelters(
    shelters: &[Shelter],
    order: ShelterOrder,
    location: Option<Coordinate>,
) -> Result<Vec<ShelterDistance<'_>>> {
    let mut sorted: Vec<_> = shelters
        .iter()
        .map(|shelter| ShelterDistance {
            shelter,
            distance: location.map(|pos| pos.distance_to(shelter.coordinate)),
        })
        .collect();
    match order {
        ShelterOrder::Closest | ShelterOrder::Furthest => {
            if location.is_none() {
                return Err(Error::NoLocation);
            }
            let dist = |s: &ShelterDistance| s.distance.unwrap_or_else(Distance::infinite);
            sorted.sort_by(|a, b| cmp_distance(dist(a), dist(b)));
            if order == ShelterOrder::Furthest {
                // reverse ordering but keep ties stable
                sorted.sort_by(|a, b| cmp_distance(dist(b), dist(a)));
            }
        }
        ShelterOrder::Alphabetical => {
            sorted.sort_by(|a, b| {
                a.shelter
                    .title
                    .to_lowercase()
                    .cmp(&b.shelter.title.to_lowercase())
            });
        }
    }
    Ok(sorted)
}

/// The shelter with the shortest distance to `location`.
///
/// If multiple shelters have the same distance the first one wins.
pub fn closest_shelter(
    shelters: &[Shelter],
    location: Option<Coordinate>,
) -> Result<Option<(&Shelter, Distance)>> {
    let location = location.ok_or(Error::NoLocation)?;
    let mut closest: Option<(&Shelter, Distance)> = None;
    for shelter in shelters {
        let distance = location.distance_to(shelter.coordinate);
        if closest.map_or(true, |(_, min)| distance < min) {
            closest = Some((shelter, distance));
        }
    }
    Ok(closest)
}
