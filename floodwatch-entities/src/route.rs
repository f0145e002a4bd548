use std::fmt;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl fmt::Display for RoutePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} km, {:.0} min",
            self.distance_km, self.duration_minutes
        )
    }
}
