use itertools::Itertools;
use std::{fmt, str::FromStr};
use thiserror::Error;

const MEAN_EARTH_RADIUS: Distance = Distance::from_km(6371.0);

const LAT_DEG_MAX: f64 = 90.0;
const LNG_DEG_MAX: f64 = 180.0;

/// A geographical position in decimal degrees (WGS 84).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        let pos = Self::new(latitude, longitude);
        pos.is_valid().then_some(pos)
    }

    pub fn is_valid(self) -> bool {
        (-LAT_DEG_MAX..=LAT_DEG_MAX).contains(&self.latitude)
            && (-LNG_DEG_MAX..=LNG_DEG_MAX).contains(&self.longitude)
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }

    pub fn distance_to(self, other: Self) -> Distance {
        distance(self, other)
    }
}

/// Calculate the great-circle distance between two positions
/// with the haversine formula.
pub fn distance(p1: Coordinate, p2: Coordinate) -> Distance {
    let (lat1_rad, lng1_rad) = p1.to_lat_lng_rad();
    let (lat2_rad, lng2_rad) = p2.to_lat_lng_rad();

    let dlat = lat2_rad - lat1_rad;
    let dlng = lng2_rad - lng1_rad;

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlng / 2.0).sin().powi(2);
    // rounding errors near antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Distance::from_km(MEAN_EARTH_RADIUS.to_km() * c)
}

/// Shorthand for `distance(a, b).to_km()`.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    distance(a, b).to_km()
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateParseError {
    #[error("Expected '<lat>,<lng>' but got '{0}'")]
    Format(String),
    #[error("Invalid latitude '{0}'")]
    Latitude(String),
    #[error("Invalid longitude '{0}'")]
    Longitude(String),
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat_str, lng_str)) = s.split(',').map(str::trim).collect_tuple() else {
            return Err(CoordinateParseError::Format(s.to_owned()));
        };
        let latitude = lat_str
            .parse::<f64>()
            .ok()
            .filter(|deg| (-LAT_DEG_MAX..=LAT_DEG_MAX).contains(deg))
            .ok_or_else(|| CoordinateParseError::Latitude(lat_str.to_owned()))?;
        let longitude = lng_str
            .parse::<f64>()
            .ok()
            .filter(|deg| (-LNG_DEG_MAX..=LNG_DEG_MAX).contains(deg))
            .ok_or_else(|| CoordinateParseError::Longitude(lng_str.to_owned()))?;
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_km(km: f64) -> Self {
        Self(km)
    }

    pub fn from_meters(meters: f64) -> Self {
        Self(meters / 1000.0)
    }

    pub const fn to_km(self) -> f64 {
        self.0
    }

    pub fn to_meters(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}
