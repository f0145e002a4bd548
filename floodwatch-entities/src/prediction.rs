use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;
use strum::{Display, EnumString};

/// Severity of a predicted flood.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive, ToPrimitive, Display,
    EnumString,
)]
pub enum Severity {
    Minor = 1,
    Moderate = 2,
    Major = 3,
}

impl Severity {
    /// `None` for risk level `0` (no flooding) and
    /// for values outside of the known range.
    pub fn from_risk_level(risk_level: u8) -> Option<Self> {
        Self::from_u8(risk_level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FloodPrediction {
    /// ISO 8601 date, e.g. `2024-10-26`.
    pub date: String,
    /// `0` (no flooding) up to `3` (major flooding).
    pub risk_level: u8,
}

impl FloodPrediction {
    pub fn severity(&self) -> Option<Severity> {
        Severity::from_risk_level(self.risk_level)
    }

    pub fn description(&self) -> String {
        let date = &self.date;
        match self.risk_level {
            0 => "No flooding is expected on this day.".to_string(),
            1 => format!(
                "Minor flooding is present on {date}. Please avoid red areas on the flood map."
            ),
            2 => format!(
                "Moderate flooding is present on {date}. \
                 Please avoid red and orange areas on the flood map."
            ),
            3 => format!(
                "Major flooding is present on {date}. Please avoid all areas on the flood map."
            ),
            _ => "No prediction available for this day.".to_string(),
        }
    }
}

/// Daily rainfall as consumed by the prediction service.
///
/// The values are passed through unchecked, i.e. `day`
/// might not be a valid day of the month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainfallSample {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub rain_mm: f64,
}

impl RainfallSample {
    pub const fn new(year: i32, month: u32, day: u32, rain_mm: f64) -> Self {
        Self {
            year,
            month,
            day,
            rain_mm,
        }
    }
}

const SIMULATED_RAIN: [(u32, f64); 14] = [
    (19, 0.0),
    (20, 0.0),
    (21, 0.0),
    (22, 0.0),
    (23, 15.0),
    (24, 0.0),
    (25, 5.0),
    (26, 50.0),
    (27, 100.0),
    (28, 5.0),
    (29, 0.0),
    (30, 0.0),
    (31, 0.0),
    (32, 5.0),
];

/// Two weeks of rainfall to drive a flood simulation.
pub fn simulated_rain_series() -> Vec<RainfallSample> {
    SIMULATED_RAIN
        .iter()
        .map(|(day, mm)| RainfallSample::new(2024, 10, *day, *mm))
        .collect()
}
