const ABSOLUTE_ZERO_CELSIUS: f64 = -273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin + ABSOLUTE_ZERO_CELSIUS
}

/// Current weather conditions of a city.
///
/// Temperatures are in Kelvin, wind speed in m/s.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub city: String,
    pub country: Option<String>,
    pub temperature_k: f64,
    pub feels_like_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_deg: u16,
    pub description: Option<String>,
}

impl CurrentWeather {
    pub fn temperature_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temperature_k)
    }

    pub fn feels_like_celsius(&self) -> f64 {
        kelvin_to_celsius(self.feels_like_k)
    }

    pub fn temp_range_celsius(&self) -> (f64, f64) {
        (
            kelvin_to_celsius(self.temp_min_k),
            kelvin_to_celsius(self.temp_max_k),
        )
    }
}
