use super::Result;
use floodwatch_entities::weather::CurrentWeather;

pub trait WeatherGateway {
    fn current_weather(&self, city: &str) -> Result<CurrentWeather>;
}
