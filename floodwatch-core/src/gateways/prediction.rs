use super::Result;
use floodwatch_entities::prediction::{FloodPrediction, RainfallSample};

pub trait FloodPredictionGateway {
    fn predict_floods(&self, rain_data: &[RainfallSample]) -> Result<Vec<FloodPrediction>>;
}
