use crate::http;
use floodwatch_core::{
    entities::*,
    gateways::{prediction::FloodPredictionGateway, Result},
};
use serde::{Deserialize, Serialize};

/// Flood prediction service that classifies daily rainfall.
#[derive(Debug, Clone)]
pub struct PredictionService {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct PredictionRequest {
    rain_data: Vec<(i32, u32, u32, f64)>,
}

impl From<&[RainfallSample]> for PredictionRequest {
    fn from(samples: &[RainfallSample]) -> Self {
        let rain_data = samples
            .iter()
            .map(|s| (s.year, s.month, s.day, s.rain_mm))
            .collect();
        Self { rain_data }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    date: String,
    prediction: u8,
}

impl From<Prediction> for FloodPrediction {
    fn from(from: Prediction) -> Self {
        let Prediction { date, prediction } = from;
        Self {
            date,
            risk_level: prediction,
        }
    }
}

impl FloodPredictionGateway for PredictionService {
    fn predict_floods(&self, rain_data: &[RainfallSample]) -> Result<Vec<FloodPrediction>> {
        let request = http::client()
            .post(&self.url)
            .json(&PredictionRequest::from(rain_data));
        let predictions: Vec<Prediction> = http::send_json(request)?;
        log::debug!("Received {} flood predictions", predictions.len());
        Ok(predictions.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_rain_data_as_rows() {
        let samples = [
            RainfallSample::new(2024, 10, 26, 50.0),
            RainfallSample::new(2024, 10, 27, 100.5),
        ];
        let json = serde_json::to_string(&PredictionRequest::from(&samples[..])).unwrap();
        assert_eq!(
            json,
            r#"{"rain_data":[[2024,10,26,50.0],[2024,10,27,100.5]]}"#
        );
    }

    #[test]
    fn parse_predictions() {
        let json = r#"[{"date":"2024-10-26","prediction":2},{"date":"2024-10-27","prediction":0}]"#;
        let predictions: Vec<Prediction> = http::parse_json(json).unwrap();
        let predictions: Vec<FloodPrediction> = predictions.into_iter().map(Into::into).collect();
        assert_eq!(predictions[0].severity(), Some(Severity::Moderate));
        assert_eq!(predictions[1].severity(), None);
    }
}
