use super::prelude::*;
use crate::gateways::prediction::FloodPredictionGateway;

/// Number of predictions shown in the timeline.
pub const TIMELINE_LEN: usize = 7;

pub fn predict_floods<G>(gateway: &G, rain_data: &[RainfallSample]) -> Result<Vec<FloodPrediction>>
where
    G: FloodPredictionGateway + ?Sized,
{
    let predictions = gateway.predict_floods(rain_data)?;
    log::debug!(
        "Received {} predictions for {} days of rain data",
        predictions.len(),
        rain_data.len()
    );
    Ok(predictions)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub date: String,
    pub severity: Option<Severity>,
    pub description: String,
}

/// The most recent predictions with a human readable description.
pub fn prediction_timeline(predictions: &[FloodPrediction]) -> Vec<TimelineEntry> {
    let skip = predictions.len().saturating_sub(TIMELINE_LEN);
    predictions
        .iter()
        .skip(skip)
        .map(|p| TimelineEntry {
            date: p.date.clone(),
            severity: p.severity(),
            description: p.description(),
        })
        .collect()
}
