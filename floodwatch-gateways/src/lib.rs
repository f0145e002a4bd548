//! # floodwatch-gateways
//!
//! Implementations of the gateways of `floodwatch-core`
//! that talk to the outside world: public flood data,
//! the prediction service, weather, Google Maps, the realtime
//! database and push notifications.

pub mod flood_zones;
pub mod google;
pub mod notify;
pub mod prediction;
pub mod realtime_db;
pub mod user_communication;
pub mod weather;

mod http;
