use thiserror::Error;

pub mod directions;
pub mod flood_zones;
pub mod notify;
pub mod places;
pub mod prediction;
pub mod weather;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Network failure: {0}")]
    Network(#[source] anyhow::Error),
    #[error("Unexpected response status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
