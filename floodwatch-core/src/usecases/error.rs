use crate::{gateways, repositories};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("This is not allowed without auth")]
    Unauthorized,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("No location provided")]
    NoLocation,
    #[error("The requested object could not be found")]
    NotFound,
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Missing address")]
    EmptyAddress,
    #[error(transparent)]
    Network(#[from] gateways::Error),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}
